//! The two per-frame GPU components.
//!
//! [`ray_tracer::RayTracingController`] traces the sphere field into a
//! scaled render target; [`sun_aligner::HdriSunAligner`] runs the
//! grayscale / blur / exposure kernels over an HDRI. Both finish with a blit
//! into the caller's output texture.

pub mod frame;
pub mod ray_tracer;
pub mod sun_aligner;

pub use frame::{FrameParams, FrameTextures};
pub use ray_tracer::{FramePlan, RayTracingController};
pub use sun_aligner::HdriSunAligner;

#[cfg(test)]
pub(crate) mod test_support {
    use crate::gpu::render_context::RenderContext;

    /// Headless context, or `None` on machines without an adapter.
    pub(crate) fn gpu() -> Option<RenderContext> {
        match pollster::block_on(RenderContext::headless(64, 64)) {
            Ok(context) => Some(context),
            Err(e) => {
                log::warn!("skipping GPU test: {e}");
                None
            }
        }
    }

    /// A sampled + copyable texture filled with `texels` (RGBA f32).
    pub(crate) fn texture_with_data(
        context: &RenderContext,
        width: u32,
        height: u32,
        texels: &[f32],
    ) -> wgpu::Texture {
        use wgpu::util::DeviceExt;
        context.device.create_texture_with_data(
            &context.queue,
            &wgpu::TextureDescriptor {
                label: Some("Test Source"),
                size: wgpu::Extent3d {
                    width,
                    height,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Rgba32Float,
                usage: wgpu::TextureUsages::TEXTURE_BINDING
                    | wgpu::TextureUsages::COPY_SRC
                    | wgpu::TextureUsages::COPY_DST
                    | wgpu::TextureUsages::RENDER_ATTACHMENT,
                view_formats: &[],
            },
            wgpu::util::TextureDataOrder::LayerMajor,
            bytemuck::cast_slice(texels),
        )
    }

    /// Copy an `Rgba32Float` texture back to the CPU.
    pub(crate) fn read_rgba32f(
        context: &RenderContext,
        texture: &wgpu::Texture,
    ) -> Vec<f32> {
        let (width, height) = (texture.width(), texture.height());
        let row_bytes = width * 16;
        let padded = row_bytes.div_ceil(wgpu::COPY_BYTES_PER_ROW_ALIGNMENT)
            * wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
        let buffer = context.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Readback"),
            size: u64::from(padded * height),
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });
        let mut encoder = context.create_encoder();
        encoder.copy_texture_to_buffer(
            texture.as_image_copy(),
            wgpu::TexelCopyBufferInfo {
                buffer: &buffer,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(padded),
                    rows_per_image: Some(height),
                },
            },
            texture.size(),
        );
        context.submit(encoder);

        let slice = buffer.slice(..);
        slice.map_async(wgpu::MapMode::Read, |_| {});
        let _ = context.device.poll(wgpu::PollType::Wait).unwrap();
        let data = slice.get_mapped_range();
        let mut texels = Vec::with_capacity((width * height * 4) as usize);
        for row in data.chunks(padded as usize) {
            texels.extend_from_slice(bytemuck::cast_slice(&row[..row_bytes as usize]));
        }
        texels
    }
}
