//! Full-screen texture copies.
//!
//! A blit is an exact `copy_texture_to_texture` when source and destination
//! agree on size and format and the usages allow it. Otherwise it draws a
//! full-screen triangle that samples the source with a nearest sampler,
//! converting format and scaling as needed. Render pipelines are cached per
//! destination format.

use rustc_hash::FxHashMap;

use crate::error::SolsticeError;
use crate::gpu::pipeline_helpers::{
    create_screen_space_pipeline, nearest_sampler, non_filtering_sampler,
    texture_2d_unfilterable,
};
use crate::gpu::shader_composer::{ShaderComposer, BLIT_SHADER};

/// How a blit between two textures will be carried out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlitMethod {
    /// Byte-exact texture-to-texture copy.
    Copy,
    /// Full-screen draw sampling the source.
    Draw,
}

/// Texture facts the blit method depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlitEndpoint {
    /// Texture extent.
    pub size: wgpu::Extent3d,
    /// Texel format.
    pub format: wgpu::TextureFormat,
    /// Allowed usages.
    pub usage: wgpu::TextureUsages,
}

impl BlitEndpoint {
    /// Describe an existing texture.
    #[must_use]
    pub fn of(texture: &wgpu::Texture) -> Self {
        Self {
            size: texture.size(),
            format: texture.format(),
            usage: texture.usage(),
        }
    }
}

/// Pick the blit method for a source/destination pair.
#[must_use]
pub fn blit_method(src: &BlitEndpoint, dst: &BlitEndpoint) -> BlitMethod {
    let copyable = src.usage.contains(wgpu::TextureUsages::COPY_SRC)
        && dst.usage.contains(wgpu::TextureUsages::COPY_DST);
    if copyable && src.size == dst.size && src.format == dst.format {
        BlitMethod::Copy
    } else {
        BlitMethod::Draw
    }
}

/// Copies one texture onto another, converting format when needed.
pub struct Blitter {
    shader: wgpu::ShaderModule,
    bind_group_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    pipelines: FxHashMap<wgpu::TextureFormat, wgpu::RenderPipeline>,
}

impl Blitter {
    /// Compile the blit shader. Pipelines are created lazily per format.
    ///
    /// # Errors
    ///
    /// Returns [`SolsticeError::Shader`] if the blit shader fails to compose.
    pub fn new(
        device: &wgpu::Device,
        shader_composer: &mut ShaderComposer,
    ) -> Result<Self, SolsticeError> {
        let shader =
            shader_composer.compose(device, "Blit Shader", BLIT_SHADER, &[])?;
        let bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Blit Layout"),
                entries: &[texture_2d_unfilterable(0), non_filtering_sampler(1)],
            });
        Ok(Self {
            shader,
            bind_group_layout,
            sampler: nearest_sampler(device, "Blit Sampler"),
            pipelines: FxHashMap::default(),
        })
    }

    /// Record a blit of `src` onto `dst`.
    pub fn blit(
        &mut self,
        device: &wgpu::Device,
        encoder: &mut wgpu::CommandEncoder,
        src: &wgpu::Texture,
        dst: &wgpu::Texture,
    ) {
        match blit_method(&BlitEndpoint::of(src), &BlitEndpoint::of(dst)) {
            BlitMethod::Copy => encoder.copy_texture_to_texture(
                src.as_image_copy(),
                dst.as_image_copy(),
                src.size(),
            ),
            BlitMethod::Draw => {
                let src_view =
                    src.create_view(&wgpu::TextureViewDescriptor::default());
                let dst_view =
                    dst.create_view(&wgpu::TextureViewDescriptor::default());
                self.draw(device, encoder, &src_view, &dst_view, dst.format());
            }
        }
    }

    /// Record a full-screen draw of `src_view` into `dst_view`.
    pub fn draw(
        &mut self,
        device: &wgpu::Device,
        encoder: &mut wgpu::CommandEncoder,
        src_view: &wgpu::TextureView,
        dst_view: &wgpu::TextureView,
        dst_format: wgpu::TextureFormat,
    ) {
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Blit Bind Group"),
            layout: &self.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(src_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        });

        let pipeline = self.pipeline(device, dst_format);
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Blit Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: dst_view,
                depth_slice: None,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });
        pass.set_pipeline(pipeline);
        pass.set_bind_group(0, &bind_group, &[]);
        pass.draw(0..3, 0..1);
    }

    fn pipeline(
        &mut self,
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
    ) -> &wgpu::RenderPipeline {
        let Self {
            shader,
            bind_group_layout,
            pipelines,
            ..
        } = self;
        pipelines.entry(format).or_insert_with(|| {
            log::debug!("creating blit pipeline for {format:?}");
            create_screen_space_pipeline(
                device,
                "Blit",
                shader,
                format,
                None,
                &[bind_group_layout],
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoint(
        width: u32,
        format: wgpu::TextureFormat,
        usage: wgpu::TextureUsages,
    ) -> BlitEndpoint {
        BlitEndpoint {
            size: wgpu::Extent3d {
                width,
                height: 16,
                depth_or_array_layers: 1,
            },
            format,
            usage,
        }
    }

    const RGBA8: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;
    const COPY_BOTH: wgpu::TextureUsages =
        wgpu::TextureUsages::COPY_SRC.union(wgpu::TextureUsages::COPY_DST);

    #[test]
    fn matching_textures_copy_exactly() {
        let a = endpoint(16, RGBA8, COPY_BOTH);
        assert_eq!(blit_method(&a, &a), BlitMethod::Copy);
    }

    #[test]
    fn size_or_format_mismatch_draws() {
        let a = endpoint(16, RGBA8, COPY_BOTH);
        let wider = endpoint(32, RGBA8, COPY_BOTH);
        let float = endpoint(16, wgpu::TextureFormat::Rgba32Float, COPY_BOTH);
        assert_eq!(blit_method(&a, &wider), BlitMethod::Draw);
        assert_eq!(blit_method(&a, &float), BlitMethod::Draw);
    }

    #[test]
    fn missing_copy_usage_draws() {
        let src = endpoint(16, RGBA8, wgpu::TextureUsages::TEXTURE_BINDING);
        let dst = endpoint(16, RGBA8, COPY_BOTH);
        assert_eq!(blit_method(&src, &dst), BlitMethod::Draw);
    }
}
