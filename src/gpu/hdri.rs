//! Environment image loading.
//!
//! HDR, EXR and LDR images are decoded with `image`, widened to RGBA f32 and
//! stored on the GPU as `Rgba16Float` so they stay filterable on every
//! backend. When no image is available a 1×1 red texture stands in.

use std::path::Path;

use half::f16;
use wgpu::util::DeviceExt;

use crate::error::SolsticeError;

/// Texel format every environment texture is uploaded as.
pub const HDRI_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba16Float;

/// Color of the stand-in texture used when no HDRI is assigned.
pub const FALLBACK_COLOR: [f32; 4] = [1.0, 0.0, 0.0, 1.0];

/// Decoded RGBA half-float pixels, row-major, top row first.
#[derive(Debug, Clone, PartialEq)]
pub struct HdriPixels {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Four `f16` per pixel.
    pub texels: Vec<f16>,
}

impl HdriPixels {
    /// Decode an image file. The format is guessed from the contents.
    ///
    /// # Errors
    ///
    /// [`SolsticeError::Io`] if the file cannot be opened,
    /// [`SolsticeError::ImageLoad`] if it cannot be decoded.
    pub fn decode(path: &Path) -> Result<Self, SolsticeError> {
        let image = image::ImageReader::open(path)?
            .with_guessed_format()?
            .decode()
            .map_err(|e| {
                SolsticeError::ImageLoad(format!("{}: {e}", path.display()))
            })?;
        Ok(Self::from_image(&image))
    }

    /// Convert an in-memory image.
    pub fn from_image(image: &image::DynamicImage) -> Self {
        let rgba = image.to_rgba32f();
        let (width, height) = rgba.dimensions();
        let texels = rgba.as_raw().iter().map(|&v| f16::from_f32(v)).collect();
        Self {
            width,
            height,
            texels,
        }
    }

    /// A single pixel of `color`.
    pub fn solid(color: [f32; 4]) -> Self {
        Self {
            width: 1,
            height: 1,
            texels: color.iter().map(|&v| f16::from_f32(v)).collect(),
        }
    }

    /// Upload as a sampled texture that can also be a copy source.
    pub fn upload(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        label: &str,
    ) -> HdriTexture {
        let texture = device.create_texture_with_data(
            queue,
            &wgpu::TextureDescriptor {
                label: Some(label),
                size: wgpu::Extent3d {
                    width: self.width,
                    height: self.height,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: HDRI_FORMAT,
                usage: wgpu::TextureUsages::TEXTURE_BINDING
                    | wgpu::TextureUsages::COPY_SRC
                    | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            },
            wgpu::util::TextureDataOrder::LayerMajor,
            bytemuck::cast_slice(&self.texels),
        );
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        HdriTexture { texture, view }
    }
}

/// An environment texture resident on the GPU.
pub struct HdriTexture {
    /// The `Rgba16Float` texture.
    pub texture: wgpu::Texture,
    /// Default view.
    pub view: wgpu::TextureView,
}

impl HdriTexture {
    /// Width and height in pixels.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.texture.width(), self.texture.height())
    }
}

/// Load an environment image from disk and upload it.
///
/// # Errors
///
/// See [`HdriPixels::decode`].
pub fn load_hdri(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    path: &Path,
) -> Result<HdriTexture, SolsticeError> {
    let pixels = HdriPixels::decode(path)?;
    log::info!(
        "loaded HDRI {} ({}x{})",
        path.display(),
        pixels.width,
        pixels.height
    );
    Ok(pixels.upload(device, queue, "HDRI Texture"))
}

/// The 1×1 red stand-in for a missing skybox.
pub fn fallback_texture(device: &wgpu::Device, queue: &wgpu::Queue) -> HdriTexture {
    HdriPixels::solid(FALLBACK_COLOR).upload(device, queue, "Fallback Skybox")
}

/// Linear sampler that wraps around the equirect seam and clamps at the
/// poles.
pub fn skybox_sampler(device: &wgpu::Device) -> wgpu::Sampler {
    device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some("Skybox Sampler"),
        address_mode_u: wgpu::AddressMode::Repeat,
        address_mode_v: wgpu::AddressMode::ClampToEdge,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        ..Default::default()
    })
}
