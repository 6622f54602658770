//! Render-target textures and the size-keyed target cache.

/// Everything needed to allocate a render target.
///
/// The cache in [`ensure_target`] keys on `width` and `height` only; format
/// and flags are fixed per call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetDescriptor {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Texel format (before the color-space flag is applied).
    pub format: wgpu::TextureFormat,
    /// Allow compute kernels to write the texture as a storage image.
    pub random_write: bool,
    /// Interpret texel data as sRGB.
    pub srgb: bool,
}

impl TargetDescriptor {
    /// Linear, storage-writable descriptor.
    #[must_use]
    pub fn storage(width: u32, height: u32, format: wgpu::TextureFormat) -> Self {
        Self {
            width,
            height,
            format,
            random_write: true,
            srgb: false,
        }
    }

    /// The format actually allocated once the color-space flag is applied.
    #[must_use]
    pub fn resolved_format(&self) -> wgpu::TextureFormat {
        if self.srgb {
            self.format.add_srgb_suffix()
        } else {
            self.format.remove_srgb_suffix()
        }
    }

    fn usage(&self) -> wgpu::TextureUsages {
        let usage = wgpu::TextureUsages::RENDER_ATTACHMENT
            | wgpu::TextureUsages::TEXTURE_BINDING
            | wgpu::TextureUsages::COPY_SRC
            | wgpu::TextureUsages::COPY_DST;
        if self.random_write {
            usage | wgpu::TextureUsages::STORAGE_BINDING
        } else {
            usage
        }
    }
}

/// Anything that occupies a render-target slot and knows its size.
pub trait GpuTarget {
    /// Allocated `(width, height)` in pixels.
    fn dimensions(&self) -> (u32, u32);
}

/// A render-target texture and its default view.
///
/// Created with `RENDER_ATTACHMENT | TEXTURE_BINDING | COPY_SRC | COPY_DST`,
/// plus `STORAGE_BINDING` when the descriptor asks for random writes, so the
/// same texture can be a blit destination, a kernel output, and a blit
/// source.
pub struct RenderTarget {
    /// The underlying GPU texture.
    pub texture: wgpu::Texture,
    /// A default full-texture view.
    pub view: wgpu::TextureView,
}

impl RenderTarget {
    /// Allocate a render target matching `descriptor`.
    #[must_use]
    pub fn new(
        device: &wgpu::Device,
        label: &str,
        descriptor: &TargetDescriptor,
    ) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width: descriptor.width.max(1),
                height: descriptor.height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: descriptor.resolved_format(),
            usage: descriptor.usage(),
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self { texture, view }
    }

    /// Texel format of the allocated texture.
    pub fn format(&self) -> wgpu::TextureFormat {
        self.texture.format()
    }
}

impl GpuTarget for RenderTarget {
    fn dimensions(&self) -> (u32, u32) {
        (self.texture.width(), self.texture.height())
    }
}

/// Make `slot` hold a target of the descriptor's size.
///
/// The existing target is kept when its width and height already match.
/// Otherwise it is dropped (releasing the GPU texture) and `create` allocates
/// a replacement. Returns `true` when a new target was allocated, in which
/// case any bind group referencing the old one is stale.
pub fn ensure_target<T, F>(
    slot: &mut Option<T>,
    descriptor: &TargetDescriptor,
    create: F,
) -> bool
where
    T: GpuTarget,
    F: FnOnce(&TargetDescriptor) -> T,
{
    let wanted = (descriptor.width, descriptor.height);
    if slot.as_ref().is_some_and(|t| t.dimensions() == wanted) {
        return false;
    }
    if let Some(old) = slot.take() {
        log::debug!(
            "releasing {}x{} target for {}x{}",
            old.dimensions().0,
            old.dimensions().1,
            wanted.0,
            wanted.1
        );
        drop(old);
    }
    *slot = Some(create(descriptor));
    true
}
