//! HDRI adjustment for reading the sun's position off an environment map.
//!
//! Per frame: upload the kernel parameters, blit the HDRI into scratch
//! target A, then run `ConvertToGrayscale` (A → B), `Blur` (B → A) and
//! `SetExposure` (A → B), and blit B to the output. All three kernels always
//! dispatch; a disabled stage copies its input through unchanged.
//!
//! The scratch targets use the HDRI's own format when the device can render
//! to it and write it as a storage texture, otherwise `Rgba32Float`.

use rustc_hash::FxHashMap;
use wgpu::util::DeviceExt;

use crate::error::SolsticeError;
use crate::gpu::blit::Blitter;
use crate::gpu::pipeline_helpers::{
    compute_texture_2d, compute_uniform_buffer, create_compute_pipeline,
    create_pipeline_layout, storage_texture_2d, workgroup_grid,
};
use crate::gpu::render_context::RenderContext;
use crate::gpu::shader_composer::{ShaderComposer, HDRI_ADJUST_SHADER};
use crate::gpu::texture::{ensure_target, RenderTarget, TargetDescriptor};
use crate::options::HdriOptions;

/// Formats the adjust kernels are compiled for, with the shader def that
/// selects each one's storage declaration.
pub const SCRATCH_FORMATS: &[(wgpu::TextureFormat, &str)] = &[
    (wgpu::TextureFormat::Rgba32Float, "SCRATCH_RGBA32F"),
    (wgpu::TextureFormat::Rgba16Float, "SCRATCH_RGBA16F"),
    (wgpu::TextureFormat::Rgba8Unorm, "SCRATCH_RGBA8"),
];

/// Scratch format used when the HDRI's own format is unsuitable.
pub const FALLBACK_SCRATCH_FORMAT: wgpu::TextureFormat =
    wgpu::TextureFormat::Rgba32Float;

/// Pick the scratch format for an HDRI of `source` format.
///
/// The sRGB suffix is dropped first, since kernels work on linear values.
#[must_use]
pub fn scratch_format(
    source: wgpu::TextureFormat,
    features: wgpu::Features,
) -> wgpu::TextureFormat {
    let native = source.remove_srgb_suffix();
    let needed = wgpu::TextureUsages::STORAGE_BINDING
        | wgpu::TextureUsages::RENDER_ATTACHMENT;
    let compiled = SCRATCH_FORMATS.iter().any(|&(f, _)| f == native);
    if compiled
        && native
            .guaranteed_format_features(features)
            .allowed_usages
            .contains(needed)
    {
        native
    } else {
        FALLBACK_SCRATCH_FORMAT
    }
}

/// Kernel parameter block; matches `AdjustParams` in `hdri_adjust.wgsl`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct AdjustUniform {
    /// `_DoGrayscale`.
    pub do_grayscale: u32,
    /// `_DoBlur`.
    pub do_blur: u32,
    /// `_Sigma`.
    pub sigma: i32,
    /// `_Exposure`.
    pub exposure: f32,
}

impl From<&HdriOptions> for AdjustUniform {
    fn from(options: &HdriOptions) -> Self {
        Self {
            do_grayscale: u32::from(options.do_grayscale),
            do_blur: u32::from(options.do_blur),
            sigma: options.sigma,
            exposure: options.exposure,
        }
    }
}

/// The three pipelines for one scratch format.
struct AdjustKernels {
    bind_group_layout: wgpu::BindGroupLayout,
    grayscale: wgpu::ComputePipeline,
    blur: wgpu::ComputePipeline,
    exposure: wgpu::ComputePipeline,
}

impl AdjustKernels {
    fn new(
        device: &wgpu::Device,
        shader_composer: &mut ShaderComposer,
        format: wgpu::TextureFormat,
        def: &str,
    ) -> Result<Self, SolsticeError> {
        let shader = shader_composer.compose(
            device,
            &format!("HDRI Adjust Shader ({format:?})"),
            HDRI_ADJUST_SHADER,
            &[def],
        )?;
        let bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("HDRI Adjust Layout"),
                entries: &[
                    compute_uniform_buffer(0),
                    compute_texture_2d(1, false),
                    storage_texture_2d(2, format),
                ],
            });
        let layout =
            create_pipeline_layout(device, "HDRI Adjust", &[&bind_group_layout]);
        Ok(Self {
            grayscale: create_compute_pipeline(
                device,
                "ConvertToGrayscale",
                &shader,
                "ConvertToGrayscale",
                &layout,
            ),
            blur: create_compute_pipeline(device, "Blur", &shader, "Blur", &layout),
            exposure: create_compute_pipeline(
                device,
                "SetExposure",
                &shader,
                "SetExposure",
                &layout,
            ),
            bind_group_layout,
        })
    }
}

/// Scratch ping-pong pair plus the bind groups reading one and writing the
/// other.
struct Scratch {
    format: wgpu::TextureFormat,
    a: Option<RenderTarget>,
    b: Option<RenderTarget>,
    a_to_b: Option<wgpu::BindGroup>,
    b_to_a: Option<wgpu::BindGroup>,
}

/// Runs grayscale → blur → exposure over an HDRI each frame.
pub struct HdriSunAligner {
    kernels: FxHashMap<wgpu::TextureFormat, AdjustKernels>,
    params_buffer: wgpu::Buffer,
    scratch: Option<Scratch>,
}

impl HdriSunAligner {
    /// Compile the kernels for every scratch format.
    ///
    /// # Errors
    ///
    /// Returns [`SolsticeError::Shader`] if the kernels fail to compose.
    pub fn new(
        device: &wgpu::Device,
        shader_composer: &mut ShaderComposer,
    ) -> Result<Self, SolsticeError> {
        let mut kernels = FxHashMap::default();
        for &(format, def) in SCRATCH_FORMATS {
            let _ = kernels.insert(
                format,
                AdjustKernels::new(device, shader_composer, format, def)?,
            );
        }
        let params_buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("HDRI Adjust Params"),
                contents: bytemuck::bytes_of(&AdjustUniform::from(
                    &HdriOptions::default(),
                )),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            });
        Ok(Self {
            kernels,
            params_buffer,
            scratch: None,
        })
    }

    /// Format of the current scratch targets, once a frame has run.
    pub fn scratch_format(&self) -> Option<wgpu::TextureFormat> {
        self.scratch.as_ref().map(|s| s.format)
    }

    /// Record one adjusted frame of `hdri` into `output`.
    pub fn render(
        &mut self,
        context: &RenderContext,
        encoder: &mut wgpu::CommandEncoder,
        blitter: &mut Blitter,
        hdri: &wgpu::Texture,
        output: &wgpu::Texture,
        options: &HdriOptions,
    ) {
        let device = &context.device;
        context.queue.write_buffer(
            &self.params_buffer,
            0,
            bytemuck::bytes_of(&AdjustUniform::from(options)),
        );

        let (width, height) = (hdri.width(), hdri.height());
        self.prepare_scratch(device, hdri.format(), width, height);

        let Some(scratch) = self.scratch.as_ref() else {
            return;
        };
        let format = scratch.format;
        let (Some(a), Some(b), Some(a_to_b), Some(b_to_a), Some(kernels)) = (
            scratch.a.as_ref(),
            scratch.b.as_ref(),
            scratch.a_to_b.as_ref(),
            scratch.b_to_a.as_ref(),
            self.kernels.get(&format),
        ) else {
            return;
        };

        blitter.blit(device, encoder, hdri, &a.texture);
        {
            let (x, y) = workgroup_grid(width, height);
            let mut pass =
                encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                    label: Some("HDRI Adjust Pass"),
                    timestamp_writes: None,
                });
            for (pipeline, bind_group) in [
                (&kernels.grayscale, a_to_b),
                (&kernels.blur, b_to_a),
                (&kernels.exposure, a_to_b),
            ] {
                pass.set_pipeline(pipeline);
                pass.set_bind_group(0, bind_group, &[]);
                pass.dispatch_workgroups(x, y, 1);
            }
        }
        blitter.blit(device, encoder, &b.texture, output);
    }

    fn prepare_scratch(
        &mut self,
        device: &wgpu::Device,
        source_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
    ) {
        let format = scratch_format(source_format, device.features());
        if self.scratch.as_ref().is_none_or(|s| s.format != format) {
            if format == source_format.remove_srgb_suffix() {
                log::debug!("HDRI scratch targets use {format:?}");
            } else {
                log::info!(
                    "HDRI format {source_format:?} unsupported for scratch, using {format:?}"
                );
            }
            self.scratch = Some(Scratch {
                format,
                a: None,
                b: None,
                a_to_b: None,
                b_to_a: None,
            });
        }
        let Some(scratch) = self.scratch.as_mut() else {
            return;
        };

        let descriptor = TargetDescriptor::storage(width, height, format);
        let create = |d: &TargetDescriptor| RenderTarget::new(device, "HDRI Scratch", d);
        let a_changed = ensure_target(&mut scratch.a, &descriptor, create);
        let b_changed = ensure_target(&mut scratch.b, &descriptor, create);

        if a_changed || b_changed || scratch.a_to_b.is_none() {
            let (Some(a), Some(b), Some(kernels)) =
                (scratch.a.as_ref(), scratch.b.as_ref(), self.kernels.get(&format))
            else {
                return;
            };
            let bind = |src: &RenderTarget, dst: &RenderTarget, label: &str| {
                device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some(label),
                    layout: &kernels.bind_group_layout,
                    entries: &[
                        wgpu::BindGroupEntry {
                            binding: 0,
                            resource: self.params_buffer.as_entire_binding(),
                        },
                        wgpu::BindGroupEntry {
                            binding: 1,
                            resource: wgpu::BindingResource::TextureView(&src.view),
                        },
                        wgpu::BindGroupEntry {
                            binding: 2,
                            resource: wgpu::BindingResource::TextureView(&dst.view),
                        },
                    ],
                })
            };
            scratch.a_to_b = Some(bind(a, b, "HDRI Scratch A→B"));
            scratch.b_to_a = Some(bind(b, a, "HDRI Scratch B→A"));
        }
    }
}
