//! Compute-shader ray tracing of the procedural sphere field.
//!
//! The controller has two lifecycles. The component is *enabled* while its
//! view is active: enabling generates a scene and uploads it into the sphere
//! buffer, disabling releases the buffer but keeps the CPU-side scene for
//! inspection. Independently, each frame either traces (when
//! `tracing.do_tracing` is set) or blits the source image through unchanged.

use bytemuck::Zeroable;
use glam::{EulerRot, Quat, Vec3, Vec4};
use rand::rngs::StdRng;
use rand::SeedableRng;
use wgpu::util::DeviceExt;

use crate::error::SolsticeError;
use crate::gpu::blit::Blitter;
use crate::gpu::hdri::{fallback_texture, skybox_sampler, HdriTexture};
use crate::gpu::pipeline_helpers::{
    compute_filtering_sampler, compute_storage_buffer, compute_texture_2d,
    compute_uniform_buffer, create_compute_pipeline, create_pipeline_layout,
    storage_texture_2d, workgroup_grid,
};
use crate::gpu::render_context::RenderContext;
use crate::gpu::shader_composer::{ShaderComposer, RAY_TRACE_SHADER};
use crate::gpu::structured_buffer::StructuredBuffer;
use crate::gpu::texture::{ensure_target, RenderTarget, TargetDescriptor};
use crate::options::{LightingOptions, Options, SceneOptions, TracingOptions};
use crate::renderer::frame::{FrameParams, FrameTextures};
use crate::scene::{GeneratorParams, GpuSphere, Scene, SceneGenerator};

/// Format of the traced image.
pub const TRACE_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba32Float;

/// Kernel parameter block; matches `TraceParams` in `ray_trace.wgsl`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct TraceUniform {
    /// `_CameraToWorld`.
    pub camera_to_world: [[f32; 4]; 4],
    /// `_CameraInverseProjection`.
    pub camera_inverse_projection: [[f32; 4]; 4],
    /// `_CameraData`: eye position and camera-sphere radius.
    pub camera_data: [f32; 4],
    /// `_DirectionalLight`: light direction and intensity.
    pub directional_light: [f32; 4],
    /// `_SkyboxExposure`.
    pub skybox_exposure: f32,
    /// `_Bounces`.
    pub bounces: u32,
    pub(crate) _pad: [u32; 2],
}

impl TraceUniform {
    /// Pack the per-frame parameters.
    #[must_use]
    pub fn new(frame: &FrameParams, options: &Options) -> Self {
        Self {
            camera_to_world: frame.camera_to_world.to_cols_array_2d(),
            camera_inverse_projection: frame
                .inverse_projection
                .to_cols_array_2d(),
            camera_data: frame
                .camera_position
                .extend(options.scene.camera_sphere_radius)
                .to_array(),
            directional_light: directional_light(&options.lighting).to_array(),
            skybox_exposure: options.lighting.skybox_exposure,
            bounces: options.tracing.bounces,
            _pad: [0; 2],
        }
    }
}

/// Direction the sun's light travels: `+Z` rotated by Euler angles
/// `(x, y, 0)` degrees, applied Z then X then Y.
#[must_use]
pub fn sun_direction(rotation: [f32; 2]) -> Vec3 {
    let [x, y] = rotation;
    Quat::from_euler(EulerRot::YXZ, y.to_radians(), x.to_radians(), 0.0) * Vec3::Z
}

/// Sun direction in `xyz`, intensity in `w`.
#[must_use]
pub fn directional_light(lighting: &LightingOptions) -> Vec4 {
    sun_direction(lighting.sun_rotation).extend(lighting.sun_intensity)
}

/// Traced resolution: the display size scaled and rounded up, at least 1×1.
#[must_use]
pub fn render_extent(display: (u32, u32), scale: f32) -> (u32, u32) {
    let axis = |n: u32| ((n as f32 * scale).ceil() as u32).max(1);
    (axis(display.0), axis(display.1))
}

/// What a frame will do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FramePlan {
    /// Blit the source image to the output unchanged.
    PassThrough,
    /// Trace at `width × height`, then blit to the output.
    Trace {
        /// Traced width in pixels.
        width: u32,
        /// Traced height in pixels.
        height: u32,
    },
}

/// Decide a frame from the tracing options and whether a scene is uploaded.
#[must_use]
pub fn plan_frame(
    tracing: &TracingOptions,
    has_scene: bool,
    display: (u32, u32),
) -> FramePlan {
    if !tracing.do_tracing || !has_scene {
        return FramePlan::PassThrough;
    }
    let (width, height) = render_extent(display, tracing.render_scale);
    FramePlan::Trace { width, height }
}

fn scene_rng(scene_options: &SceneOptions) -> StdRng {
    scene_options.seed.map_or_else(StdRng::from_os_rng, |seed| {
        log::info!("scene seed {seed}");
        StdRng::seed_from_u64(seed)
    })
}

/// Owns the ray tracing kernel, its render target and the sphere buffer.
pub struct RayTracingController {
    pipeline: wgpu::ComputePipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    params_buffer: wgpu::Buffer,
    skybox_sampler: wgpu::Sampler,
    fallback_skybox: HdriTexture,
    target: Option<RenderTarget>,
    sphere_buffer: Option<StructuredBuffer<GpuSphere>>,
    scene: Scene,
    rng: StdRng,
    enabled: bool,
}

impl RayTracingController {
    /// Compile the kernel. The controller starts disabled with no scene.
    ///
    /// # Errors
    ///
    /// Returns [`SolsticeError::Shader`] if the kernel fails to compose.
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        shader_composer: &mut ShaderComposer,
        scene_options: &SceneOptions,
    ) -> Result<Self, SolsticeError> {
        let shader = shader_composer.compose(
            device,
            "Ray Trace Shader",
            RAY_TRACE_SHADER,
            &[],
        )?;
        let bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Ray Trace Layout"),
                entries: &[
                    compute_uniform_buffer(0),
                    compute_storage_buffer(1),
                    storage_texture_2d(2, TRACE_FORMAT),
                    compute_texture_2d(3, true),
                    compute_filtering_sampler(4),
                ],
            });
        let layout =
            create_pipeline_layout(device, "Ray Trace", &[&bind_group_layout]);
        let pipeline =
            create_compute_pipeline(device, "Ray Trace", &shader, "CSMain", &layout);

        let params_buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Ray Trace Params"),
                contents: bytemuck::bytes_of(&TraceUniform::zeroed()),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            });

        let rng = scene_rng(scene_options);

        Ok(Self {
            pipeline,
            bind_group_layout,
            params_buffer,
            skybox_sampler: skybox_sampler(device),
            fallback_skybox: fallback_texture(device, queue),
            target: None,
            sphere_buffer: None,
            scene: Scene::default(),
            rng,
            enabled: false,
        })
    }

    /// Restart the scene RNG from `scene_options.seed`, or from OS entropy
    /// when unset. The next regeneration draws from the new stream.
    pub fn reseed(&mut self, scene_options: &SceneOptions) {
        self.rng = scene_rng(scene_options);
    }

    /// Start the component: generate and upload a scene.
    pub fn enable(&mut self, device: &wgpu::Device, scene_options: &SceneOptions) {
        log::debug!("ray tracer enabled");
        self.enabled = true;
        self.regenerate_scene(device, scene_options);
    }

    /// Stop the component: release the sphere buffer, keep the CPU scene.
    pub fn disable(&mut self) {
        log::debug!("ray tracer disabled");
        self.enabled = false;
        if let Some(buffer) = self.sphere_buffer.take() {
            buffer.release();
        }
    }

    /// Whether the component is enabled.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Whether a scene is resident on the GPU.
    pub fn has_scene_buffer(&self) -> bool {
        self.sphere_buffer.is_some()
    }

    /// Replace the scene with a freshly generated one.
    ///
    /// The old buffer is released first; the new one holds exactly
    /// `max_spheres` records.
    pub fn regenerate_scene(
        &mut self,
        device: &wgpu::Device,
        scene_options: &SceneOptions,
    ) {
        if let Some(buffer) = self.sphere_buffer.take() {
            buffer.release();
        }

        let generator = SceneGenerator::new(GeneratorParams::from(scene_options));
        self.scene = generator.generate(&mut self.rng);
        let records = self.scene.to_gpu();
        let buffer = StructuredBuffer::new_with_data(device, "_SphereBuffer", &records);

        let summary = self.scene.summary();
        log::info!(
            "generated {} spheres ({} metal, {} diffuse, {} rejected), {} bytes",
            summary.placed,
            summary.metal,
            summary.diffuse,
            summary.empty,
            buffer.byte_size()
        );
        self.sphere_buffer = Some(buffer);
    }

    /// The current CPU-side scene.
    pub fn spheres(&self) -> &Scene {
        &self.scene
    }

    /// The traced image from the last traced frame.
    pub fn target(&self) -> Option<&RenderTarget> {
        self.target.as_ref()
    }

    /// Record one frame into `textures.output`.
    ///
    /// The source is blitted through when not tracing; a missing skybox
    /// falls back to a red 1×1 texture.
    pub fn render(
        &mut self,
        context: &RenderContext,
        encoder: &mut wgpu::CommandEncoder,
        blitter: &mut Blitter,
        frame: &FrameParams,
        options: &Options,
        textures: &FrameTextures<'_>,
    ) -> FramePlan {
        let device = &context.device;
        let plan = plan_frame(
            &options.tracing,
            self.sphere_buffer.is_some(),
            frame.display_size,
        );
        if options.tracing.do_tracing && self.sphere_buffer.is_none() {
            log::warn!("tracing requested with no scene uploaded, passing through");
        }

        let FramePlan::Trace { width, height } = plan else {
            blitter.blit(device, encoder, textures.source, textures.output);
            return plan;
        };

        context.queue.write_buffer(
            &self.params_buffer,
            0,
            bytemuck::bytes_of(&TraceUniform::new(frame, options)),
        );

        let descriptor = TargetDescriptor::storage(width, height, TRACE_FORMAT);
        let _ = ensure_target(&mut self.target, &descriptor, |d| {
            RenderTarget::new(device, "Ray Trace Target", d)
        });
        let (Some(target), Some(spheres)) =
            (self.target.as_ref(), self.sphere_buffer.as_ref())
        else {
            return FramePlan::PassThrough;
        };

        let skybox = textures.skybox.unwrap_or(&self.fallback_skybox);
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Ray Trace Bind Group"),
            layout: &self.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: self.params_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: spheres.buffer().as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::TextureView(&target.view),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: wgpu::BindingResource::TextureView(&skybox.view),
                },
                wgpu::BindGroupEntry {
                    binding: 4,
                    resource: wgpu::BindingResource::Sampler(&self.skybox_sampler),
                },
            ],
        });

        {
            let (x, y) = workgroup_grid(width, height);
            let mut pass =
                encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                    label: Some("Ray Trace Pass"),
                    timestamp_writes: None,
                });
            pass.set_pipeline(&self.pipeline);
            pass.set_bind_group(0, &bind_group, &[]);
            pass.dispatch_workgroups(x, y, 1);
        }
        blitter.blit(device, encoder, &target.texture, textures.output);
        plan
    }
}
