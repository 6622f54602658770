mod input;
mod options;

use std::path::Path;

use crate::camera::controller::CameraController;
use crate::error::SolsticeError;
use crate::gpu::blit::Blitter;
use crate::gpu::hdri::{fallback_texture, load_hdri, HdriTexture};
use crate::gpu::render_context::RenderContext;
use crate::gpu::shader_composer::ShaderComposer;
use crate::input::MouseState;
use crate::options::Options;
use crate::renderer::{
    FrameParams, FrameTextures, HdriSunAligner, RayTracingController,
};

/// Which component produces the displayed image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    /// Ray-traced sphere field (or the pass-through image).
    #[default]
    RayTracer,
    /// The HDRI after grayscale, blur and exposure.
    SunAligner,
}

impl ViewMode {
    /// The other mode.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::RayTracer => Self::SunAligner,
            Self::SunAligner => Self::RayTracer,
        }
    }
}

/// Owns the GPU context and both per-frame components.
///
/// # Construction
///
/// Use [`RenderEngine::new`] for a window surface or
/// [`RenderEngine::from_context`] for a pre-built (possibly headless)
/// [`RenderContext`].
///
/// # Frame loop
///
/// Each frame, call [`render`](Self::render) to draw and present, or
/// [`render_to_texture`](Self::render_to_texture) when there is no surface.
/// Call [`resize`](Self::resize) when the window size changes. Input is
/// forwarded via [`handle_input`](Self::handle_input) and
/// [`handle_key`](Self::handle_key).
///
/// # Lifecycle
///
/// The ray tracer is enabled while [`ViewMode::RayTracer`] is shown:
/// switching to the sun aligner disables it and releases the sphere buffer,
/// switching back generates a fresh scene.
pub struct RenderEngine {
    /// Core wgpu device, queue, and surface.
    pub context: RenderContext,
    _shader_composer: ShaderComposer,
    blitter: Blitter,
    aligner: HdriSunAligner,
    tracer: RayTracingController,

    /// Orbital camera controller.
    pub camera_controller: CameraController,
    mouse: MouseState,

    /// Loaded environment image, if any.
    environment: Option<HdriTexture>,
    /// Red 1×1 stand-in used as pass-through and aligner source without an
    /// environment.
    fallback: HdriTexture,

    /// Sanitized runtime options.
    options: Options,
    /// Currently applied options preset name, if any.
    active_preset: Option<String>,
    view_mode: ViewMode,
}

impl RenderEngine {
    /// Engine drawing into a window surface.
    ///
    /// # Errors
    ///
    /// Returns [`SolsticeError`] if GPU initialization or shader composition
    /// fails. An unreadable HDRI is logged and replaced by the fallback.
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        size: (u32, u32),
        options: Options,
        hdri_path: Option<&Path>,
    ) -> Result<Self, SolsticeError> {
        let context = RenderContext::new(window, size).await?;
        Self::from_context(context, options, hdri_path)
    }

    /// Engine from a pre-built [`RenderContext`] (headless rendering,
    /// embedding, tests).
    ///
    /// # Errors
    ///
    /// Returns [`SolsticeError::Shader`] if a kernel fails to compose.
    pub fn from_context(
        context: RenderContext,
        options: Options,
        hdri_path: Option<&Path>,
    ) -> Result<Self, SolsticeError> {
        let options = options.sanitized();
        let mut shader_composer = ShaderComposer::new()?;
        let blitter = Blitter::new(&context.device, &mut shader_composer)?;
        let aligner = HdriSunAligner::new(&context.device, &mut shader_composer)?;
        let mut tracer = RayTracingController::new(
            &context.device,
            &context.queue,
            &mut shader_composer,
            &options.scene,
        )?;
        tracer.enable(&context.device, &options.scene);

        let (width, height) = context.size();
        let aspect = width as f32 / height.max(1) as f32;
        let camera_controller = CameraController::new(&options.camera, aspect);

        let environment =
            hdri_path.and_then(|path| load_environment(&context, path));
        let fallback = fallback_texture(&context.device, &context.queue);

        Ok(Self {
            context,
            _shader_composer: shader_composer,
            blitter,
            aligner,
            tracer,
            camera_controller,
            mouse: MouseState::new(),
            environment,
            fallback,
            options,
            active_preset: None,
            view_mode: ViewMode::default(),
        })
    }

    /// Draw one frame into the next swapchain texture and present it.
    ///
    /// # Errors
    ///
    /// Returns [`wgpu::SurfaceError`] if the swapchain texture cannot be
    /// acquired (lost, outdated, timeout, or no surface).
    pub fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let frame = self.context.get_next_frame()?;
        let mut encoder = self.context.create_encoder();
        self.encode_frame(&mut encoder, &frame.texture);
        self.context.submit(encoder);
        frame.present();
        Ok(())
    }

    /// Draw one frame into `output` and submit it. Used without a surface.
    ///
    /// `output` must allow `RENDER_ATTACHMENT`, or `COPY_DST` with a format
    /// matching the component's final image.
    pub fn render_to_texture(&mut self, output: &wgpu::Texture) {
        let mut encoder = self.context.create_encoder();
        self.encode_frame(&mut encoder, output);
        self.context.submit(encoder);
    }

    fn encode_frame(
        &mut self,
        encoder: &mut wgpu::CommandEncoder,
        output: &wgpu::Texture,
    ) {
        let source = self.environment.as_ref().unwrap_or(&self.fallback);
        match self.view_mode {
            ViewMode::RayTracer => {
                let frame = FrameParams::from_camera(
                    &self.camera_controller.camera,
                    (output.width(), output.height()),
                );
                let textures = FrameTextures {
                    source: &source.texture,
                    skybox: self.environment.as_ref(),
                    output,
                };
                let _ = self.tracer.render(
                    &self.context,
                    encoder,
                    &mut self.blitter,
                    &frame,
                    &self.options,
                    &textures,
                );
            }
            ViewMode::SunAligner => self.aligner.render(
                &self.context,
                encoder,
                &mut self.blitter,
                &source.texture,
                output,
                &self.options.hdri,
            ),
        }
    }

    /// Handle window resize.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.context.resize(width, height);
        self.camera_controller.resize(width, height);
    }

    /// Replace the environment image.
    ///
    /// # Errors
    ///
    /// Returns [`SolsticeError::Io`] or [`SolsticeError::ImageLoad`] if the
    /// image cannot be read; the previous environment is kept.
    pub fn set_hdri(&mut self, path: &Path) -> Result<(), SolsticeError> {
        let texture = load_hdri(&self.context.device, &self.context.queue, path)?;
        self.environment = Some(texture);
        Ok(())
    }

    /// Whether an environment image is loaded.
    #[must_use]
    pub fn has_hdri(&self) -> bool {
        self.environment.is_some()
    }

    /// The displayed component.
    #[must_use]
    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    /// Show `mode`, enabling or disabling the ray tracer to match.
    pub fn set_view_mode(&mut self, mode: ViewMode) {
        if mode == self.view_mode {
            return;
        }
        log::debug!("view {:?} -> {mode:?}", self.view_mode);
        self.view_mode = mode;
        match mode {
            ViewMode::RayTracer => {
                self.tracer.enable(&self.context.device, &self.options.scene);
            }
            ViewMode::SunAligner => self.tracer.disable(),
        }
    }

    /// Switch between the ray tracer and the sun aligner.
    pub fn toggle_view(&mut self) {
        self.set_view_mode(self.view_mode.toggled());
    }

    /// Flip the ray tracer between tracing and pass-through.
    pub fn toggle_tracing(&mut self) {
        self.options.tracing.do_tracing = !self.options.tracing.do_tracing;
        log::debug!("tracing {}", self.options.tracing.do_tracing);
    }

    /// Generate a new sphere field. Ignored while the ray tracer is
    /// disabled.
    pub fn regenerate_scene(&mut self) {
        if !self.tracer.is_enabled() {
            log::debug!("scene regeneration ignored while ray tracer is disabled");
            return;
        }
        self.tracer
            .regenerate_scene(&self.context.device, &self.options.scene);
    }

    /// The ray tracing component, for inspecting its scene.
    #[must_use]
    pub fn tracer(&self) -> &RayTracingController {
        &self.tracer
    }

    /// The HDRI component.
    #[must_use]
    pub fn aligner(&self) -> &HdriSunAligner {
        &self.aligner
    }
}

fn load_environment(context: &RenderContext, path: &Path) -> Option<HdriTexture> {
    match load_hdri(&context.device, &context.queue, path) {
        Ok(texture) => Some(texture),
        Err(e) => {
            log::warn!("using fallback environment: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::test_support::{gpu, read_rgba32f, texture_with_data};

    fn engine(context: RenderContext) -> RenderEngine {
        let mut options = Options::default();
        options.scene.seed = Some(11);
        options.scene.max_spheres = 16;
        RenderEngine::from_context(context, options, None).unwrap()
    }

    #[test]
    fn view_mode_toggles_between_components() {
        assert_eq!(ViewMode::default(), ViewMode::RayTracer);
        assert_eq!(ViewMode::RayTracer.toggled(), ViewMode::SunAligner);
        assert_eq!(ViewMode::SunAligner.toggled(), ViewMode::RayTracer);
    }

    #[test]
    fn tracer_follows_the_view() {
        let Some(context) = gpu() else { return };
        let mut engine = engine(context);
        assert!(engine.tracer().is_enabled());
        assert!(engine.tracer().has_scene_buffer());

        engine.toggle_view();
        assert_eq!(engine.view_mode(), ViewMode::SunAligner);
        assert!(!engine.tracer().is_enabled());
        assert!(!engine.tracer().has_scene_buffer());
        assert_eq!(engine.tracer().spheres().len(), 16);

        engine.regenerate_scene();
        assert!(!engine.tracer().has_scene_buffer());

        engine.toggle_view();
        assert!(engine.tracer().is_enabled());
        assert!(engine.tracer().has_scene_buffer());
    }

    #[test]
    fn missing_hdri_falls_back() {
        let Some(context) = gpu() else { return };
        let engine = RenderEngine::from_context(
            context,
            Options::default(),
            Some(Path::new("/nonexistent/sky.hdr")),
        )
        .unwrap();
        assert!(!engine.has_hdri());
    }

    #[test]
    fn both_views_render_to_a_texture() {
        let Some(context) = gpu() else { return };
        let mut engine = engine(context);
        let output = texture_with_data(&engine.context, 8, 8, &[0.0; 256]);

        engine.render_to_texture(&output);
        let traced = read_rgba32f(&engine.context, &output);
        assert!(traced.iter().all(|v| v.is_finite()));
        assert!(traced.iter().any(|&v| v > 0.0));

        engine.toggle_view();
        engine.render_to_texture(&output);
        let adjusted = read_rgba32f(&engine.context, &output);
        assert!(adjusted.iter().all(|v| v.is_finite()));
    }
}
