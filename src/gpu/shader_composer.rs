use std::borrow::Cow;
use std::collections::HashMap;

use naga_oil::compose::{
    ComposableModuleDescriptor, Composer, NagaModuleDescriptor, ShaderDefValue,
    ShaderLanguage, ShaderType,
};

use crate::error::SolsticeError;

/// Full-screen triangle blit.
pub const BLIT_SHADER: (&str, &str) = (
    include_str!("../../assets/shaders/screen/blit.wgsl"),
    "screen/blit.wgsl",
);

/// `ConvertToGrayscale` / `Blur` / `SetExposure` kernels.
pub const HDRI_ADJUST_SHADER: (&str, &str) = (
    include_str!("../../assets/shaders/compute/hdri_adjust.wgsl"),
    "compute/hdri_adjust.wgsl",
);

/// `CSMain` sphere ray tracing kernel.
pub const RAY_TRACE_SHADER: (&str, &str) = (
    include_str!("../../assets/shaders/compute/ray_trace.wgsl"),
    "compute/ray_trace.wgsl",
);

/// Wraps `naga_oil::compose::Composer` to provide shader composition with
/// `#import` and `#ifdef` support.
///
/// Pre-loads all shared WGSL modules at construction time. Consuming shaders
/// use `#import solstice::module_name` to pull in shared code. The composer
/// produces `naga::Module` IR directly, skipping WGSL re-parse at runtime.
pub struct ShaderComposer {
    composer: Composer,
}

/// Shared module definition.
struct ModuleDef {
    source: &'static str,
    file_path: &'static str,
}

const SHARED_MODULES: &[ModuleDef] = &[ModuleDef {
    source: include_str!("../../assets/shaders/modules/fullscreen.wgsl"),
    file_path: "modules/fullscreen.wgsl",
}];

impl ShaderComposer {
    /// Composer with every shared module registered.
    ///
    /// # Errors
    ///
    /// Returns [`SolsticeError::Shader`] if a shared module fails to parse.
    pub fn new() -> Result<Self, SolsticeError> {
        let mut composer = Composer::default();

        // Register shared modules in dependency order.
        for m in SHARED_MODULES {
            let _ = composer
                .add_composable_module(ComposableModuleDescriptor {
                    source: m.source,
                    file_path: m.file_path,
                    language: ShaderLanguage::Wgsl,
                    ..Default::default()
                })
                .map_err(|e| {
                    SolsticeError::Shader(format!(
                        "failed to register module '{}': {e:?}",
                        m.file_path
                    ))
                })?;
        }

        Ok(Self { composer })
    }

    /// Compose a shader source string (which may contain `#import` and
    /// `#ifdef` directives) into a `wgpu::ShaderModule`.
    ///
    /// # Errors
    ///
    /// Returns [`SolsticeError::Shader`] if composition fails.
    pub fn compose(
        &mut self,
        device: &wgpu::Device,
        label: &str,
        (source, file_path): (&str, &str),
        defs: &[&str],
    ) -> Result<wgpu::ShaderModule, SolsticeError> {
        let naga_module = self.compose_naga(source, file_path, defs)?;
        Ok(device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(label),
            source: wgpu::ShaderSource::Naga(Cow::Owned(naga_module)),
        }))
    }

    /// Compose a shader source into a `naga::Module` without creating a wgpu
    /// shader module. Useful for testing shader composition without a GPU
    /// device.
    ///
    /// # Errors
    ///
    /// Returns [`SolsticeError::Shader`] if composition fails.
    pub fn compose_naga(
        &mut self,
        source: &str,
        file_path: &str,
        defs: &[&str],
    ) -> Result<naga::Module, SolsticeError> {
        let shader_defs: HashMap<String, ShaderDefValue> = defs
            .iter()
            .map(|d| ((*d).to_owned(), ShaderDefValue::Bool(true)))
            .collect();
        self.composer
            .make_naga_module(NagaModuleDescriptor {
                source,
                file_path,
                shader_type: ShaderType::Wgsl,
                shader_defs,
                ..Default::default()
            })
            .map_err(|e| {
                SolsticeError::Shader(format!(
                    "failed to compose '{file_path}': {}",
                    e.emit_to_string(&self.composer)
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::sun_aligner::SCRATCH_FORMATS;

    fn validate(module: &naga::Module) {
        let mut validator = naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::default(),
        );
        let _ = validator.validate(module).unwrap();
    }

    fn has_entry_point(module: &naga::Module, name: &str) -> bool {
        module.entry_points.iter().any(|ep| ep.name == name)
    }

    #[test]
    fn blit_shader_composes() {
        let mut composer = ShaderComposer::new().unwrap();
        let (source, path) = BLIT_SHADER;
        let module = composer.compose_naga(source, path, &[]).unwrap();
        validate(&module);
        assert!(has_entry_point(&module, "vs_main"));
        assert!(has_entry_point(&module, "fs_main"));
    }

    #[test]
    fn hdri_kernels_compose_for_every_scratch_format() {
        let mut composer = ShaderComposer::new().unwrap();
        let (source, path) = HDRI_ADJUST_SHADER;
        for &(_, def) in SCRATCH_FORMATS {
            let module = composer.compose_naga(source, path, &[def]).unwrap();
            validate(&module);
            for kernel in ["ConvertToGrayscale", "Blur", "SetExposure"] {
                assert!(has_entry_point(&module, kernel), "{kernel} missing");
            }
        }
    }

    #[test]
    fn ray_trace_kernel_composes() {
        let mut composer = ShaderComposer::new().unwrap();
        let (source, path) = RAY_TRACE_SHADER;
        let module = composer.compose_naga(source, path, &[]).unwrap();
        validate(&module);
        assert!(has_entry_point(&module, "CSMain"));
    }
}
