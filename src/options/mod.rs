//! Centralized runtime options with TOML preset support.
//!
//! Ray tracing, lighting, scene generation, HDRI adjustment, camera and
//! keybinding settings are consolidated here. Options serialize to/from TOML
//! for presets stored in `assets/presets/`.
//!
//! Renderers only ever see [`Options::sanitized`] output, so values loaded
//! from a hand-edited preset are clamped into range before use.

mod camera;
mod hdri;
mod keybindings;
mod lighting;
mod scene;
mod tracing;

use std::path::Path;

pub use camera::CameraOptions;
pub use hdri::{HdriOptions, MAX_SIGMA};
pub use keybindings::KeybindingOptions;
pub use lighting::LightingOptions;
use schemars::JsonSchema;
pub use scene::{
    SceneOptions, MAX_PLACEMENT_RADIUS, MAX_SPHERES, MAX_SPHERE_RADIUS,
};
use serde::{Deserialize, Serialize};
pub use tracing::{TracingOptions, MAX_BOUNCES, MIN_RENDER_SCALE};

use crate::error::SolsticeError;

/// Top-level options container. All sub-structs use `#[serde(default)]` so
/// partial TOML files (e.g. only overriding `[hdri]`) work correctly.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema,
)]
#[serde(default)]
pub struct Options {
    /// Ray tracer toggle and quality.
    pub tracing: TracingOptions,
    /// Sun and skybox parameters.
    pub lighting: LightingOptions,
    /// Sphere field generation.
    pub scene: SceneOptions,
    /// HDRI grayscale / blur / exposure.
    pub hdri: HdriOptions,
    /// Camera projection and control parameters.
    pub camera: CameraOptions,
    /// Keyboard binding options.
    #[schemars(skip)]
    pub keybindings: KeybindingOptions,
}

impl Options {
    /// Generate JSON Schema describing the UI-exposed options.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Options)
    }

    /// Load options from a TOML file. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// [`SolsticeError::Io`] if the file cannot be read,
    /// [`SolsticeError::OptionsParse`] if it is not valid TOML for these
    /// options.
    pub fn load(path: &Path) -> Result<Self, SolsticeError> {
        let content = std::fs::read_to_string(path).map_err(SolsticeError::Io)?;
        toml::from_str(&content)
            .map_err(|e| SolsticeError::OptionsParse(e.to_string()))
    }

    /// Save options to a TOML file (pretty-printed).
    ///
    /// # Errors
    ///
    /// [`SolsticeError::OptionsParse`] if serialization fails,
    /// [`SolsticeError::Io`] if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), SolsticeError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| SolsticeError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(SolsticeError::Io)?;
        }
        std::fs::write(path, content).map_err(SolsticeError::Io)
    }

    /// List available preset names (TOML file stems) in a directory.
    #[must_use]
    pub fn list_presets(dir: &Path) -> Vec<String> {
        let mut names = Vec::new();
        if let Ok(entries) = std::fs::read_dir(dir) {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.extension().is_some_and(|ext| ext == "toml") {
                    if let Some(stem) =
                        path.file_stem().and_then(|s| s.to_str())
                    {
                        names.push(stem.to_owned());
                    }
                }
            }
        }
        names.sort();
        names
    }

    /// A copy with every field clamped into its valid range.
    #[must_use]
    pub fn sanitized(&self) -> Self {
        let mut opts = self.clone();
        opts.tracing.sanitize();
        opts.lighting.sanitize();
        opts.scene.sanitize();
        opts.hdri.sanitize();
        opts
    }
}

/// `value` when finite, otherwise `fallback`. TOML accepts `inf` and `nan`.
fn finite_or(value: f32, fallback: f32) -> f32 {
    if value.is_finite() {
        value
    } else {
        fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::KeyAction;

    #[test]
    fn default_round_trips_through_toml() {
        let opts = Options::default();
        let toml_str = toml::to_string_pretty(&opts).unwrap();
        let parsed: Options = toml::from_str(&toml_str).unwrap();
        assert_eq!(opts, parsed);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let toml_str = r"
[hdri]
sigma = 9
";
        let opts: Options = toml::from_str(toml_str).unwrap();
        assert_eq!(opts.hdri.sigma, 9);
        // Everything else should be default
        assert!(opts.hdri.do_blur);
        assert_eq!(opts.hdri.exposure, 1.0);
        assert_eq!(opts.scene.max_spheres, 64);
        assert_eq!(opts.tracing.bounces, 2);
    }

    #[test]
    fn seed_is_optional() {
        let opts: Options = toml::from_str("[scene]\nseed = 17\n").unwrap();
        assert_eq!(opts.scene.seed, Some(17));
        assert_eq!(Options::default().scene.seed, None);
    }

    #[test]
    fn sanitize_clamps_out_of_range_values() {
        let toml_str = r"
[tracing]
render_scale = 0.0
bounces = 12

[lighting]
skybox_exposure = 3.0
sun_intensity = -1.0

[scene]
max_spheres = 0
sphere_radius_min = 2.0
sphere_radius_max = 0.5
camera_sphere_radius = 5.0

[hdri]
sigma = -3
exposure = 1.5
";
        let opts = toml::from_str::<Options>(toml_str).unwrap().sanitized();
        assert_eq!(opts.tracing.render_scale, MIN_RENDER_SCALE);
        assert_eq!(opts.tracing.bounces, MAX_BOUNCES);
        assert_eq!(opts.lighting.skybox_exposure, 1.0);
        assert_eq!(opts.lighting.sun_intensity, 0.0);
        assert_eq!(opts.scene.max_spheres, 1);
        assert_eq!(opts.scene.sphere_radius_min, 0.5);
        assert_eq!(opts.scene.sphere_radius_max, 2.0);
        assert_eq!(opts.scene.camera_sphere_radius, 1.0);
        assert_eq!(opts.hdri.sigma, 0);
        assert_eq!(opts.hdri.exposure, 1.0);
    }

    #[test]
    fn sanitize_replaces_non_finite_values() {
        let toml_str = r"
[tracing]
render_scale = nan

[lighting]
skybox_exposure = nan
sun_intensity = inf
sun_rotation = [nan, -inf]

[scene]
max_spheres = 100000
placement_radius = -inf
sphere_radius_min = nan
sphere_radius_max = inf
camera_sphere_radius = nan

[hdri]
exposure = -nan
";
        let opts = toml::from_str::<Options>(toml_str).unwrap().sanitized();
        let defaults = Options::default();
        assert_eq!(opts.tracing.render_scale, 1.0);
        assert_eq!(opts.lighting, defaults.lighting);
        assert_eq!(opts.scene.max_spheres, MAX_SPHERES);
        assert_eq!(opts.scene.placement_radius, defaults.scene.placement_radius);
        assert_eq!(opts.scene.sphere_radius_min, defaults.scene.sphere_radius_min);
        assert_eq!(opts.scene.sphere_radius_max, defaults.scene.sphere_radius_max);
        assert_eq!(
            opts.scene.camera_sphere_radius,
            defaults.scene.camera_sphere_radius
        );
        assert_eq!(opts.hdri.exposure, 1.0);
    }

    #[test]
    fn sanitized_scene_options_always_generate() {
        use rand::rngs::StdRng;
        use rand::SeedableRng;

        use crate::scene::{GeneratorParams, SceneGenerator};

        let toml_str = "[scene]\nmax_spheres = 5000\nsphere_radius_max = inf\n";
        let opts = toml::from_str::<Options>(toml_str).unwrap().sanitized();
        let scene = SceneGenerator::new(GeneratorParams::from(&opts.scene))
            .generate(&mut StdRng::seed_from_u64(9));
        assert_eq!(scene.len(), MAX_SPHERES);
        assert!(scene
            .placed()
            .all(|s| s.radius.is_finite() && s.radius <= MAX_SPHERE_RADIUS));
    }

    #[test]
    fn sanitize_keeps_valid_values() {
        let opts = Options::default();
        assert_eq!(opts.sanitized(), opts);
    }

    #[test]
    fn keybinding_lookup() {
        let opts = Options::default();
        assert_eq!(
            opts.keybindings.lookup("KeyG"),
            Some(KeyAction::RegenerateScene)
        );
        assert_eq!(opts.keybindings.lookup("KeyT"), Some(KeyAction::ToggleTracing));
        assert_eq!(opts.keybindings.lookup("KeyZ"), None);
    }

    #[test]
    fn loaded_keybindings_are_immediately_usable() {
        let toml_str = r#"
[keybindings.bindings]
regenerate_scene = "Space"
"#;
        let opts: Options = toml::from_str(toml_str).unwrap();
        assert_eq!(
            opts.keybindings.lookup("Space"),
            Some(KeyAction::RegenerateScene)
        );
        assert_eq!(opts.keybindings.lookup("KeyG"), None);
    }

    #[test]
    fn rebinding_updates_lookup() {
        let mut bindings = KeybindingOptions::default();
        bindings.bind(KeyAction::ToggleView, "KeyH");
        assert_eq!(bindings.lookup("KeyH"), Some(KeyAction::ToggleView));
        assert_eq!(bindings.lookup("KeyV"), None);
    }

    #[test]
    fn save_then_load_preserves_options() {
        let dir = std::env::temp_dir().join(format!("solstice-options-{}", std::process::id()));
        let path = dir.join("custom.toml");
        let mut opts = Options::default();
        opts.scene.seed = Some(3);
        opts.tracing.render_scale = 0.5;
        opts.save(&path).unwrap();

        assert_eq!(Options::load(&path).unwrap(), opts);
        assert_eq!(Options::list_presets(&dir), vec!["custom".to_owned()]);
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn load_reports_parse_errors() {
        let dir = std::env::temp_dir().join(format!("solstice-bad-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("broken.toml");
        std::fs::write(&path, "[scene]\nmax_spheres = \"lots\"\n").unwrap();
        assert!(matches!(Options::load(&path), Err(SolsticeError::OptionsParse(_))));
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn shipped_presets_parse() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("assets/presets");
        let names = Options::list_presets(&dir);
        assert!(names.contains(&"default".to_owned()));
        for name in names {
            let _ = Options::load(&dir.join(format!("{name}.toml"))).unwrap();
        }
    }

    #[test]
    fn schema_has_expected_properties() {
        let schema_value =
            serde_json::to_value(Options::json_schema()).unwrap();
        let props = schema_value["properties"].as_object().unwrap();

        for section in ["tracing", "lighting", "scene", "hdri", "camera"] {
            assert!(props.contains_key(section), "{section} missing");
        }
        assert!(!props.contains_key("keybindings"));

        let scene = &props["scene"]["properties"];
        assert!(scene.get("max_spheres").is_some());
        assert!(scene.get("seed").is_none());
        let lighting = &props["lighting"]["properties"];
        assert!(lighting.get("sun_intensity").is_some());
        assert!(lighting.get("sun_rotation").is_none());
    }
}
