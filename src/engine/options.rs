//! Options methods for RenderEngine

use std::path::Path;

use super::RenderEngine;
use crate::options::Options;

impl RenderEngine {
    /// Current (sanitized) options.
    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Name of the last loaded or saved preset.
    #[must_use]
    pub fn active_preset(&self) -> Option<&str> {
        self.active_preset.as_deref()
    }

    /// Replace options and apply all changes to subsystems.
    ///
    /// Values are clamped into range first. A changed `[scene]` section
    /// regenerates the sphere field when the ray tracer is enabled; a changed
    /// seed restarts the scene RNG first.
    pub fn set_options(&mut self, new: Options) {
        let new = new.sanitized();
        let scene_changed = new.scene != self.options.scene;
        if new.scene.seed != self.options.scene.seed {
            self.tracer.reseed(&new.scene);
        }
        self.options = new;
        self.camera_controller.apply_options(&self.options.camera);
        if scene_changed {
            log::debug!("scene options changed");
            self.regenerate_scene();
        }
    }

    /// Load a named preset from the presets directory.
    /// Returns true on success.
    pub fn load_preset(&mut self, name: &str, presets_dir: &Path) -> bool {
        let path = presets_dir.join(format!("{name}.toml"));
        match Options::load(&path) {
            Ok(opts) => {
                log::info!("Loaded preset '{name}'");
                self.set_options(opts);
                self.active_preset = Some(name.to_owned());
                true
            }
            Err(e) => {
                log::error!("Failed to load preset '{name}': {e}");
                false
            }
        }
    }

    /// Save the current options as a named preset.
    /// Returns true on success.
    pub fn save_preset(&mut self, name: &str, presets_dir: &Path) -> bool {
        let path = presets_dir.join(format!("{name}.toml"));
        match self.options.save(&path) {
            Ok(()) => {
                log::info!("Saved preset '{name}'");
                self.active_preset = Some(name.to_owned());
                true
            }
            Err(e) => {
                log::error!("Failed to save preset '{name}': {e}");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::engine::RenderEngine;
    use crate::options::{Options, MAX_SIGMA};
    use crate::renderer::test_support::gpu;

    #[test]
    fn set_options_sanitizes_and_regenerates() {
        let Some(context) = gpu() else { return };
        let mut engine =
            RenderEngine::from_context(context, Options::default(), None).unwrap();

        let mut opts = engine.options().clone();
        opts.hdri.sigma = 100;
        opts.scene.max_spheres = 5;
        engine.set_options(opts);

        assert_eq!(engine.options().hdri.sigma, MAX_SIGMA);
        assert_eq!(engine.tracer().spheres().len(), 5);
    }

    #[test]
    fn changed_seed_reproduces_a_fresh_seeded_scene() {
        let (Some(first), Some(second)) = (gpu(), gpu()) else { return };
        let mut seeded = Options::default();
        seeded.scene.seed = Some(5);
        seeded.scene.max_spheres = 16;

        let mut engine =
            RenderEngine::from_context(first, Options::default(), None).unwrap();
        engine.set_options(seeded.clone());
        let fresh = RenderEngine::from_context(second, seeded, None).unwrap();

        assert_eq!(engine.tracer().spheres(), fresh.tracer().spheres());
    }

    #[test]
    fn presets_round_trip_through_a_directory() {
        let Some(context) = gpu() else { return };
        let mut engine =
            RenderEngine::from_context(context, Options::default(), None).unwrap();
        let dir = std::env::temp_dir().join("solstice-preset-test");

        let mut opts = engine.options().clone();
        opts.lighting.sun_intensity = 2.5;
        engine.set_options(opts);
        assert!(engine.save_preset("bright", &dir));

        engine.set_options(Options::default());
        assert!(engine.load_preset("bright", &dir));
        assert_eq!(engine.options().lighting.sun_intensity, 2.5);
        assert_eq!(engine.active_preset(), Some("bright"));
        assert!(!engine.load_preset("missing", &dir));
    }
}
