use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::finite_or;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Lighting", inline)]
#[serde(default)]
/// Sun and sky parameters for the ray tracer.
pub struct LightingOptions {
    /// Multiplier on skybox radiance.
    #[schemars(title = "Skybox Exposure", range(min = 0.0, max = 1.0), extend("step" = 0.01))]
    pub skybox_exposure: f32,
    /// Directional light strength.
    #[schemars(title = "Sun Intensity", range(min = 0.0, max = 4.0), extend("step" = 0.05))]
    pub sun_intensity: f32,
    /// Sun pitch and yaw in degrees, applied to the forward axis.
    #[schemars(skip)]
    pub sun_rotation: [f32; 2],
}

impl Default for LightingOptions {
    fn default() -> Self {
        Self {
            skybox_exposure: 1.0,
            sun_intensity: 1.0,
            sun_rotation: [45.0, 30.0],
        }
    }
}

impl LightingOptions {
    pub(super) fn sanitize(&mut self) {
        let defaults = Self::default();
        self.skybox_exposure =
            finite_or(self.skybox_exposure, defaults.skybox_exposure).clamp(0.0, 1.0);
        self.sun_intensity =
            finite_or(self.sun_intensity, defaults.sun_intensity).max(0.0);
        for (angle, default) in self.sun_rotation.iter_mut().zip(defaults.sun_rotation) {
            *angle = finite_or(*angle, default);
        }
    }
}
