use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::finite_or;

/// Largest blur sigma, in pixels.
pub const MAX_SIGMA: i32 = 16;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "HDRI Adjust", inline)]
#[serde(default)]
/// Parameters of the grayscale / blur / exposure kernels.
///
/// Disabled stages still dispatch and copy their input through.
pub struct HdriOptions {
    /// Replace color with luminance.
    #[schemars(title = "Grayscale")]
    pub do_grayscale: bool,
    /// Apply the Gaussian blur.
    #[schemars(title = "Blur")]
    pub do_blur: bool,
    /// Blur standard deviation in pixels.
    #[schemars(title = "Sigma", range(min = 0, max = 16))]
    pub sigma: i32,
    /// Multiplier on the final color.
    #[schemars(title = "Exposure", range(min = 0.0, max = 1.0), extend("step" = 0.01))]
    pub exposure: f32,
}

impl Default for HdriOptions {
    fn default() -> Self {
        Self {
            do_grayscale: true,
            do_blur: true,
            sigma: 4,
            exposure: 1.0,
        }
    }
}

impl HdriOptions {
    pub(super) fn sanitize(&mut self) {
        self.sigma = self.sigma.clamp(0, MAX_SIGMA);
        self.exposure = finite_or(self.exposure, 1.0).clamp(0.0, 1.0);
    }
}
