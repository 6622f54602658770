use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::finite_or;

/// Smallest accepted resolution scale.
pub const MIN_RENDER_SCALE: f32 = 0.001;
/// Most secondary bounces the kernel will follow.
pub const MAX_BOUNCES: u32 = 7;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Ray Tracing", inline)]
#[serde(default)]
/// Ray tracer state and quality.
pub struct TracingOptions {
    /// When off, the source image passes through untouched.
    #[schemars(title = "Enabled")]
    pub do_tracing: bool,
    /// Fraction of the display resolution to trace at.
    #[schemars(title = "Resolution Scale", range(min = 0.001, max = 1.0), extend("step" = 0.01))]
    pub render_scale: f32,
    /// Reflection bounces after the primary hit.
    #[schemars(title = "Bounces", range(min = 0, max = 7))]
    pub bounces: u32,
}

impl Default for TracingOptions {
    fn default() -> Self {
        Self {
            do_tracing: true,
            render_scale: 1.0,
            bounces: 2,
        }
    }
}

impl TracingOptions {
    pub(super) fn sanitize(&mut self) {
        self.render_scale =
            finite_or(self.render_scale, 1.0).clamp(MIN_RENDER_SCALE, 1.0);
        self.bounces = self.bounces.min(MAX_BOUNCES);
    }
}
