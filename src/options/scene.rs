use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::finite_or;

/// Largest sphere count; keeps the sphere buffer under the storage binding
/// limit.
pub const MAX_SPHERES: usize = 1024;
/// Largest placement disk radius.
pub const MAX_PLACEMENT_RADIUS: f32 = 100.0;
/// Largest sphere radius.
pub const MAX_SPHERE_RADIUS: f32 = 10.0;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Scene", inline)]
#[serde(default)]
/// Procedural sphere field parameters.
pub struct SceneOptions {
    /// Number of sphere slots generated per pass.
    #[schemars(title = "Max Spheres", range(min = 1, max = 1024))]
    pub max_spheres: usize,
    /// Radius of the disk sphere centers are drawn from.
    #[schemars(title = "Placement Radius", range(min = 0.0, max = 100.0), extend("step" = 0.5))]
    pub placement_radius: f32,
    /// Smallest sphere radius.
    #[schemars(title = "Min Radius", range(min = 0.0, max = 10.0), extend("step" = 0.05))]
    pub sphere_radius_min: f32,
    /// Largest sphere radius.
    #[schemars(title = "Max Radius", range(min = 0.0, max = 10.0), extend("step" = 0.05))]
    pub sphere_radius_max: f32,
    /// Radius of the sphere around the eye that bounced rays can hit.
    #[schemars(title = "Camera Sphere", range(min = 0.0, max = 1.0), extend("step" = 0.01))]
    pub camera_sphere_radius: f32,
    /// Fixed RNG seed; a fresh seed per run when unset.
    #[schemars(skip)]
    pub seed: Option<u64>,
}

impl Default for SceneOptions {
    fn default() -> Self {
        Self {
            max_spheres: 64,
            placement_radius: 5.0,
            sphere_radius_min: 0.25,
            sphere_radius_max: 1.5,
            camera_sphere_radius: 0.25,
            seed: None,
        }
    }
}

impl SceneOptions {
    pub(super) fn sanitize(&mut self) {
        let defaults = Self::default();
        self.max_spheres = self.max_spheres.clamp(1, MAX_SPHERES);
        self.placement_radius =
            finite_or(self.placement_radius, defaults.placement_radius)
                .clamp(0.0, MAX_PLACEMENT_RADIUS);
        self.sphere_radius_min =
            finite_or(self.sphere_radius_min, defaults.sphere_radius_min)
                .clamp(0.0, MAX_SPHERE_RADIUS);
        self.sphere_radius_max =
            finite_or(self.sphere_radius_max, defaults.sphere_radius_max)
                .clamp(0.0, MAX_SPHERE_RADIUS);
        if self.sphere_radius_min > self.sphere_radius_max {
            std::mem::swap(&mut self.sphere_radius_min, &mut self.sphere_radius_max);
        }
        self.camera_sphere_radius =
            finite_or(self.camera_sphere_radius, defaults.camera_sphere_radius)
                .clamp(0.0, 1.0);
    }
}
