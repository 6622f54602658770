use glam::{Mat4, Vec3};

use crate::options::CameraOptions;

/// Perspective camera defined by eye position, target, and projection
/// parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// Eye (camera) position in world space.
    pub eye: Vec3,
    /// Look-at target position.
    pub target: Vec3,
    /// Up direction vector.
    pub up: Vec3,
    /// Viewport aspect ratio (width / height).
    pub aspect: f32,
    /// Vertical field of view in degrees.
    pub fovy: f32,
    /// Near clipping plane distance.
    pub znear: f32,
    /// Far clipping plane distance.
    pub zfar: f32,
}

impl Camera {
    /// Camera at `eye` looking at `target`, projection from `options`.
    #[must_use]
    pub fn new(eye: Vec3, target: Vec3, aspect: f32, options: &CameraOptions) -> Self {
        Self {
            eye,
            target,
            up: Vec3::Y,
            aspect,
            fovy: options.fovy,
            znear: options.znear,
            zfar: options.zfar,
        }
    }

    /// World → view transform.
    #[must_use]
    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    /// View → world transform; its translation column is the eye.
    #[must_use]
    pub fn camera_to_world(&self) -> Mat4 {
        self.view().inverse()
    }

    /// Projection with wgpu's `[0, 1]` depth range.
    #[must_use]
    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh(
            self.fovy.to_radians(),
            self.aspect,
            self.znear,
            self.zfar,
        )
    }

    /// Clip → view transform used to turn NDC into view rays.
    #[must_use]
    pub fn inverse_projection(&self) -> Mat4 {
        self.projection().inverse()
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec4;

    use super::*;

    fn camera() -> Camera {
        Camera::new(
            Vec3::new(0.0, 2.0, 10.0),
            Vec3::new(0.0, 2.0, 0.0),
            16.0 / 9.0,
            &CameraOptions::default(),
        )
    }

    #[test]
    fn camera_to_world_places_the_eye() {
        let origin = camera().camera_to_world() * Vec4::W;
        assert!((origin.truncate() - Vec3::new(0.0, 2.0, 10.0)).length() < 1e-4);
    }

    #[test]
    fn center_ray_points_at_target() {
        let cam = camera();
        let view_dir = (cam.inverse_projection() * Vec4::new(0.0, 0.0, 0.0, 1.0)).truncate();
        let world_dir = (cam.camera_to_world() * view_dir.extend(0.0)).truncate().normalize();
        assert!((world_dir - Vec3::NEG_Z).length() < 1e-4);
    }

    #[test]
    fn top_of_screen_looks_up() {
        let cam = camera();
        let view_dir = (cam.inverse_projection() * Vec4::new(0.0, 1.0, 0.0, 1.0)).truncate();
        let world_dir = (cam.camera_to_world() * view_dir.extend(0.0)).truncate().normalize();
        let half_fov = (cam.fovy / 2.0).to_radians();
        assert!((world_dir.y - half_fov.sin()).abs() < 1e-3);
    }
}
