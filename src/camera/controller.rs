use glam::{Quat, Vec2, Vec3};

use crate::camera::core::Camera;
use crate::input::MouseGesture;
use crate::options::CameraOptions;

/// Radians of orbit per pixel at `rotate_speed = 1`.
const ROTATE_SCALE: f32 = 0.01;
/// Fraction of the orbit distance panned per pixel at `pan_speed = 1`.
const PAN_SCALE: f32 = 0.002;
const MIN_DISTANCE: f32 = 0.5;
const MAX_DISTANCE: f32 = 500.0;

/// Orbit camera around a focus point.
///
/// Holds the camera as an orientation and distance from the focus; `eye`,
/// `target` and `up` are derived after every change.
pub struct CameraController {
    orientation: Quat,
    distance: f32,
    focus_point: Vec3,
    home: (Quat, f32, Vec3),

    /// The derived camera.
    pub camera: Camera,
    rotate_speed: f32,
    pan_speed: f32,
    zoom_speed: f32,
}

impl CameraController {
    /// Orbit looking slightly down at the scene center.
    #[must_use]
    pub fn new(options: &CameraOptions, aspect: f32) -> Self {
        let focus_point = Vec3::new(0.0, 0.5, 0.0);
        let distance = 12.0;
        let orientation = Quat::from_rotation_x(-20f32.to_radians());

        let mut controller = Self {
            orientation,
            distance,
            focus_point,
            home: (orientation, distance, focus_point),
            camera: Camera::new(Vec3::Z, Vec3::ZERO, aspect, options),
            rotate_speed: options.rotate_speed,
            pan_speed: options.pan_speed,
            zoom_speed: options.zoom_speed,
        };
        controller.update_camera_pos();
        controller
    }

    fn update_camera_pos(&mut self) {
        let dir = self.orientation * Vec3::Z;

        self.camera.eye = self.focus_point + (dir * self.distance);
        self.camera.target = self.focus_point;
        self.camera.up = self.orientation * Vec3::Y;
    }

    /// Pick up changed projection and sensitivity options.
    pub fn apply_options(&mut self, options: &CameraOptions) {
        self.camera.fovy = options.fovy;
        self.camera.znear = options.znear;
        self.camera.zfar = options.zfar;
        self.rotate_speed = options.rotate_speed;
        self.pan_speed = options.pan_speed;
        self.zoom_speed = options.zoom_speed;
    }

    /// Track a new viewport size.
    pub fn resize(&mut self, width: u32, height: u32) {
        if height > 0 {
            self.camera.aspect = width as f32 / height as f32;
        }
    }

    /// Apply a mouse gesture.
    pub fn apply(&mut self, gesture: MouseGesture) {
        match gesture {
            MouseGesture::Rotate(delta) => self.rotate(delta),
            MouseGesture::Pan(delta) => self.pan(delta),
            MouseGesture::Zoom(delta) => self.zoom(delta),
        }
    }

    /// Orbit by a cursor delta in pixels.
    pub fn rotate(&mut self, delta: Vec2) {
        let speed = self.rotate_speed * ROTATE_SCALE;

        // Horizontal rotation around the world up axis keeps the horizon level.
        let horizontal = Quat::from_rotation_y(-delta.x * speed);
        self.orientation = horizontal * self.orientation;

        let right = self.orientation * Vec3::X;
        let vertical = Quat::from_axis_angle(right, -delta.y * speed);
        self.orientation = (vertical * self.orientation).normalize();

        self.update_camera_pos();
    }

    /// Move the focus point in the view plane.
    pub fn pan(&mut self, delta: Vec2) {
        let right = self.orientation * Vec3::X;
        let up = self.orientation * Vec3::Y;
        let speed = self.pan_speed * PAN_SCALE * self.distance;

        self.focus_point += right * (-delta.x * speed) + up * (delta.y * speed);
        self.update_camera_pos();
    }

    /// Dolly toward (positive) or away from the focus point.
    pub fn zoom(&mut self, delta: f32) {
        self.distance *= 1.0 - delta * self.zoom_speed;
        self.distance = self.distance.clamp(MIN_DISTANCE, MAX_DISTANCE);
        self.update_camera_pos();
    }

    /// Return to the initial orbit.
    pub fn reset(&mut self) {
        (self.orientation, self.distance, self.focus_point) = self.home;
        self.update_camera_pos();
    }

    /// Distance from eye to focus point.
    #[must_use]
    pub fn distance(&self) -> f32 {
        self.distance
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> CameraController {
        CameraController::new(&CameraOptions::default(), 1.0)
    }

    #[test]
    fn eye_sits_at_orbit_distance() {
        let c = controller();
        let d = c.camera.eye.distance(c.camera.target);
        assert!((d - c.distance()).abs() < 1e-4);
        assert!(c.camera.eye.y > c.camera.target.y);
    }

    #[test]
    fn rotation_preserves_distance() {
        let mut c = controller();
        c.rotate(Vec2::new(40.0, -25.0));
        let d = c.camera.eye.distance(c.camera.target);
        assert!((d - c.distance()).abs() < 1e-3);
    }

    #[test]
    fn zoom_is_clamped() {
        let mut c = controller();
        for _ in 0..200 {
            c.zoom(5.0);
        }
        assert_eq!(c.distance(), MIN_DISTANCE);
        for _ in 0..200 {
            c.zoom(-5.0);
        }
        assert_eq!(c.distance(), MAX_DISTANCE);
    }

    #[test]
    fn pan_moves_eye_and_target_together() {
        let mut c = controller();
        let offset = c.camera.eye - c.camera.target;
        c.pan(Vec2::new(30.0, 10.0));
        assert!((c.camera.eye - c.camera.target - offset).length() < 1e-4);
        assert!(c.camera.target != Vec3::new(0.0, 0.5, 0.0));
    }

    #[test]
    fn reset_restores_home() {
        let mut c = controller();
        let home = c.camera;
        c.apply(MouseGesture::Rotate(Vec2::new(100.0, 50.0)));
        c.apply(MouseGesture::Zoom(2.0));
        c.reset();
        assert!((c.camera.eye - home.eye).length() < 1e-5);
    }

    #[test]
    fn resize_ignores_zero_height() {
        let mut c = controller();
        c.resize(800, 0);
        assert_eq!(c.camera.aspect, 1.0);
        c.resize(800, 400);
        assert_eq!(c.camera.aspect, 2.0);
    }
}
