use glam::{Mat4, Vec3};

use crate::camera::core::Camera;
use crate::gpu::hdri::HdriTexture;

/// Per-frame view state, passed explicitly to the renderers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameParams {
    /// View → world transform.
    pub camera_to_world: Mat4,
    /// Clip → view transform.
    pub inverse_projection: Mat4,
    /// Eye position in world space.
    pub camera_position: Vec3,
    /// Output size in pixels.
    pub display_size: (u32, u32),
}

impl FrameParams {
    /// Snapshot `camera` for a frame of `display_size`.
    #[must_use]
    pub fn from_camera(camera: &Camera, display_size: (u32, u32)) -> Self {
        Self {
            camera_to_world: camera.camera_to_world(),
            inverse_projection: camera.inverse_projection(),
            camera_position: camera.eye,
            display_size,
        }
    }
}

/// Textures a ray-traced frame reads and writes.
pub struct FrameTextures<'a> {
    /// Image shown when tracing is off.
    pub source: &'a wgpu::Texture,
    /// Environment for rays that escape the scene.
    pub skybox: Option<&'a HdriTexture>,
    /// Destination of the final blit.
    pub output: &'a wgpu::Texture,
}
