// Screen-space camera for 2D rendering

use bytemuck::{Pod, Zeroable};
use glam::Mat4;

/// Orthographic camera mapping surface pixels to clip space
///
/// The origin is the top-left corner and y grows downward, matching the
/// coordinates the game draws with. The window may be any size; the play
/// surface is stretched to fill it.
#[derive(Debug, Clone)]
pub struct Camera {
    /// Logical surface width
    width: f32,
    /// Logical surface height
    height: f32,
    /// View-projection matrix
    view_proj: Mat4,
}

impl Camera {
    /// Create a new camera for a surface of the given size
    pub fn new(width: f32, height: f32) -> Self {
        let mut camera = Self {
            width,
            height,
            view_proj: Mat4::IDENTITY,
        };
        camera.update_view_proj();
        camera
    }

    /// Update the view-projection matrix
    fn update_view_proj(&mut self) {
        self.view_proj = Mat4::orthographic_rh(0.0, self.width, self.height, 0.0, -1.0, 1.0);
    }

    /// Get the view-projection matrix
    pub fn view_proj_matrix(&self) -> Mat4 {
        self.view_proj
    }
}

/// Camera uniform for GPU
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
}

impl CameraUniform {
    /// Create a new camera uniform from a camera
    pub fn new(camera: &Camera) -> Self {
        Self {
            view_proj: camera.view_proj_matrix().to_cols_array_2d(),
        }
    }
}
