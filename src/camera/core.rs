use glam::{Mat4, Vec3};

use super::viewport::{perspective_with_offset, ViewOffset};

/// Perspective camera defined by eye position, target, and projection
/// parameters.
#[derive(Debug, Clone, PartialEq)]
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
    /// Optional sub-window of the full view to project into.
    pub view: Option<ViewOffset>,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            eye: Vec3::new(3.0, 0.0, 0.0),
            target: Vec3::ZERO,
            up: Vec3::Z,
            aspect: 16.0 / 9.0,
            fovy: 75.0,
            znear: 1.0,
            zfar: 1000.0,
            view: None,
        }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
/// GPU uniform buffer holding the view-projection matrix and camera position.
pub struct CameraUniform {
    /// Combined view-projection matrix.
    pub view_proj: [[f32; 4]; 4],
    /// Camera world-space position.
    pub position: [f32; 3],
    /// Padding for GPU alignment.
    pub(crate) _pad: f32,
}

impl Camera {
    /// View matrix looking from `eye` at `target`.
    #[must_use]
    pub fn build_view(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    /// Projection matrix, honouring the crop sub-window if set.
    #[must_use]
    pub fn build_projection(&self) -> Mat4 {
        // [0,1] depth range (wgpu/Vulkan convention)
        perspective_with_offset(
            self.fovy.to_radians(),
            self.aspect,
            self.znear,
            self.zfar,
            self.view.as_ref(),
        )
    }

    /// Build the combined view-projection matrix.
    #[must_use]
    pub fn build_matrix(&self) -> Mat4 {
        self.build_projection() * self.build_view()
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

impl CameraUniform {
    /// Create a new camera uniform with identity view-projection.
    #[must_use]
    pub fn new() -> Self {
        Self {
            view_proj: Mat4::IDENTITY.to_cols_array_2d(),
            position: [0.0; 3],
            _pad: 0.0,
        }
    }

    /// Update uniform fields from the given camera's current state.
    pub fn update_view_proj(&mut self, camera: &Camera) {
        self.view_proj = camera.build_matrix().to_cols_array_2d();
        self.position = camera.eye.to_array();
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec4;

    use super::*;

    #[test]
    fn origin_projects_to_screen_center() {
        let camera = Camera::default();
        let clip = camera.build_matrix() * Vec4::new(0.0, 0.0, 0.0, 1.0);
        assert!((clip.x / clip.w).abs() < 1e-6);
        assert!((clip.y / clip.w).abs() < 1e-6);
        let depth = clip.z / clip.w;
        assert!((0.0..=1.0).contains(&depth));
    }

    #[test]
    fn uniform_tracks_eye() {
        let camera = Camera {
            eye: Vec3::new(0.0, 3.0, 0.0),
            ..Camera::default()
        };
        let mut uniform = CameraUniform::new();
        uniform.update_view_proj(&camera);
        assert_eq!(uniform.position, [0.0, 3.0, 0.0]);
        assert_ne!(uniform.view_proj, Mat4::IDENTITY.to_cols_array_2d());
    }
}
