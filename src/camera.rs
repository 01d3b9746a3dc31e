use glam::{Mat4, Vec3};

use crate::math::{euler_to_quat, quat_to_euler};

pub const DEFAULT_FOV_Y: f32 = 75.0;
pub const DEFAULT_NEAR: f32 = 0.1;
pub const DEFAULT_FAR: f32 = 1000.0;

/// Right-handed perspective camera looking down its local -Z
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerspectiveCamera {
    pub fov_y_degrees: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
    /// XYZ Euler angles in radians
    pub rotation: Vec3,
}

impl PerspectiveCamera {
    pub fn new(fov_y_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            fov_y_degrees,
            aspect,
            near,
            far,
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
        }
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn set_aspect(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    /// Camera-to-world matrix
    pub fn world_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(euler_to_quat(self.rotation), self.position)
    }

    pub fn view(&self) -> Mat4 {
        self.world_matrix().inverse()
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh(
            self.fov_y_degrees.to_radians(),
            self.aspect,
            self.near,
            self.far,
        )
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection() * self.view()
    }

    pub fn forward(&self) -> Vec3 {
        euler_to_quat(self.rotation) * Vec3::NEG_Z
    }

    /// Rotate so that -Z points at `target`, keeping +Y up
    pub fn look_at(&mut self, target: Vec3) {
        if target.distance_squared(self.position) < f32::EPSILON {
            return;
        }
        let view = Mat4::look_at_rh(self.position, target, Vec3::Y);
        let (_, rotation, _) = view.inverse().to_scale_rotation_translation();
        self.rotation = quat_to_euler(rotation);
    }
}

impl Default for PerspectiveCamera {
    fn default() -> Self {
        Self::new(DEFAULT_FOV_Y, 16.0 / 9.0, DEFAULT_NEAR, DEFAULT_FAR)
    }
}
