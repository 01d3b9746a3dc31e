use std::f32::consts::PI;

use glam::Vec3;

use crate::camera::PerspectiveCamera;
use crate::input::{FrameInput, LINE_HEIGHT};

pub const DEFAULT_DAMPING: f32 = 0.05;

const MIN_POLAR: f32 = 1e-4;
const DOLLY_STEP: f32 = 0.95;

/// Camera interaction collaborator, updated once per frame
pub trait CameraControls {
    /// Feed the input gathered since the previous frame
    fn handle_input(&mut self, input: &FrameInput, viewport_height: f32);

    /// Move the camera; called every tick even without new input
    fn update(&mut self, camera: &mut PerspectiveCamera);
}

/// Radius, polar angle from +Y and azimuth around +Y measured from +Z
#[derive(Debug, Clone, Copy, PartialEq)]
struct Spherical {
    radius: f32,
    phi: f32,
    theta: f32,
}

impl Spherical {
    fn from_offset(offset: Vec3) -> Self {
        let radius = offset.length();
        if radius == 0.0 {
            return Self {
                radius,
                phi: 0.0,
                theta: 0.0,
            };
        }
        Self {
            radius,
            phi: (offset.y / radius).clamp(-1.0, 1.0).acos(),
            theta: offset.x.atan2(offset.z),
        }
    }

    fn to_offset(self) -> Vec3 {
        let sin_phi = self.phi.sin();
        Vec3::new(
            self.radius * sin_phi * self.theta.sin(),
            self.radius * self.phi.cos(),
            self.radius * sin_phi * self.theta.cos(),
        )
    }
}

/// Orbit a target with left-drag, dolly with the wheel; rotation eases out with damping
#[derive(Debug, Clone)]
pub struct OrbitControls {
    pub target: Vec3,
    pub damping: f32,
    pub rotate_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    delta_theta: f32,
    delta_phi: f32,
    scale: f32,
}

impl OrbitControls {
    pub fn new(target: Vec3) -> Self {
        Self {
            target,
            damping: DEFAULT_DAMPING,
            rotate_speed: 1.0,
            min_distance: 0.0,
            max_distance: f32::INFINITY,
            delta_theta: 0.0,
            delta_phi: 0.0,
            scale: 1.0,
        }
    }

    pub fn rotate(&mut self, azimuth: f32, polar: f32) {
        self.delta_theta -= azimuth;
        self.delta_phi -= polar;
    }

    /// `steps > 0` moves away from the target
    pub fn dolly(&mut self, steps: f32) {
        self.scale *= DOLLY_STEP.powf(-steps);
    }

    pub fn is_settled(&self) -> bool {
        self.delta_theta.abs() < 1e-6 && self.delta_phi.abs() < 1e-6 && self.scale == 1.0
    }
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self::new(Vec3::ZERO)
    }
}

impl CameraControls for OrbitControls {
    fn handle_input(&mut self, input: &FrameInput, viewport_height: f32) {
        if viewport_height > 0.0 {
            let per_pixel = 2.0 * PI * self.rotate_speed / viewport_height;
            self.rotate(input.drag.0 * per_pixel, input.drag.1 * per_pixel);
        }
        if input.wheel != 0.0 {
            self.dolly(input.wheel / LINE_HEIGHT);
        }
    }

    fn update(&mut self, camera: &mut PerspectiveCamera) {
        let mut spherical = Spherical::from_offset(camera.position - self.target);

        spherical.theta += self.delta_theta * self.damping;
        spherical.phi += self.delta_phi * self.damping;
        spherical.phi = spherical.phi.clamp(MIN_POLAR, PI - MIN_POLAR);
        spherical.radius = (spherical.radius * self.scale).clamp(self.min_distance, self.max_distance);

        camera.position = self.target + spherical.to_offset();
        camera.look_at(self.target);

        self.delta_theta *= 1.0 - self.damping;
        self.delta_phi *= 1.0 - self.damping;
        self.scale = 1.0;
    }
}
