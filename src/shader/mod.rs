//! WGSL sources and the uniform blocks they read.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

use crate::math::Color;
use crate::scene::{Light, Material, Shading};

pub const MESH_SHADER: &str = include_str!("mesh.wgsl");
pub const GLOW_SHADER: &str = include_str!("glow.wgsl");
pub const BACKGROUND_SHADER: &str = include_str!("background.wgsl");

/// Per-frame camera and lighting block, bound at group 0.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct GlobalUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    pub camera_position: [f32; 4],
    pub light_position: [f32; 4],
    pub light_color: [f32; 4],
    pub ambient_color: [f32; 4],
}

impl GlobalUniforms {
    /// Only the first point light and the summed ambient lights contribute.
    pub fn new(view: Mat4, projection: Mat4, camera_position: Vec3, lights: &[(Light, Vec3)]) -> Self {
        let mut light_position = [0.0; 4];
        let mut light_color = [0.0; 4];
        let mut ambient = Vec3::ZERO;

        for (light, position) in lights {
            match *light {
                Light::Point { color, intensity } if light_position[3] == 0.0 => {
                    light_position = [position.x, position.y, position.z, 1.0];
                    let [r, g, b] = color.to_array();
                    light_color = [r * intensity, g * intensity, b * intensity, 1.0];
                }
                Light::Point { .. } => {}
                Light::Ambient { color, intensity } => {
                    ambient += Vec3::from(color.to_array()) * intensity;
                }
            }
        }

        Self {
            view_proj: (projection * view).to_cols_array_2d(),
            view: view.to_cols_array_2d(),
            camera_position: camera_position.extend(1.0).to_array(),
            light_position,
            light_color,
            ambient_color: ambient.extend(1.0).to_array(),
        }
    }
}

/// Per-draw block, bound at group 1.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct DrawUniforms {
    pub model: [[f32; 4]; 4],
    pub normal_matrix: [[f32; 4]; 4],
    pub color: [f32; 4],
    pub specular: [f32; 4],
    pub params: [f32; 4],
}

impl DrawUniforms {
    pub fn new(model: Mat4, material: &Material) -> Self {
        let normal_matrix = model.inverse().transpose();
        let (glow_intensity, glow_fade) = match material.shading {
            Shading::Glow { intensity, fade } => (intensity, fade),
            _ => (0.0, 0.0),
        };

        Self {
            model: model.to_cols_array_2d(),
            normal_matrix: normal_matrix.to_cols_array_2d(),
            color: material.color.to_rgba(material.opacity),
            specular: material.specular.to_rgba(material.shininess),
            params: [shading_mode(material.shading), material.bump_scale, glow_intensity, glow_fade],
        }
    }
}

/// Mode number understood by `mesh.wgsl`.
pub fn shading_mode(shading: Shading) -> f32 {
    match shading {
        Shading::Basic | Shading::Line => 0.0,
        Shading::Standard => 1.0,
        Shading::Phong => 2.0,
        Shading::Normal => 3.0,
        Shading::Glow { .. } => 4.0,
    }
}

/// CPU mirror of the glow shell's vertex term: `max(c - dot(n, v), 0)^p`.
///
/// Both vectors are normalized first. Rims (normal perpendicular to the view) get `c^p`,
/// faces pointing straight at the viewer fall off toward zero.
pub fn glow_intensity(normal: Vec3, view_vector: Vec3, intensity: f32, fade: f32) -> f32 {
    let facing = normal.normalize_or_zero().dot(view_vector.normalize_or_zero());
    (intensity - facing).max(0.0).powf(fade)
}

/// Flat colour multiplied by the glow term, the value the fragment stage writes.
pub fn glow_color(color: Color, normal: Vec3, view_vector: Vec3, intensity: f32, fade: f32) -> [f32; 3] {
    let k = glow_intensity(normal, view_vector, intensity, fade);
    [color.r * k, color.g * k, color.b * k]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rim_is_brighter_than_center() {
        let view = Vec3::Z;
        let center = glow_intensity(Vec3::Z, view, 0.7, 7.0);
        let rim = glow_intensity(Vec3::X, view, 0.7, 7.0);
        assert!(rim > center);
        assert!((rim - 0.7f32.powf(7.0)).abs() < 1e-6);
    }

    #[test]
    fn facing_term_never_goes_negative() {
        // 0.7 - 1.0 would be negative; the clamp keeps pow well defined
        let value = glow_intensity(Vec3::Z, Vec3::Z, 0.7, 2.5);
        assert_eq!(value, 0.0);
        assert!(!value.is_nan());
    }

    #[test]
    fn back_faces_glow_strongest() {
        let back = glow_intensity(-Vec3::Z, Vec3::Z, 0.7, 7.0);
        assert!((back - 1.7f32.powf(7.0)).abs() < 1e-3);
    }

    #[test]
    fn glow_color_scales_each_channel() {
        let rgb = glow_color(Color::WHITE, Vec3::X, Vec3::Z, 1.0, 1.0);
        assert_eq!(rgb, [1.0, 1.0, 1.0]);
    }

    #[test]
    fn first_point_light_wins() {
        let lights = [
            (Light::Point { color: Color::WHITE, intensity: 1.0 }, Vec3::new(1.0, 2.0, 3.0)),
            (Light::Point { color: Color::WHITE, intensity: 5.0 }, Vec3::new(9.0, 9.0, 9.0)),
            (Light::Ambient { color: Color::WHITE, intensity: 0.5 }, Vec3::ZERO),
        ];
        let globals = GlobalUniforms::new(Mat4::IDENTITY, Mat4::IDENTITY, Vec3::ZERO, &lights);
        assert_eq!(globals.light_position, [1.0, 2.0, 3.0, 1.0]);
        assert_eq!(globals.light_color[3], 1.0);
        assert_eq!(globals.ambient_color, [0.5, 0.5, 0.5, 1.0]);
    }

    #[test]
    fn no_point_light_disables_diffuse() {
        let globals = GlobalUniforms::new(Mat4::IDENTITY, Mat4::IDENTITY, Vec3::ZERO, &[]);
        assert_eq!(globals.light_position[3], 0.0);
    }

    #[test]
    fn draw_uniforms_carry_material_terms() {
        let material = Material::glow(0.7, 7.0, Color::from_hex(0x93cfef));
        let draw = DrawUniforms::new(Mat4::IDENTITY, &material);
        assert_eq!(draw.params, [4.0, 1.0, 0.7, 7.0]);
    }

    #[test]
    fn shaders_declare_entry_points() {
        for source in [MESH_SHADER, GLOW_SHADER, BACKGROUND_SHADER] {
            assert!(source.contains("fn vs_main"));
            assert!(source.contains("fn fs_main"));
        }
    }
}
