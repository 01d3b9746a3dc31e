use glam::Vec3;
use planet_scene::shader::glow_intensity;

#[cfg(test)]
mod glow_tests {
    use super::*;

    #[test]
    fn test_intensity_rises_as_facing_drops() {
        let view = Vec3::Z;
        for fade in [0.5, 1.0, 2.5, 7.0] {
            let mut previous = -1.0;
            // Sweep the normal from facing the viewer to facing away
            for step in 0..=32 {
                let angle = std::f32::consts::PI * step as f32 / 32.0;
                let normal = Vec3::new(angle.sin(), 0.0, angle.cos());
                let value = glow_intensity(normal, view, 0.7, fade);
                assert!(value >= previous, "fade {} step {}", fade, step);
                assert!(value.is_finite());
                previous = value;
            }
        }
    }

    #[test]
    fn test_unnormalized_inputs() {
        let a = glow_intensity(Vec3::new(3.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 10.0), 0.7, 7.0);
        let b = glow_intensity(Vec3::X, Vec3::Z, 0.7, 7.0);
        assert!((a - b).abs() < 1e-6);
    }
}
