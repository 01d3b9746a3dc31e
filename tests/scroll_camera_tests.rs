use glam::Vec3;
use planet_scene::camera::PerspectiveCamera;
use planet_scene::scene::SceneGraph;
use planet_scene::scroll::{ScrollCamera, ScrollFactors, ScrollOffset};

#[cfg(test)]
mod scroll_camera_tests {
    use super::*;

    #[test]
    fn test_pose_is_pure_function_of_offset() {
        let mut scene = SceneGraph::new();
        let mut scroll = ScrollCamera::new(ScrollFactors::default());

        let mut a = PerspectiveCamera::default();
        scroll.apply(-500.0, &mut a, &mut scene);
        scroll.apply(-2000.0, &mut a, &mut scene);

        let mut b = PerspectiveCamera::default().with_position(Vec3::new(9.0, 0.0, 9.0));
        scroll.apply(-2000.0, &mut b, &mut scene);

        assert_eq!(a.position, b.position);
        assert_eq!(a.rotation, b.rotation);
        assert!((a.position.z - 20.0).abs() < 1e-4);
        assert!((a.position.x - 0.4).abs() < 1e-6);
        assert!((a.rotation.y - 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_wheel_to_pose() {
        let mut scene = SceneGraph::new();
        let mut camera = PerspectiveCamera::default();
        let mut scroll = ScrollCamera::new(ScrollFactors::default());
        let mut offset = ScrollOffset::new(10_000.0);

        for _ in 0..50 {
            let t = offset.scroll(40.0);
            scroll.apply(t, &mut camera, &mut scene);
        }

        assert_eq!(offset.offset(), -2000.0);
        assert!((camera.position.z - 20.0).abs() < 1e-4);
    }
}
