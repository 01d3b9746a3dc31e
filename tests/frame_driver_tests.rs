use std::sync::Arc;
use std::time::Duration;

use glam::Vec3;
use planet_scene::assets::{AssetLoader, AssetSlot};
use planet_scene::camera::PerspectiveCamera;
use planet_scene::driver::{run_frame, FrameDriver};
use planet_scene::render::NullRenderer;
use planet_scene::scene::SceneGraph;

mod common;
use common::StubSource;

#[cfg(test)]
mod frame_driver_tests {
    use super::*;

    #[test]
    fn test_never_loaded_slot_is_harmless() {
        let mut scene = SceneGraph::new();
        let mut camera = PerspectiveCamera::default();
        let mut renderer = NullRenderer::new();
        let mut driver = FrameDriver::new();
        driver.animate_slot(AssetSlot::new("/missing.gltf"), 50.0, Vec3::X);

        for _ in 0..100 {
            let report = run_frame(&mut driver, &mut scene, &mut camera, None, &mut renderer);
            assert_eq!(report.skipped, 1);
        }
        assert_eq!(renderer.frames, 100);
    }

    #[test]
    fn test_loaded_model_rotates_every_tick_after_landing() {
        let source = StubSource::new().delay("/assets/galaxy/scene.gltf", 20);
        let mut loader = AssetLoader::new(Arc::new(source));
        let mut scene = SceneGraph::new();
        let mut driver = FrameDriver::new();
        let slot = loader.load_model("/assets/galaxy/scene.gltf");
        driver.animate_slot(slot.clone(), 50.0, Vec3::new(-0.0025, -0.0025, 0.001));

        // Ticks before the load lands do nothing
        assert_eq!(driver.advance(&mut scene).skipped, 1);

        loader.pump_until_idle(&mut scene, Duration::from_secs(5));
        let root = slot.get().expect("model attached").root;
        let identity = slot.clone();

        let mut last = scene.node(root).unwrap().transform.rotation.x;
        for _ in 0..10 {
            assert_eq!(driver.advance(&mut scene).animated, 1);
            let rotation = scene.node(root).unwrap().transform.rotation.x;
            assert!(rotation < last);
            last = rotation;
            assert!(identity.same_slot(&slot));
            assert_eq!(slot.get().unwrap().root, root);
        }
        assert_eq!(scene.node(root).unwrap().transform.scale, Vec3::splat(50.0));
    }
}
