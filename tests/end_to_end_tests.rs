use std::sync::Arc;
use std::time::Duration;

use planet_scene::app::{run_headless, Session};
use planet_scene::config::{ModelConfig, Preset, SceneConfig};
use planet_scene::render::NullRenderer;

mod common;
use common::StubSource;

const URIS: [&str; 5] = [
    "/assets/a/scene.gltf",
    "/assets/b/scene.gltf",
    "/assets/c/scene.gltf",
    "/assets/d/scene.gltf",
    "/assets/e/scene.gltf",
];

fn config_with_models(uris: &[&str]) -> SceneConfig {
    SceneConfig {
        models: uris
            .iter()
            .map(|uri| ModelConfig::new(uri, 1.0, [0.0, 0.01, 0.0]))
            .collect(),
        ..SceneConfig::preset(Preset::Galaxy)
    }
}

#[cfg(test)]
mod end_to_end_tests {
    use super::*;

    #[test]
    fn test_loads_in_any_order_add_exactly_n_children() {
        // Completion order is the reverse of issue order
        let source = URIS
            .iter()
            .enumerate()
            .fold(StubSource::new(), |source, (i, uri)| source.delay(uri, 60 - 10 * i as u64));
        let config = config_with_models(&URIS);
        let mut session = Session::new(&config, Arc::new(source), 1.5);
        let mut renderer = NullRenderer::new();
        let static_children = session.assembled.static_children;

        let mut landed = Vec::new();
        for _ in 0..500 {
            let (pumped, _) = session.tick(&mut renderer, 720.0);
            for slot in &session.assembled.slots {
                if slot.is_filled() && !landed.contains(&slot.name().to_string()) {
                    landed.push(slot.name().to_string());
                }
            }
            assert!(pumped.models_attached <= URIS.len());
            if landed.len() == URIS.len() && session.loader.pending() == 0 {
                break;
            }
            std::thread::sleep(Duration::from_millis(2));
        }

        assert_eq!(landed.len(), URIS.len());
        assert_eq!(session.assembled.scene.child_count(), static_children + URIS.len());
        assert_eq!(session.stats(0.0).slots_loaded, URIS.len());
    }

    #[test]
    fn test_hud_stats_include_loads_applied_this_tick() {
        let config = config_with_models(&URIS[..1]);
        let mut session = Session::new(&config, StubSource::new().shared(), 1.5);
        session.fps = 60.0;
        let mut renderer = NullRenderer::new();

        for _ in 0..500 {
            let (pumped, _) = session.tick(&mut renderer, 720.0);
            if pumped.models_attached > 0 {
                break;
            }
            std::thread::sleep(Duration::from_millis(2));
        }

        assert_eq!(renderer.stats.slots_loaded, 1);
        assert_eq!(renderer.stats.slots_total, 1);
        assert_eq!(renderer.stats.fps, 60.0);
    }

    #[test]
    fn test_failed_loads_add_nothing() {
        let source = StubSource::new().fail(URIS[1]).fail(URIS[3]);
        let config = config_with_models(&URIS);
        let summary = run_headless(&config, source.shared(), 200, Duration::from_millis(2)).unwrap();

        assert_eq!(summary.frames, 200);
        assert_eq!(summary.slots_total, 5);
        assert_eq!(summary.slots_loaded, 3);
        assert_eq!(summary.root_children, summary.static_children + 3);
        assert!(summary.failed_loads.contains(&URIS[1].to_string()));
        assert!(summary.failed_loads.contains(&URIS[3].to_string()));
    }

    #[test]
    fn test_scroll_preset_headless() {
        let config = SceneConfig::preset(Preset::Scroll);
        let mut session = Session::new(&config, StubSource::new().shared(), 1.5);
        session.on_scroll(2000.0);
        assert!((session.assembled.camera.position.z - 20.0).abs() < 1e-4);

        let mut renderer = NullRenderer::new();
        session.tick(&mut renderer, 720.0);
        // No orbit controls, so the scroll pose survives the frame
        assert!((session.assembled.camera.position.z - 20.0).abs() < 1e-4);
    }

    #[test]
    fn test_scroll_camera_from_json_disables_orbit_controls() {
        let config = SceneConfig::from_json(r#"{ "scroll_camera": {}, "models": [] }"#).unwrap();
        assert!(config.orbit_controls);

        let mut session = Session::new(&config, StubSource::new().shared(), 1.5);
        assert!(session.assembled.controls.is_none());

        session.on_scroll(2000.0);
        let mut renderer = NullRenderer::new();
        session.tick(&mut renderer, 720.0);

        let camera = &session.assembled.camera;
        assert!((camera.position.z - 20.0).abs() < 1e-4);
        assert!((camera.position.x - 0.4).abs() < 1e-4);
        assert!((camera.rotation.y - 0.4).abs() < 1e-4);
    }

    #[test]
    fn test_zero_frames_is_an_error() {
        let config = SceneConfig::preset(Preset::Galaxy);
        assert!(run_headless(&config, StubSource::new().shared(), 0, Duration::ZERO).is_err());
    }
}
