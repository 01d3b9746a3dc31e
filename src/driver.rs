//! Per-tick animation: loaded-model deltas, spinners, planets, controls, render.

use glam::Vec3;

use crate::assets::{AssetSlot, LoadedModel};
use crate::camera::PerspectiveCamera;
use crate::controls::CameraControls;
use crate::planet::Planet;
use crate::render::Renderer;
use crate::scene::{NodeId, SceneGraph};

/// Fixed scale and per-tick rotation applied to a model once its slot is filled
#[derive(Debug, Clone)]
pub struct SlotAnimation {
    pub slot: AssetSlot<LoadedModel>,
    pub scale: Vec3,
    pub rotation_per_tick: Vec3,
}

/// What one tick did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    pub frame: u64,
    /// Slots that were populated and received their deltas
    pub animated: usize,
    /// Slots still empty this tick
    pub skipped: usize,
}

#[derive(Debug, Default)]
pub struct FrameDriver {
    animations: Vec<SlotAnimation>,
    spinners: Vec<(NodeId, Vec3)>,
    planets: Vec<Planet>,
    frame: u64,
}

impl FrameDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn animate_slot(&mut self, slot: AssetSlot<LoadedModel>, scale: f32, rotation_per_tick: Vec3) {
        self.animations.push(SlotAnimation {
            slot,
            scale: Vec3::splat(scale),
            rotation_per_tick,
        });
    }

    /// Rotate an always-present node by `delta` every tick
    pub fn spin(&mut self, node: NodeId, delta: Vec3) {
        if delta != Vec3::ZERO {
            self.spinners.push((node, delta));
        }
    }

    pub fn add_planet(&mut self, planet: Planet) {
        self.planets.push(planet);
    }

    pub fn planets(&self) -> &[Planet] {
        &self.planets
    }

    pub fn animations(&self) -> &[SlotAnimation] {
        &self.animations
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Apply this tick's deltas. Empty slots are skipped, never an error.
    pub fn advance(&mut self, scene: &mut SceneGraph) -> TickReport {
        let mut report = TickReport {
            frame: self.frame,
            ..Default::default()
        };

        for animation in &self.animations {
            let Some(model) = animation.slot.get() else {
                report.skipped += 1;
                continue;
            };
            match scene.transform_mut(model.root) {
                Some(transform) => {
                    transform.scale = animation.scale;
                    transform.rotate_by(animation.rotation_per_tick);
                    report.animated += 1;
                }
                None => report.skipped += 1,
            }
        }

        for &(node, delta) in &self.spinners {
            if let Some(transform) = scene.transform_mut(node) {
                transform.rotate_by(delta);
            }
        }

        for planet in &mut self.planets {
            planet.advance(scene);
        }

        self.frame += 1;
        report
    }
}

/// One full tick: animate, update controls, render.
///
/// Render errors are logged and the tick still counts.
pub fn run_frame(
    driver: &mut FrameDriver,
    scene: &mut SceneGraph,
    camera: &mut PerspectiveCamera,
    controls: Option<&mut dyn CameraControls>,
    renderer: &mut dyn Renderer,
) -> TickReport {
    let report = driver.advance(scene);

    if let Some(controls) = controls {
        controls.update(camera);
    }

    if let Err(e) = renderer.render(scene, camera) {
        log::error!("Render error on frame {}: {:#}", report.frame, e);
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Color;
    use crate::render::NullRenderer;
    use crate::scene::{Geometry, Material, Node};

    fn loaded(scene: &mut SceneGraph, name: &str) -> LoadedModel {
        let root = scene.add(Node::group(name));
        LoadedModel {
            uri: name.to_string(),
            root,
            mesh_count: 0,
        }
    }

    #[test]
    fn test_empty_slot_is_skipped() {
        let mut scene = SceneGraph::new();
        let mut driver = FrameDriver::new();
        driver.animate_slot(AssetSlot::new("galaxy"), 50.0, Vec3::new(-0.0025, -0.0025, 0.001));

        for _ in 0..3 {
            let report = driver.advance(&mut scene);
            assert_eq!(report.animated, 0);
            assert_eq!(report.skipped, 1);
        }
        assert_eq!(driver.frame(), 3);
    }

    #[test]
    fn test_filled_slot_accumulates_rotation() {
        let mut scene = SceneGraph::new();
        let slot = AssetSlot::new("galaxy");
        let mut driver = FrameDriver::new();
        driver.animate_slot(slot.clone(), 50.0, Vec3::new(-0.0025, -0.0025, 0.001));

        driver.advance(&mut scene);
        let model = loaded(&mut scene, "galaxy");
        let root = model.root;
        assert!(slot.fill(model).is_ok());

        for _ in 0..4 {
            assert_eq!(driver.advance(&mut scene).animated, 1);
        }

        let transform = scene.node(root).unwrap().transform;
        assert_eq!(transform.scale, Vec3::splat(50.0));
        assert!((transform.rotation - Vec3::new(-0.01, -0.01, 0.004)).length() < 1e-6);
    }

    #[test]
    fn test_slot_with_missing_node_counts_as_skipped() {
        let mut other = SceneGraph::new();
        let model = loaded(&mut other, "galaxy");
        let slot = AssetSlot::new("galaxy");
        assert!(slot.fill(model).is_ok());

        let mut scene = SceneGraph::new();
        let mut driver = FrameDriver::new();
        driver.animate_slot(slot, 50.0, Vec3::new(-0.0025, -0.0025, 0.001));
        driver.animate_slot(AssetSlot::new("moon"), 1.5, Vec3::Y);

        let report = driver.advance(&mut scene);
        assert_eq!(report.animated, 0);
        assert_eq!(report.skipped, 2);
    }

    #[test]
    fn test_spinner_and_render() {
        let mut scene = SceneGraph::new();
        let knot = scene.add(Node::mesh("knot", Geometry::cube(1.0), Material::basic(Color::WHITE)));
        let mut driver = FrameDriver::new();
        driver.spin(knot, Vec3::new(0.01, 0.005, 0.01));
        driver.spin(knot, Vec3::ZERO);

        let mut camera = PerspectiveCamera::default();
        let mut renderer = NullRenderer::new();
        run_frame(&mut driver, &mut scene, &mut camera, None, &mut renderer);
        run_frame(&mut driver, &mut scene, &mut camera, None, &mut renderer);

        assert_eq!(renderer.frames, 2);
        let rotation = scene.node(knot).unwrap().transform.rotation;
        assert!((rotation - Vec3::new(0.02, 0.01, 0.02)).length() < 1e-6);
    }

    struct FailingRenderer;

    impl Renderer for FailingRenderer {
        fn render(&mut self, _: &SceneGraph, _: &PerspectiveCamera) -> anyhow::Result<()> {
            anyhow::bail!("device lost")
        }

        fn resize(&mut self, _: u32, _: u32) {}
    }

    #[test]
    fn test_render_error_does_not_stop_ticks() {
        let mut scene = SceneGraph::new();
        let mut driver = FrameDriver::new();
        let mut camera = PerspectiveCamera::default();
        let first = run_frame(&mut driver, &mut scene, &mut camera, None, &mut FailingRenderer);
        let second = run_frame(&mut driver, &mut scene, &mut camera, None, &mut FailingRenderer);
        assert_eq!((first.frame, second.frame), (0, 1));
    }
}
