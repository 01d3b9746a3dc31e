use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::camera::PerspectiveCamera;
use crate::scene::{NodeId, SceneGraph};

/// Linear scroll-to-camera mapping
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrollFactors {
    pub position_z: f32,
    pub position_x: f32,
    pub rotation_y: f32,
}

impl Default for ScrollFactors {
    fn default() -> Self {
        Self {
            position_z: -0.01,
            position_x: -0.0002,
            rotation_y: -0.0002,
        }
    }
}

/// Vertical scroll position, `0` at the top and negative once scrolled down
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollOffset {
    offset: f32,
    max_scroll: f32,
}

impl ScrollOffset {
    pub fn new(max_scroll: f32) -> Self {
        Self {
            offset: 0.0,
            max_scroll: max_scroll.max(0.0),
        }
    }

    /// Apply wheel travel (positive scrolls down) and return the new offset
    pub fn scroll(&mut self, pixels: f32) -> f32 {
        self.offset = (self.offset - pixels).clamp(-self.max_scroll, 0.0);
        self.offset
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }
}

/// Drives the camera from the scroll offset and nudges a few objects on every scroll event
#[derive(Debug, Clone)]
pub struct ScrollCamera {
    pub factors: ScrollFactors,
    spins: Vec<(NodeId, Vec3)>,
    events: u64,
}

impl ScrollCamera {
    pub fn new(factors: ScrollFactors) -> Self {
        Self {
            factors,
            spins: Vec::new(),
            events: 0,
        }
    }

    /// Rotate `node` by `delta` each time the camera is moved
    pub fn spin(&mut self, node: NodeId, delta: Vec3) {
        self.spins.push((node, delta));
    }

    /// Camera pose is a pure function of `t`; spins accumulate per call
    pub fn apply(&mut self, t: f32, camera: &mut PerspectiveCamera, scene: &mut SceneGraph) {
        self.events += 1;
        for &(node, delta) in &self.spins {
            if let Some(transform) = scene.transform_mut(node) {
                transform.rotate_by(delta);
            }
        }

        camera.position.z = t * self.factors.position_z;
        camera.position.x = t * self.factors.position_x;
        camera.rotation.y = t * self.factors.rotation_y;
    }

    pub fn events(&self) -> u64 {
        self.events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Node;

    #[test]
    fn test_camera_pose_at_offset() {
        let mut scene = SceneGraph::new();
        let mut camera = PerspectiveCamera::default();
        let mut scroll = ScrollCamera::new(ScrollFactors::default());

        scroll.apply(-2000.0, &mut camera, &mut scene);

        assert!((camera.position.z - 20.0).abs() < 1e-4);
        assert!((camera.position.x - 0.4).abs() < 1e-6);
        assert!((camera.rotation.y - 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_top_of_page_is_origin() {
        let mut scene = SceneGraph::new();
        let mut camera = PerspectiveCamera::default().with_position(Vec3::new(1.0, 2.0, 3.0));
        ScrollCamera::new(ScrollFactors::default()).apply(0.0, &mut camera, &mut scene);
        assert_eq!(camera.position, Vec3::new(0.0, 2.0, 0.0));
    }

    #[test]
    fn test_spins_accumulate_per_event() {
        let mut scene = SceneGraph::new();
        let knot = scene.add(Node::group("knot"));
        let mut camera = PerspectiveCamera::default();
        let mut scroll = ScrollCamera::new(ScrollFactors::default());
        scroll.spin(knot, Vec3::new(0.05, 0.075, 0.05));

        scroll.apply(-10.0, &mut camera, &mut scene);
        scroll.apply(-10.0, &mut camera, &mut scene);

        let rotation = scene.node(knot).unwrap().transform.rotation;
        assert!((rotation - Vec3::new(0.1, 0.15, 0.1)).length() < 1e-6);
        assert_eq!(scroll.events(), 2);
    }

    #[test]
    fn test_offset_is_clamped() {
        let mut offset = ScrollOffset::new(1000.0);
        assert_eq!(offset.scroll(-50.0), 0.0);
        assert_eq!(offset.scroll(400.0), -400.0);
        assert_eq!(offset.scroll(5000.0), -1000.0);
        assert_eq!(offset.scroll(-200.0), -800.0);
    }
}
