pub mod gpu_context;
pub mod hud;
pub mod scene_renderer;

pub use gpu_context::GpuContext;
pub use hud::{Hud, HudStats};
pub use scene_renderer::SceneRenderer;

use crate::camera::PerspectiveCamera;
use crate::scene::SceneGraph;

/// Draws a scene from a camera
pub trait Renderer {
    fn render(&mut self, scene: &SceneGraph, camera: &PerspectiveCamera) -> anyhow::Result<()>;

    fn resize(&mut self, width: u32, height: u32);

    /// Overlay statistics shown with the next frame
    fn set_stats(&mut self, _stats: HudStats) {}
}

/// Renderer that draws nothing; used headless and in tests
#[derive(Debug, Default, Clone)]
pub struct NullRenderer {
    pub frames: u64,
    pub last_mesh_count: usize,
    pub size: (u32, u32),
    pub stats: HudStats,
}

impl NullRenderer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Renderer for NullRenderer {
    fn render(&mut self, scene: &SceneGraph, _camera: &PerspectiveCamera) -> anyhow::Result<()> {
        self.frames += 1;
        self.last_mesh_count = scene.visible_meshes().len();
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.size = (width, height);
    }

    fn set_stats(&mut self, stats: HudStats) {
        self.stats = stats;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Color;
    use crate::scene::{Geometry, Material, Node};

    #[test]
    fn test_null_renderer_counts_frames_and_meshes() {
        let mut scene = SceneGraph::new();
        scene.add(Node::mesh("star", Geometry::sphere(0.25, 24, 24), Material::standard(Color::WHITE)));
        let hidden = scene.add(Node::mesh("hidden", Geometry::cube(1.0), Material::normal()));
        scene.node_mut(hidden).unwrap().visible = false;

        let mut renderer = NullRenderer::new();
        renderer.render(&scene, &PerspectiveCamera::default()).unwrap();
        renderer.render(&scene, &PerspectiveCamera::default()).unwrap();

        assert_eq!(renderer.frames, 2);
        assert_eq!(renderer.last_mesh_count, 1);
    }
}
