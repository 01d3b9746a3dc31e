use std::collections::HashMap;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use planet_scene::assets::{AssetSource, ModelData, ModelMesh, TextureData};
use planet_scene::error::LoadError;
use planet_scene::math::Color;
use planet_scene::scene::Geometry;

/// In-memory source; each URI can be delayed or made to fail
#[derive(Default)]
pub struct StubSource {
    delays: HashMap<String, Duration>,
    failures: Vec<String>,
}

impl StubSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn delay(mut self, uri: &str, millis: u64) -> Self {
        self.delays.insert(uri.to_string(), Duration::from_millis(millis));
        self
    }

    pub fn fail(mut self, uri: &str) -> Self {
        self.failures.push(uri.to_string());
        self
    }

    pub fn shared(self) -> Arc<dyn AssetSource> {
        Arc::new(self)
    }

    fn wait(&self, uri: &str) -> Result<(), LoadError> {
        if let Some(delay) = self.delays.get(uri) {
            thread::sleep(*delay);
        }
        if self.failures.iter().any(|failing| failing == uri) {
            return Err(LoadError::EmptyModel { uri: uri.to_string() });
        }
        Ok(())
    }
}

impl AssetSource for StubSource {
    fn load_model(&self, uri: &str) -> Result<ModelData, LoadError> {
        self.wait(uri)?;
        Ok(ModelData {
            uri: uri.to_string(),
            meshes: vec![ModelMesh {
                name: "body".to_string(),
                mesh: Arc::new(Geometry::cube(1.0).build()),
                base_color: Color::WHITE,
                opacity: 1.0,
                double_sided: false,
                texture: None,
            }],
            textures: Vec::new(),
        })
    }

    fn load_texture(&self, uri: &str) -> Result<TextureData, LoadError> {
        self.wait(uri)?;
        Ok(TextureData::solid(2, 2, [255, 255, 255, 255]))
    }
}
