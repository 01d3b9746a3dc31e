mod loader;
mod model;
mod slot;
mod source;
mod texture;

pub use loader::{AssetLoader, PumpReport};
pub use model::{smooth_normals, LoadedModel, ModelData, ModelMesh};
pub use slot::AssetSlot;
pub use source::{is_remote, AssetSource, FileSystemSource};
pub use texture::TextureData;
