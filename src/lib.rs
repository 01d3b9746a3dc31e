pub mod app;
pub mod assembler;
pub mod assets;
pub mod camera;
pub mod cli;
pub mod config;
pub mod controls;
pub mod driver;
pub mod error;
pub mod frame;
pub mod input;
pub mod math;
pub mod planet;
pub mod render;
pub mod scene;
pub mod scroll;
pub mod shader;

pub use assembler::{assemble, AssembledScene};
pub use assets::{AssetLoader, AssetSlot, AssetSource, FileSystemSource};
pub use config::{Preset, SceneConfig};
pub use driver::{run_frame, FrameDriver, TickReport};
pub use planet::{create_planet, Planet, PlanetSpec};
