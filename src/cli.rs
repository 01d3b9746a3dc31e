// cli.rs - Command-line interface configuration
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use crate::config::{Preset, SceneConfig};

#[derive(Parser, Debug, Clone)]
#[command(name = "planet-scene")]
#[command(about = "3D scene viewer with procedural planets and glTF models", long_about = None)]
pub struct Cli {
    /// Built-in scene layout
    #[arg(long, value_enum, default_value_t = Preset::Galaxy)]
    pub preset: Preset,

    /// JSON scene config; replaces the preset
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Directory that relative and root-relative asset paths resolve against
    #[arg(long, default_value = ".")]
    pub assets: PathBuf,

    /// Run the frame loop without a window or GPU
    #[arg(long)]
    pub headless: bool,

    /// Stop after this many frames (headless defaults to 600)
    #[arg(long)]
    pub frames: Option<u64>,

    /// Disable UI elements
    #[arg(long = "no-ui", default_value = "false")]
    pub no_ui: bool,
}

impl Cli {
    pub fn scene_config(&self) -> Result<SceneConfig> {
        match &self.config {
            Some(path) => SceneConfig::from_json_file(path),
            None => Ok(SceneConfig::preset(self.preset)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["planet-scene"]);
        assert_eq!(cli.preset, Preset::Galaxy);
        assert_eq!(cli.assets, PathBuf::from("."));
        assert!(!cli.headless);
        assert!(!cli.no_ui);
        assert_eq!(cli.frames, None);
    }

    #[test]
    fn test_flags() {
        let cli = Cli::parse_from([
            "planet-scene",
            "--preset",
            "scroll",
            "--headless",
            "--frames",
            "10",
            "--no-ui",
            "--assets",
            "public",
        ]);
        assert_eq!(cli.preset, Preset::Scroll);
        assert!(cli.headless);
        assert!(cli.no_ui);
        assert_eq!(cli.frames, Some(10));
        assert_eq!(cli.assets, PathBuf::from("public"));
        assert!(cli.scene_config().unwrap().scroll_camera.is_some());
    }

    #[test]
    fn test_config_file_overrides_preset() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene.json");
        std::fs::write(&path, r#"{ "models": [] }"#).unwrap();

        let cli = Cli::parse_from(["planet-scene", "--config", path.to_str().unwrap()]);
        assert!(cli.scene_config().unwrap().models.is_empty());
    }
}
