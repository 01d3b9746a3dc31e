use std::path::Path;

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::planet::PlanetSpec;
use crate::scroll::ScrollFactors;

/// Built-in scene layouts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// Stars, torus knot, avatar, galaxy model, helpers and orbit controls
    #[default]
    Galaxy,
    /// Galaxy scene plus a textured planet, no helpers
    Planet,
    /// Camera follows the mouse wheel like a scrolling page
    Scroll,
    /// Planet and every model bundle
    Showcase,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
    pub position: [f32; 3],
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_y: 75.0,
            near: 0.1,
            far: 1000.0,
            position: [-3.0, 0.0, 30.0],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StarFieldConfig {
    pub count: usize,
    pub radius: f32,
    pub segments: u32,
    /// Edge of the cube the stars are scattered in, centred on the origin
    pub spread: f32,
    pub seed: u64,
    pub color: u32,
}

impl Default for StarFieldConfig {
    fn default() -> Self {
        Self {
            count: 500,
            radius: 0.25,
            segments: 24,
            spread: 250.0,
            seed: 0x5eed,
            color: 0xffffff,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TorusKnotConfig {
    pub enabled: bool,
    pub radius: f32,
    pub tube: f32,
    pub tubular_segments: u32,
    pub radial_segments: u32,
    pub p: u32,
    pub q: u32,
    pub position: [f32; 3],
    /// Rotation added every tick
    pub spin: [f32; 3],
}

impl Default for TorusKnotConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            radius: 30.0,
            tube: 1.5,
            tubular_segments: 300,
            radial_segments: 20,
            p: 7,
            q: 12,
            position: [5.0, 0.0, 8.0],
            spin: [0.0; 3],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AvatarConfig {
    pub enabled: bool,
    pub texture: Option<String>,
    pub size: f32,
    pub scale: f32,
    pub position: [f32; 3],
}

impl Default for AvatarConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            texture: Some("luis.png".to_string()),
            size: 3.0,
            scale: 3.0,
            position: [5.0, 0.0, 8.0],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackgroundConfig {
    /// Clear colour used until (or instead of) the texture
    pub color: u32,
    pub texture: Option<String>,
}

impl Default for BackgroundConfig {
    fn default() -> Self {
        Self {
            color: 0x000000,
            texture: Some("/carina-nebula.jpg".to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightsConfig {
    pub point: bool,
    pub point_color: u32,
    pub point_intensity: f32,
    pub point_position: [f32; 3],
    pub ambient: bool,
    pub ambient_color: u32,
    pub ambient_intensity: f32,
}

impl Default for LightsConfig {
    fn default() -> Self {
        Self {
            point: true,
            point_color: 0xffffff,
            point_intensity: 1.0,
            point_position: [0.0, 0.0, 0.0],
            ambient: true,
            ambient_color: 0xffffff,
            ambient_intensity: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HelpersConfig {
    pub enabled: bool,
    pub light_marker_size: f32,
    pub grid_size: f32,
    pub grid_divisions: u32,
    pub axes_length: f32,
}

impl Default for HelpersConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            light_marker_size: 1.0,
            grid_size: 200.0,
            grid_divisions: 50,
            axes_length: 100.0,
        }
    }
}

/// External glTF bundle and the deltas applied once it is loaded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub uri: String,
    pub scale: f32,
    pub rotation_per_tick: [f32; 3],
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            uri: String::new(),
            scale: 1.0,
            rotation_per_tick: [0.0; 3],
        }
    }
}

impl ModelConfig {
    pub fn new(uri: &str, scale: f32, rotation_per_tick: [f32; 3]) -> Self {
        Self {
            uri: uri.to_string(),
            scale,
            rotation_per_tick,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrollCameraConfig {
    pub factors: ScrollFactors,
    /// Furthest the wheel can scroll, in pixels
    pub max_scroll: f32,
    /// Added to the torus knot's rotation on every scroll event
    pub torus_knot_spin: [f32; 3],
    /// Added to the avatar's rotation on every scroll event
    pub avatar_spin: [f32; 3],
}

impl Default for ScrollCameraConfig {
    fn default() -> Self {
        Self {
            factors: ScrollFactors::default(),
            max_scroll: 5000.0,
            torus_knot_spin: [0.05, 0.075, 0.05],
            avatar_spin: [0.0, 0.01, 0.01],
        }
    }
}

/// Everything needed to assemble a scene; read-only after startup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub camera: CameraConfig,
    pub star_field: StarFieldConfig,
    pub torus_knot: TorusKnotConfig,
    pub avatar: AvatarConfig,
    pub background: BackgroundConfig,
    pub lights: LightsConfig,
    pub helpers: HelpersConfig,
    pub orbit_controls: bool,
    pub models: Vec<ModelConfig>,
    pub planet: Option<PlanetSpec>,
    pub scroll_camera: Option<ScrollCameraConfig>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self::preset(Preset::Galaxy)
    }
}

const GALAXY_MODEL: &str = "/assets/galaxy/scene.gltf";

impl SceneConfig {
    pub fn preset(preset: Preset) -> Self {
        let galaxy = Self {
            camera: CameraConfig::default(),
            star_field: StarFieldConfig::default(),
            torus_knot: TorusKnotConfig::default(),
            avatar: AvatarConfig::default(),
            background: BackgroundConfig::default(),
            lights: LightsConfig::default(),
            helpers: HelpersConfig::default(),
            orbit_controls: true,
            models: vec![ModelConfig::new(GALAXY_MODEL, 50.0, [-0.0025, -0.0025, 0.001])],
            planet: None,
            scroll_camera: None,
        };

        match preset {
            Preset::Galaxy => galaxy,
            Preset::Planet => Self {
                helpers: HelpersConfig {
                    enabled: false,
                    ..Default::default()
                },
                planet: Some(scene_planet()),
                ..galaxy
            },
            Preset::Scroll => Self {
                torus_knot: TorusKnotConfig {
                    spin: [0.01, 0.005, 0.01],
                    ..Default::default()
                },
                helpers: HelpersConfig {
                    enabled: false,
                    ..Default::default()
                },
                orbit_controls: false,
                models: Vec::new(),
                scroll_camera: Some(ScrollCameraConfig::default()),
                ..galaxy
            },
            Preset::Showcase => Self {
                helpers: HelpersConfig {
                    enabled: false,
                    ..Default::default()
                },
                models: vec![
                    ModelConfig::new(GALAXY_MODEL, 50.0, [-0.0025, -0.0025, 0.001]),
                    ModelConfig::new("/assets/black_hole/scene.gltf", 4.0, [0.0, 0.002, 0.0]),
                    ModelConfig::new("/assets/spaceship/scene.gltf", 0.5, [0.0, -0.004, 0.0]),
                    ModelConfig::new("/assets/astronaut/scene.gltf", 2.0, [0.003, 0.005, 0.0]),
                    ModelConfig::new("/assets/moon/scene.gltf", 1.5, [0.0, 0.001, 0.0]),
                ],
                planet: Some(scene_planet()),
                ..galaxy
            },
        }
    }

    /// Read a JSON config; absent fields take the galaxy defaults
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("Invalid config {}", path.display()))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Earth scaled up to sit beside the torus knot
fn scene_planet() -> PlanetSpec {
    let mut planet = PlanetSpec::earth();
    planet.position = [-15.0, 5.0, 5.0];
    planet.surface.size = 5.0;
    planet.atmosphere.size = 0.03;
    planet.glow.size = 1.0;
    planet
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_galaxy_defaults() {
        let config = SceneConfig::default();
        assert_eq!(config.camera.position, [-3.0, 0.0, 30.0]);
        assert_eq!(config.star_field.count, 500);
        assert_eq!(config.models.len(), 1);
        assert_eq!(config.models[0].rotation_per_tick, [-0.0025, -0.0025, 0.001]);
        assert!(config.helpers.enabled);
        assert!(config.orbit_controls);
        assert!(config.planet.is_none());
    }

    #[test]
    fn test_presets_differ_only_where_expected() {
        let planet = SceneConfig::preset(Preset::Planet);
        assert!(planet.planet.is_some());
        assert!(!planet.helpers.enabled);

        let scroll = SceneConfig::preset(Preset::Scroll);
        assert!(scroll.scroll_camera.is_some());
        assert!(!scroll.orbit_controls);

        let showcase = SceneConfig::preset(Preset::Showcase);
        assert_eq!(showcase.models.len(), 5);
        assert!(showcase.planet.is_some());
    }

    #[test]
    fn test_partial_json_takes_defaults() {
        let config =
            SceneConfig::from_json(r#"{ "star_field": { "count": 10 }, "orbit_controls": false }"#)
                .unwrap();
        assert_eq!(config.star_field.count, 10);
        assert_eq!(config.star_field.radius, 0.25);
        assert!(!config.orbit_controls);
        assert_eq!(config.camera, CameraConfig::default());
    }

    #[test]
    fn test_json_round_trip_of_preset() {
        let config = SceneConfig::preset(Preset::Showcase);
        let parsed = SceneConfig::from_json(&config.to_json().unwrap()).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = SceneConfig::from_json_file(Path::new("/nonexistent/scene.json")).unwrap_err();
        assert!(format!("{:#}", err).contains("/nonexistent/scene.json"));
    }
}
