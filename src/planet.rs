//! Three-shell planet: textured surface, translucent atmosphere and a glow rim.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::assets::AssetLoader;
use crate::math::Color;
use crate::scene::{
    Geometry, Material, MaterialOptions, Node, NodeId, SceneGraph, Side, TextureChannel,
    TextureTarget,
};

const SEGMENTS: u32 = 32;

/// Optional texture URIs for each material channel
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextureUris {
    pub map: Option<String>,
    pub bump_map: Option<String>,
    pub specular_map: Option<String>,
    pub alpha_map: Option<String>,
}

impl TextureUris {
    fn channels(&self) -> impl Iterator<Item = (TextureChannel, &str)> {
        [
            (TextureChannel::Map, &self.map),
            (TextureChannel::BumpMap, &self.bump_map),
            (TextureChannel::SpecularMap, &self.specular_map),
            (TextureChannel::AlphaMap, &self.alpha_map),
        ]
        .into_iter()
        .filter_map(|(channel, uri)| uri.as_deref().map(|uri| (channel, uri)))
    }

    pub fn len(&self) -> usize {
        self.channels().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceSpec {
    pub size: f32,
    pub material: MaterialOptions,
    pub textures: TextureUris,
}

impl Default for SurfaceSpec {
    fn default() -> Self {
        Self {
            size: 0.5,
            material: MaterialOptions::default(),
            textures: TextureUris::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AtmosphereSpec {
    /// Thickness added on top of the surface radius
    pub size: f32,
    pub material: MaterialOptions,
    pub textures: TextureUris,
}

impl Default for AtmosphereSpec {
    fn default() -> Self {
        Self {
            size: 0.003,
            material: MaterialOptions::default(),
            textures: TextureUris::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlowSpec {
    /// Thickness added on top of the atmosphere radius
    pub size: f32,
    pub intensity: f32,
    pub fade: f32,
    /// `0xRRGGBB`
    pub color: u32,
}

impl Default for GlowSpec {
    fn default() -> Self {
        Self {
            size: 0.1,
            intensity: 0.7,
            fade: 7.0,
            color: 0x93cfef,
        }
    }
}

/// Per-tick spin and orbit increments, in radians
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanetMotion {
    pub spin: f32,
    pub atmosphere_spin: f32,
    pub orbit_radius: f32,
    pub orbit_speed: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanetSpec {
    pub name: String,
    pub position: [f32; 3],
    pub surface: SurfaceSpec,
    pub atmosphere: AtmosphereSpec,
    pub glow: GlowSpec,
    pub motion: PlanetMotion,
}

impl PlanetSpec {
    /// Textured earth with cloud layer and a pale blue rim
    pub fn earth() -> Self {
        const TEXTURES: &str = "https://s3-us-west-2.amazonaws.com/s.cdpn.io/141228";
        Self {
            name: "earth".to_string(),
            position: [0.0, 0.0, 0.0],
            surface: SurfaceSpec {
                size: 0.5,
                material: MaterialOptions {
                    bump_scale: Some(0.05),
                    specular: Some(0x333333),
                    shininess: Some(10.0),
                    ..Default::default()
                },
                textures: TextureUris {
                    map: Some(format!("{TEXTURES}/earthmap1k.jpg")),
                    bump_map: Some(format!("{TEXTURES}/earthbump1k.jpg")),
                    specular_map: Some(format!("{TEXTURES}/earthspec1k.jpg")),
                    alpha_map: None,
                },
            },
            atmosphere: AtmosphereSpec {
                size: 0.003,
                material: MaterialOptions {
                    opacity: Some(0.8),
                    ..Default::default()
                },
                textures: TextureUris {
                    map: Some(format!("{TEXTURES}/earthcloudmap.jpg")),
                    alpha_map: Some(format!("{TEXTURES}/earthcloudmap.jpg")),
                    ..Default::default()
                },
            },
            glow: GlowSpec::default(),
            motion: PlanetMotion {
                spin: 0.002,
                atmosphere_spin: 0.0025,
                orbit_radius: 0.0,
                orbit_speed: 0.0,
            },
        }
    }
}

/// Radii of the three shells; each encloses the previous one
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanetRadii {
    pub surface: f32,
    pub atmosphere: f32,
    pub glow: f32,
}

impl PlanetRadii {
    pub fn from_spec(spec: &PlanetSpec) -> Self {
        let surface = spec.surface.size;
        let atmosphere = surface + spec.atmosphere.size;
        Self {
            surface,
            atmosphere,
            glow: atmosphere + spec.glow.size,
        }
    }
}

/// A planet living in a [`SceneGraph`], plus the state advanced every tick
#[derive(Debug, Clone)]
pub struct Planet {
    pub root: NodeId,
    pub surface: NodeId,
    pub atmosphere: NodeId,
    pub glow: NodeId,
    pub radii: PlanetRadii,
    center: Vec3,
    motion: PlanetMotion,
    orbit_angle: f32,
}

/// Build the planet under the scene root and request its textures.
///
/// Returns immediately; textures land on the materials as the loader is pumped.
pub fn create_planet(spec: &PlanetSpec, scene: &mut SceneGraph, loader: &mut AssetLoader) -> Planet {
    let radii = PlanetRadii::from_spec(spec);
    let center = Vec3::from(spec.position);
    let name = if spec.name.is_empty() { "planet" } else { spec.name.as_str() };

    let root = scene.add(Node::group(name).with_position(center));

    let surface_material = Material::phong().merged(&spec.surface.material);
    let surface = scene.add_child(
        root,
        Node::mesh(
            "surface",
            Geometry::sphere(radii.surface, SEGMENTS, SEGMENTS),
            surface_material,
        ),
    );

    let atmosphere_material = atmosphere_defaults().merged(&spec.atmosphere.material);
    let atmosphere = scene.add_child(
        root,
        Node::mesh(
            "atmosphere",
            Geometry::sphere(radii.atmosphere, SEGMENTS, SEGMENTS),
            atmosphere_material,
        ),
    );

    let glow_material = Material::glow(
        spec.glow.intensity,
        spec.glow.fade,
        Color::from_hex(spec.glow.color),
    );
    let glow = scene.add_child(
        root,
        Node::mesh(
            "glow",
            Geometry::sphere(radii.glow, SEGMENTS, SEGMENTS),
            glow_material,
        ),
    );

    for (channel, uri) in spec.surface.textures.channels() {
        loader.load_texture(uri, TextureTarget::Material { node: surface, channel });
    }
    for (channel, uri) in spec.atmosphere.textures.channels() {
        loader.load_texture(uri, TextureTarget::Material { node: atmosphere, channel });
    }

    log::info!(
        "Planet '{}' created (radii {:.3} / {:.3} / {:.3}, {} textures requested)",
        name,
        radii.surface,
        radii.atmosphere,
        radii.glow,
        spec.surface.textures.len() + spec.atmosphere.textures.len()
    );

    Planet {
        root,
        surface,
        atmosphere,
        glow,
        radii,
        center,
        motion: spec.motion,
        orbit_angle: 0.0,
    }
}

fn atmosphere_defaults() -> Material {
    Material {
        side: Side::Double,
        transparent: true,
        opacity: 0.8,
        depth_write: false,
        ..Material::phong()
    }
}

impl Planet {
    /// Spin the surface and atmosphere, and move along the orbit when one is set
    pub fn advance(&mut self, scene: &mut SceneGraph) {
        if let Some(transform) = scene.transform_mut(self.surface) {
            transform.rotation.y += self.motion.spin;
        }
        if let Some(transform) = scene.transform_mut(self.atmosphere) {
            transform.rotation.y += self.motion.atmosphere_spin;
        }

        if self.motion.orbit_radius > 0.0 {
            self.orbit_angle += self.motion.orbit_speed;
            let offset = Vec3::new(self.orbit_angle.cos(), 0.0, self.orbit_angle.sin())
                * self.motion.orbit_radius;
            if let Some(transform) = scene.transform_mut(self.root) {
                transform.position = self.center + offset;
            }
        }
    }

    pub fn orbit_angle(&self) -> f32 {
        self.orbit_angle
    }

    pub fn parts(&self) -> [NodeId; 3] {
        [self.surface, self.atmosphere, self.glow]
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::assets::{AssetSource, ModelData, TextureData};
    use crate::error::LoadError;
    use crate::scene::{Blending, Shading};

    struct NoSource;

    impl AssetSource for NoSource {
        fn load_model(&self, uri: &str) -> Result<ModelData, LoadError> {
            Err(LoadError::EmptyModel { uri: uri.to_string() })
        }

        fn load_texture(&self, uri: &str) -> Result<TextureData, LoadError> {
            Err(LoadError::EmptyModel { uri: uri.to_string() })
        }
    }

    fn build(spec: &PlanetSpec) -> (SceneGraph, AssetLoader, Planet) {
        let mut scene = SceneGraph::new();
        let mut loader = AssetLoader::new(Arc::new(NoSource));
        let planet = create_planet(spec, &mut scene, &mut loader);
        (scene, loader, planet)
    }

    #[test]
    fn test_radii_nest() {
        let (scene, _, planet) = build(&PlanetSpec::earth());
        let radius = |id| {
            scene
                .node(id)
                .and_then(|n| n.as_mesh())
                .and_then(|m| m.geometry.sphere_radius())
                .unwrap()
        };
        assert_eq!(radius(planet.surface), 0.5);
        assert_eq!(radius(planet.atmosphere), 0.5 + 0.003);
        assert_eq!(radius(planet.glow), 0.5 + 0.003 + 0.1);
    }

    #[test]
    fn test_three_named_parts() {
        let (scene, _, planet) = build(&PlanetSpec::default());
        let names: Vec<_> = scene
            .children(planet.root)
            .iter()
            .map(|&id| scene.node(id).unwrap().name.clone())
            .collect();
        assert_eq!(names, ["surface", "atmosphere", "glow"]);
        assert_eq!(scene.node(planet.root).unwrap().name, "planet");
    }

    #[test]
    fn test_materials() {
        let (scene, _, planet) = build(&PlanetSpec::earth());
        let material = |id| scene.node(id).unwrap().as_mesh().unwrap().material.clone();

        let surface = material(planet.surface);
        assert_eq!(surface.shading, Shading::Phong);
        assert_eq!(surface.bump_scale, 0.05);
        assert_eq!(surface.specular.to_hex(), 0x333333);

        let atmosphere = material(planet.atmosphere);
        assert_eq!(atmosphere.side, Side::Double);
        assert!(atmosphere.is_transparent());
        assert!(!atmosphere.depth_write);

        let glow = material(planet.glow);
        assert_eq!(glow.shading, Shading::Glow { intensity: 0.7, fade: 7.0 });
        assert_eq!(glow.side, Side::Back);
        assert_eq!(glow.blending, Blending::Additive);
        assert_eq!(glow.color.to_hex(), 0x93cfef);
    }

    #[test]
    fn test_textures_requested_without_blocking() {
        let (_, loader, _) = build(&PlanetSpec::earth());
        assert_eq!(loader.issued(), 5);
    }

    #[test]
    fn test_failed_texture_keeps_default_material() {
        let (mut scene, mut loader, planet) = build(&PlanetSpec::earth());
        let report = loader.pump_until_idle(&mut scene, std::time::Duration::from_secs(5));
        assert_eq!(report.failed.len(), 5);
        let surface = scene.node(planet.surface).unwrap().as_mesh().unwrap();
        assert!(surface.material.maps.map.is_none());
    }

    #[test]
    fn test_advance_spins_and_orbits() {
        let mut spec = PlanetSpec::default();
        spec.position = [1.0, 0.0, 0.0];
        spec.motion = PlanetMotion {
            spin: 0.1,
            atmosphere_spin: 0.2,
            orbit_radius: 2.0,
            orbit_speed: std::f32::consts::FRAC_PI_2,
        };
        let (mut scene, _, mut planet) = build(&spec);

        planet.advance(&mut scene);

        assert_eq!(scene.node(planet.surface).unwrap().transform.rotation.y, 0.1);
        assert_eq!(scene.node(planet.atmosphere).unwrap().transform.rotation.y, 0.2);
        let position = scene.node(planet.root).unwrap().transform.position;
        assert!((position - Vec3::new(1.0, 0.0, 2.0)).length() < 1e-5);
    }

    #[test]
    fn test_no_orbit_keeps_position() {
        let mut spec = PlanetSpec::default();
        spec.position = [3.0, 4.0, 5.0];
        let (mut scene, _, mut planet) = build(&spec);
        planet.advance(&mut scene);
        assert_eq!(
            scene.node(planet.root).unwrap().transform.position,
            Vec3::new(3.0, 4.0, 5.0)
        );
        assert_eq!(planet.orbit_angle(), 0.0);
    }
}
