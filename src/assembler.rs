use glam::Vec3;

use crate::assets::{AssetLoader, AssetSlot, LoadedModel};
use crate::camera::PerspectiveCamera;
use crate::config::SceneConfig;
use crate::controls::OrbitControls;
use crate::driver::FrameDriver;
use crate::math::{Color, SpreadSampler};
use crate::planet::create_planet;
use crate::scene::{
    Axis, Background, Geometry, Light, Material, Node, NodeId, SceneGraph, TextureChannel,
    TextureTarget,
};
use crate::scroll::{ScrollCamera, ScrollOffset};

const GRID_COLOR: u32 = 0x888888;
const AXIS_COLORS: [(Axis, u32); 3] = [(Axis::X, 0xff0000), (Axis::Y, 0x00ff00), (Axis::Z, 0x0000ff)];

/// Scroll camera plus the offset it reads
#[derive(Debug, Clone)]
pub struct ScrollRig {
    pub camera: ScrollCamera,
    pub offset: ScrollOffset,
}

impl ScrollRig {
    /// Feed wheel travel and move the camera to match
    pub fn scroll(&mut self, pixels: f32, camera: &mut PerspectiveCamera, scene: &mut SceneGraph) {
        let t = self.offset.scroll(pixels);
        self.camera.apply(t, camera, scene);
    }
}

/// Scene ready for the frame loop
pub struct AssembledScene {
    pub scene: SceneGraph,
    pub camera: PerspectiveCamera,
    pub driver: FrameDriver,
    pub controls: Option<OrbitControls>,
    pub scroll: Option<ScrollRig>,
    pub slots: Vec<AssetSlot<LoadedModel>>,
    /// Root children present before any model load completes
    pub static_children: usize,
}

impl AssembledScene {
    pub fn loaded_slots(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_filled()).count()
    }
}

/// Build the scene once. Asset loads are only issued; they land as `loader` is pumped.
pub fn assemble(config: &SceneConfig, loader: &mut AssetLoader, aspect: f32) -> AssembledScene {
    let mut scene = SceneGraph::new();
    let mut driver = FrameDriver::new();

    let camera = PerspectiveCamera::new(
        config.camera.fov_y,
        aspect,
        config.camera.near,
        config.camera.far,
    )
    .with_position(Vec3::from(config.camera.position));

    let torus_knot = add_torus_knot(config, &mut scene, &mut driver);
    add_stars(config, &mut scene);
    add_background(config, &mut scene, loader);
    let avatar = add_avatar(config, &mut scene, loader);
    let point_light = add_lights(config, &mut scene);

    if config.helpers.enabled {
        add_helpers(config, point_light, &mut scene);
    }

    if let Some(spec) = &config.planet {
        let planet = create_planet(spec, &mut scene, loader);
        driver.add_planet(planet);
    }

    let static_children = scene.child_count();

    let slots: Vec<_> = config
        .models
        .iter()
        .map(|model| {
            let slot = loader.load_model(&model.uri);
            driver.animate_slot(slot.clone(), model.scale, Vec3::from(model.rotation_per_tick));
            slot
        })
        .collect();

    let orbit = config.orbit_controls && config.scroll_camera.is_none();
    if config.orbit_controls && !orbit {
        log::warn!("Orbit controls disabled: the scroll camera drives the camera");
    }
    let controls = orbit.then(OrbitControls::default);

    let mut assembled = AssembledScene {
        scene,
        camera,
        driver,
        controls,
        scroll: None,
        slots,
        static_children,
    };

    if let Some(scroll_config) = &config.scroll_camera {
        let mut scroll_camera = ScrollCamera::new(scroll_config.factors);
        if let Some(node) = torus_knot {
            scroll_camera.spin(node, Vec3::from(scroll_config.torus_knot_spin));
        }
        if let Some(node) = avatar {
            scroll_camera.spin(node, Vec3::from(scroll_config.avatar_spin));
        }
        let mut rig = ScrollRig {
            camera: scroll_camera,
            offset: ScrollOffset::new(scroll_config.max_scroll),
        };
        // Match the pose of an unscrolled page before the first frame
        rig.scroll(0.0, &mut assembled.camera, &mut assembled.scene);
        assembled.scroll = Some(rig);
    }

    log::info!(
        "Scene assembled: {} nodes, {} static root children, {} model loads, {} loads in flight",
        assembled.scene.len(),
        assembled.static_children,
        assembled.slots.len(),
        loader.pending()
    );
    assembled
}

fn add_torus_knot(config: &SceneConfig, scene: &mut SceneGraph, driver: &mut FrameDriver) -> Option<NodeId> {
    let knot = &config.torus_knot;
    if !knot.enabled {
        return None;
    }
    let geometry = Geometry::TorusKnot {
        radius: knot.radius,
        tube: knot.tube,
        tubular_segments: knot.tubular_segments,
        radial_segments: knot.radial_segments,
        p: knot.p,
        q: knot.q,
    };
    let node = scene.add(
        Node::mesh("torus-knot", geometry, Material::normal()).with_position(Vec3::from(knot.position)),
    );
    driver.spin(node, Vec3::from(knot.spin));
    Some(node)
}

fn add_stars(config: &SceneConfig, scene: &mut SceneGraph) {
    let stars = &config.star_field;
    let mut sampler = SpreadSampler::new(stars.seed);
    let geometry = Geometry::sphere(stars.radius, stars.segments, stars.segments);
    let material = Material::standard(Color::from_hex(stars.color));

    for _ in 0..stars.count {
        let position = sampler.point(stars.spread);
        scene.add(Node::mesh("star", geometry.clone(), material.clone()).with_position(position));
    }
}

fn add_background(config: &SceneConfig, scene: &mut SceneGraph, loader: &mut AssetLoader) {
    scene.set_background(Background::Color(Color::from_hex(config.background.color)));
    if let Some(uri) = &config.background.texture {
        loader.load_texture(uri, TextureTarget::Background);
    }
}

fn add_avatar(config: &SceneConfig, scene: &mut SceneGraph, loader: &mut AssetLoader) -> Option<NodeId> {
    let avatar = &config.avatar;
    if !avatar.enabled {
        return None;
    }
    let node = scene.add(
        Node::mesh("avatar", Geometry::cube(avatar.size), Material::basic(Color::WHITE))
            .with_position(Vec3::from(avatar.position))
            .with_scale(Vec3::splat(avatar.scale)),
    );
    if let Some(uri) = &avatar.texture {
        loader.load_texture(
            uri,
            TextureTarget::Material {
                node,
                channel: TextureChannel::Map,
            },
        );
    }
    Some(node)
}

fn add_lights(config: &SceneConfig, scene: &mut SceneGraph) -> Option<NodeId> {
    let lights = &config.lights;
    let point = lights.point.then(|| {
        scene.add(
            Node::light(
                "point-light",
                Light::Point {
                    color: Color::from_hex(lights.point_color),
                    intensity: lights.point_intensity,
                },
            )
            .with_position(Vec3::from(lights.point_position)),
        )
    });
    if lights.ambient {
        scene.add(Node::light(
            "ambient-light",
            Light::Ambient {
                color: Color::from_hex(lights.ambient_color),
                intensity: lights.ambient_intensity,
            },
        ));
    }
    point
}

fn add_helpers(config: &SceneConfig, point_light: Option<NodeId>, scene: &mut SceneGraph) {
    let helpers = &config.helpers;

    if let Some(light) = point_light {
        let position = scene
            .node(light)
            .map(|node| node.transform.position)
            .unwrap_or_default();
        scene.add(
            Node::mesh(
                "light-helper",
                Geometry::WireSphere {
                    radius: helpers.light_marker_size,
                    segments: 4,
                },
                Material::line(Color::from_hex(config.lights.point_color)),
            )
            .with_position(position),
        );
    }

    scene.add(Node::mesh(
        "grid-helper",
        Geometry::Grid {
            size: helpers.grid_size,
            divisions: helpers.grid_divisions,
        },
        Material::line(Color::from_hex(GRID_COLOR)),
    ));

    let axes = scene.add(Node::group("axes-helper"));
    for (axis, color) in AXIS_COLORS {
        scene.add_child(
            axes,
            Node::mesh(
                "axis",
                Geometry::AxisLine {
                    axis,
                    length: helpers.axes_length,
                },
                Material::line(Color::from_hex(color)),
            ),
        );
    }
}
