use std::sync::Arc;

use glam::{Mat4, Vec3};

use crate::assets::TextureData;
use crate::math::{Color, Transform};

use super::geometry::Geometry;
use super::material::{Material, TextureChannel, TextureHandle};

/// Index of a node inside its [`SceneGraph`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Light {
    Point { color: Color, intensity: f32 },
    Ambient { color: Color, intensity: f32 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub geometry: Geometry,
    pub material: Material,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Group,
    Mesh(Mesh),
    Light(Light),
}

#[derive(Debug, Clone)]
pub struct Node {
    pub name: String,
    pub transform: Transform,
    pub kind: NodeKind,
    pub visible: bool,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    pub fn new(name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            name: name.into(),
            transform: Transform::IDENTITY,
            kind,
            visible: true,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn group(name: impl Into<String>) -> Self {
        Self::new(name, NodeKind::Group)
    }

    pub fn mesh(name: impl Into<String>, geometry: Geometry, material: Material) -> Self {
        Self::new(name, NodeKind::Mesh(Mesh { geometry, material }))
    }

    pub fn light(name: impl Into<String>, light: Light) -> Self {
        Self::new(name, NodeKind::Light(light))
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.transform.position = position;
        self
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.transform.scale = scale;
        self
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn as_mesh(&self) -> Option<&Mesh> {
        match &self.kind {
            NodeKind::Mesh(mesh) => Some(mesh),
            _ => None,
        }
    }

    pub fn material_mut(&mut self) -> Option<&mut Material> {
        match &mut self.kind {
            NodeKind::Mesh(mesh) => Some(&mut mesh.material),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Background {
    Color(Color),
    Texture(TextureHandle),
}

/// Where a loaded texture is applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureTarget {
    Material { node: NodeId, channel: TextureChannel },
    Background,
}

/// Mesh node visited during a traversal, with its accumulated world matrix
pub struct VisitedMesh<'a> {
    pub id: NodeId,
    pub node: &'a Node,
    pub mesh: &'a Mesh,
    pub world: Mat4,
}

/// Arena of nodes rooted at [`SceneGraph::root`]
#[derive(Debug, Clone)]
pub struct SceneGraph {
    nodes: Vec<Node>,
    textures: Vec<Arc<TextureData>>,
    background: Background,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::group("scene")],
            textures: Vec::new(),
            background: Background::Color(Color::BLACK),
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Add a node directly under the root
    pub fn add(&mut self, node: Node) -> NodeId {
        self.add_child(self.root(), node)
    }

    pub fn add_child(&mut self, parent: NodeId, mut node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        node.parent = Some(parent);
        node.children.clear();
        self.nodes.push(node);
        self.nodes[parent.0].children.push(id);
        id
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    pub fn transform_mut(&mut self, id: NodeId) -> Option<&mut Transform> {
        self.node_mut(id).map(|node| &mut node.transform)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(Node::children).unwrap_or(&[])
    }

    /// Number of direct children of the root
    pub fn child_count(&self) -> usize {
        self.children(self.root()).len()
    }

    /// Number of nodes including the root
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    pub fn find_by_name(&self, name: &str) -> Option<NodeId> {
        self.nodes.iter().position(|n| n.name == name).map(NodeId)
    }

    pub fn world_matrix(&self, id: NodeId) -> Mat4 {
        let mut matrix = Mat4::IDENTITY;
        let mut current = Some(id);
        while let Some(node_id) = current {
            let Some(node) = self.node(node_id) else {
                break;
            };
            matrix = node.transform.matrix() * matrix;
            current = node.parent;
        }
        matrix
    }

    /// Visible meshes in depth-first order, hidden subtrees skipped
    pub fn visible_meshes(&self) -> Vec<VisitedMesh<'_>> {
        let mut out = Vec::new();
        let mut stack = vec![(self.root(), Mat4::IDENTITY)];
        while let Some((id, parent_world)) = stack.pop() {
            let node = &self.nodes[id.0];
            if !node.visible {
                continue;
            }
            let world = parent_world * node.transform.matrix();
            if let NodeKind::Mesh(mesh) = &node.kind {
                out.push(VisitedMesh {
                    id,
                    node,
                    mesh,
                    world,
                });
            }
            stack.extend(node.children.iter().rev().map(|&child| (child, world)));
        }
        out
    }

    /// Lights with their world-space positions
    pub fn lights(&self) -> Vec<(Light, Vec3)> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| node.visible)
            .filter_map(|(index, node)| match node.kind {
                NodeKind::Light(light) => Some((
                    light,
                    self.world_matrix(NodeId(index)).transform_point3(Vec3::ZERO),
                )),
                _ => None,
            })
            .collect()
    }

    pub fn add_texture(&mut self, texture: TextureData) -> TextureHandle {
        let handle = TextureHandle(self.textures.len() as u32);
        self.textures.push(Arc::new(texture));
        handle
    }

    pub fn texture(&self, handle: TextureHandle) -> Option<&Arc<TextureData>> {
        self.textures.get(handle.0 as usize)
    }

    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    pub fn background(&self) -> Background {
        self.background
    }

    pub fn set_background(&mut self, background: Background) {
        self.background = background;
    }

    /// Store a texture and bind it to its target.
    /// Returns `false` when the target node is missing or has no material.
    pub fn apply_texture(&mut self, target: TextureTarget, texture: TextureData) -> bool {
        match target {
            TextureTarget::Background => {
                let handle = self.add_texture(texture);
                self.background = Background::Texture(handle);
                true
            }
            TextureTarget::Material { node, channel } => {
                let has_material = self
                    .node(node)
                    .map(|n| n.as_mesh().is_some())
                    .unwrap_or(false);
                if !has_material {
                    return false;
                }
                let handle = self.add_texture(texture);
                if let Some(material) = self.node_mut(node).and_then(Node::material_mut) {
                    material.maps.set(channel, handle);
                }
                true
            }
        }
    }
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}
