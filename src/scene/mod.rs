mod geometry;
mod graph;
mod material;

pub use geometry::{Axis, Geometry, GeometryKey, MeshData, Topology, Vertex};
pub use graph::{
    Background, Light, Mesh, Node, NodeId, NodeKind, SceneGraph, TextureTarget, VisitedMesh,
};
pub use material::{
    Blending, Material, MaterialOptions, Shading, Side, TextureChannel, TextureHandle, TextureMaps,
};
