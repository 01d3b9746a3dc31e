use std::collections::HashMap;
use std::sync::Arc;

use glam::{Mat3, Mat4, Vec3};

use super::texture::TextureData;
use crate::error::LoadError;
use crate::math::Color;
use crate::scene::{
    Geometry, Material, MeshData, Node, NodeId, SceneGraph, Side, TextureChannel, Vertex,
};

/// One triangle primitive of a model, already in model space
#[derive(Debug, Clone)]
pub struct ModelMesh {
    pub name: String,
    pub mesh: Arc<MeshData>,
    pub base_color: Color,
    pub opacity: f32,
    pub double_sided: bool,
    /// Index into [`ModelData::textures`]
    pub texture: Option<usize>,
}

/// Model bundle decoded off the frame thread
#[derive(Debug, Clone)]
pub struct ModelData {
    pub uri: String,
    pub meshes: Vec<ModelMesh>,
    pub textures: Vec<TextureData>,
}

/// Handle to a model subtree attached to the scene
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedModel {
    pub uri: String,
    pub root: NodeId,
    pub mesh_count: usize,
}

impl ModelData {
    /// Flatten every triangle primitive of the default scene into model space
    pub fn from_gltf(
        uri: &str,
        document: &gltf::Document,
        buffers: &[gltf::buffer::Data],
        images: &[gltf::image::Data],
    ) -> Result<Self, LoadError> {
        log::debug!(
            "glTF {}: {} scenes, {} nodes, {} meshes, {} images",
            uri,
            document.scenes().count(),
            document.nodes().count(),
            document.meshes().count(),
            images.len()
        );

        let mut meshes = Vec::new();
        let scene = document
            .default_scene()
            .or_else(|| document.scenes().next());
        if let Some(scene) = scene {
            for node in scene.nodes() {
                collect_node(&node, buffers, Mat4::IDENTITY, &mut meshes);
            }
        }

        if meshes.is_empty() {
            return Err(LoadError::EmptyModel {
                uri: uri.to_string(),
            });
        }

        Ok(Self {
            uri: uri.to_string(),
            meshes,
            textures: images.iter().map(TextureData::from_gltf_image).collect(),
        })
    }

    pub fn triangle_count(&self) -> usize {
        self.meshes.iter().map(|m| m.mesh.triangle_count()).sum()
    }

    /// Attach as one group directly under the scene root
    pub fn attach(self, scene: &mut SceneGraph) -> LoadedModel {
        let root = scene.add(Node::group(self.uri.clone()));

        let mut handles = HashMap::new();
        let mut textures: Vec<Option<TextureData>> = self.textures.into_iter().map(Some).collect();
        let mesh_count = self.meshes.len();

        for model_mesh in self.meshes {
            let mut material = Material::standard(model_mesh.base_color);
            material.opacity = model_mesh.opacity;
            material.transparent = model_mesh.opacity < 1.0;
            if model_mesh.double_sided {
                material.side = Side::Double;
            }

            if let Some(index) = model_mesh.texture {
                let handle = match handles.get(&index) {
                    Some(&handle) => Some(handle),
                    None => textures.get_mut(index).and_then(Option::take).map(|texture| {
                        let handle = scene.add_texture(texture);
                        handles.insert(index, handle);
                        handle
                    }),
                };
                if let Some(handle) = handle {
                    material = material.with_map(TextureChannel::Map, handle);
                }
            }

            scene.add_child(
                root,
                Node::mesh(
                    model_mesh.name,
                    Geometry::Custom(model_mesh.mesh),
                    material,
                ),
            );
        }

        LoadedModel {
            uri: self.uri,
            root,
            mesh_count,
        }
    }
}

fn collect_node(
    node: &gltf::Node,
    buffers: &[gltf::buffer::Data],
    parent_transform: Mat4,
    meshes: &mut Vec<ModelMesh>,
) {
    let local_transform = Mat4::from_cols_array_2d(&node.transform().matrix());
    let global_transform = parent_transform * local_transform;

    if let Some(mesh) = node.mesh() {
        for primitive in mesh.primitives() {
            if primitive.mode() != gltf::mesh::Mode::Triangles {
                log::warn!(
                    "Skipping {:?} primitive in mesh {:?}",
                    primitive.mode(),
                    mesh.name()
                );
                continue;
            }
            if let Some(model_mesh) =
                read_primitive(&primitive, buffers, global_transform, mesh.name())
            {
                meshes.push(model_mesh);
            }
        }
    }

    for child in node.children() {
        collect_node(&child, buffers, global_transform, meshes);
    }
}

fn read_primitive(
    primitive: &gltf::Primitive,
    buffers: &[gltf::buffer::Data],
    transform: Mat4,
    mesh_name: Option<&str>,
) -> Option<ModelMesh> {
    let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(|data| &data[..]));

    let positions: Vec<Vec3> = reader
        .read_positions()?
        .map(|p| transform.transform_point3(Vec3::from_array(p)))
        .collect();
    if positions.is_empty() {
        return None;
    }

    let indices: Vec<u32> = match reader.read_indices() {
        Some(indices) => indices.into_u32().collect(),
        None => (0..positions.len() as u32).collect(),
    };
    let indices: Vec<u32> = indices
        .chunks_exact(3)
        .filter(|tri| tri.iter().all(|&i| (i as usize) < positions.len()))
        .flatten()
        .copied()
        .collect();

    let normal_matrix = Mat3::from_mat4(transform).inverse().transpose();
    let normals: Vec<Vec3> = match reader.read_normals() {
        Some(normals) => normals
            .map(|n| (normal_matrix * Vec3::from_array(n)).normalize_or_zero())
            .collect(),
        None => smooth_normals(&positions, &indices),
    };
    let uvs: Vec<[f32; 2]> = reader
        .read_tex_coords(0)
        .map(|coords| coords.into_f32().collect())
        .unwrap_or_default();

    let vertices = positions
        .iter()
        .enumerate()
        .map(|(i, &position)| {
            Vertex::new(
                position,
                normals.get(i).copied().unwrap_or(Vec3::Y),
                uvs.get(i).copied().unwrap_or([0.0, 0.0]),
            )
        })
        .collect();

    let material = primitive.material();
    let pbr = material.pbr_metallic_roughness();
    let [r, g, b, a] = pbr.base_color_factor();

    Some(ModelMesh {
        name: mesh_name.unwrap_or("mesh").to_string(),
        mesh: Arc::new(MeshData::triangles(vertices, indices)),
        base_color: Color::new(r, g, b),
        opacity: a,
        double_sided: material.double_sided(),
        texture: pbr
            .base_color_texture()
            .map(|info| info.texture().source().index()),
    })
}

/// Area-weighted vertex normals for primitives that ship without them
pub fn smooth_normals(positions: &[Vec3], indices: &[u32]) -> Vec<Vec3> {
    let mut normals = vec![Vec3::ZERO; positions.len()];
    for tri in indices.chunks_exact(3) {
        let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
        let face = (positions[b] - positions[a]).cross(positions[c] - positions[a]);
        normals[a] += face;
        normals[b] += face;
        normals[c] += face;
    }
    normals
        .into_iter()
        .map(|n| n.try_normalize().unwrap_or(Vec3::Y))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad_model(uri: &str, texture: Option<usize>) -> ModelData {
        let mesh = Arc::new(Geometry::cube(1.0).build());
        ModelData {
            uri: uri.to_string(),
            meshes: vec![
                ModelMesh {
                    name: "hull".to_string(),
                    mesh: Arc::clone(&mesh),
                    base_color: Color::WHITE,
                    opacity: 1.0,
                    double_sided: false,
                    texture,
                },
                ModelMesh {
                    name: "glass".to_string(),
                    mesh,
                    base_color: Color::new(0.2, 0.4, 1.0),
                    opacity: 0.5,
                    double_sided: true,
                    texture,
                },
            ],
            textures: vec![TextureData::solid(1, 1, [255; 4])],
        }
    }

    #[test]
    fn test_attach_adds_single_root_child() {
        let mut scene = SceneGraph::new();
        let loaded = quad_model("ship.gltf", None).attach(&mut scene);

        assert_eq!(scene.child_count(), 1);
        assert_eq!(loaded.mesh_count, 2);
        assert_eq!(scene.children(loaded.root).len(), 2);
        assert_eq!(scene.node(loaded.root).unwrap().name, "ship.gltf");
    }

    #[test]
    fn test_attach_shares_texture_between_meshes() {
        let mut scene = SceneGraph::new();
        let loaded = quad_model("ship.gltf", Some(0)).attach(&mut scene);

        assert_eq!(scene.texture_count(), 1);
        let maps: Vec<_> = scene
            .children(loaded.root)
            .iter()
            .map(|&id| scene.node(id).unwrap().as_mesh().unwrap().material.maps.map)
            .collect();
        assert_eq!(maps[0], maps[1]);
        assert!(maps[0].is_some());
    }

    #[test]
    fn test_attach_transparency_and_sides() {
        let mut scene = SceneGraph::new();
        let loaded = quad_model("ship.gltf", None).attach(&mut scene);
        let glass = scene.children(loaded.root)[1];
        let material = &scene.node(glass).unwrap().as_mesh().unwrap().material;

        assert!(material.transparent);
        assert_eq!(material.side, Side::Double);
    }

    #[test]
    fn test_smooth_normals_of_flat_triangle() {
        let positions = [Vec3::ZERO, Vec3::X, Vec3::Y];
        let normals = smooth_normals(&positions, &[0, 1, 2]);
        for n in normals {
            assert!(n.abs_diff_eq(Vec3::Z, 1e-6));
        }
    }
}
