use std::f32::consts::{PI, TAU};
use std::sync::Arc;

use glam::Vec3;

/// Interleaved vertex used by every mesh (32 bytes)
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl Vertex {
    pub const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<Vertex>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[
            wgpu::VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x3,
            },
            wgpu::VertexAttribute {
                offset: 12,
                shader_location: 1,
                format: wgpu::VertexFormat::Float32x3,
            },
            wgpu::VertexAttribute {
                offset: 24,
                shader_location: 2,
                format: wgpu::VertexFormat::Float32x2,
            },
        ],
    };

    pub fn new(position: Vec3, normal: Vec3, uv: [f32; 2]) -> Self {
        Self {
            position: position.to_array(),
            normal: normal.to_array(),
            uv,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topology {
    Triangles,
    Lines,
}

/// CPU-side mesh ready for upload
#[derive(Debug, Clone, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    pub topology: Topology,
}

impl MeshData {
    pub fn triangles(vertices: Vec<Vertex>, indices: Vec<u32>) -> Self {
        Self {
            vertices,
            indices,
            topology: Topology::Triangles,
        }
    }

    pub fn lines(vertices: Vec<Vertex>, indices: Vec<u32>) -> Self {
        Self {
            vertices,
            indices,
            topology: Topology::Lines,
        }
    }

    pub fn triangle_count(&self) -> usize {
        match self.topology {
            Topology::Triangles => self.indices.len() / 3,
            Topology::Lines => 0,
        }
    }

    /// Largest distance of any vertex from the local origin
    pub fn bounding_radius(&self) -> f32 {
        self.vertices
            .iter()
            .map(|v| Vec3::from_array(v.position).length())
            .fold(0.0, f32::max)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub fn unit(self) -> Vec3 {
        match self {
            Axis::X => Vec3::X,
            Axis::Y => Vec3::Y,
            Axis::Z => Vec3::Z,
        }
    }
}

/// Geometry description; meshes are generated on demand by the renderer
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Sphere {
        radius: f32,
        width_segments: u32,
        height_segments: u32,
    },
    Box {
        width: f32,
        height: f32,
        depth: f32,
    },
    TorusKnot {
        radius: f32,
        tube: f32,
        tubular_segments: u32,
        radial_segments: u32,
        p: u32,
        q: u32,
    },
    Grid {
        size: f32,
        divisions: u32,
    },
    AxisLine {
        axis: Axis,
        length: f32,
    },
    WireSphere {
        radius: f32,
        segments: u32,
    },
    Custom(Arc<MeshData>),
}

/// Hashable identity of a geometry, used to share uploaded meshes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeometryKey {
    Sphere([u32; 3]),
    Box([u32; 3]),
    TorusKnot([u32; 6]),
    Grid([u32; 2]),
    AxisLine(Axis, u32),
    WireSphere([u32; 2]),
    Custom(usize),
}

impl Geometry {
    pub fn sphere(radius: f32, width_segments: u32, height_segments: u32) -> Self {
        Geometry::Sphere {
            radius,
            width_segments,
            height_segments,
        }
    }

    pub fn cube(size: f32) -> Self {
        Geometry::Box {
            width: size,
            height: size,
            depth: size,
        }
    }

    /// Radius of a sphere geometry, `None` for anything else
    pub fn sphere_radius(&self) -> Option<f32> {
        match self {
            Geometry::Sphere { radius, .. } => Some(*radius),
            _ => None,
        }
    }

    pub fn key(&self) -> GeometryKey {
        match self {
            Geometry::Sphere {
                radius,
                width_segments,
                height_segments,
            } => GeometryKey::Sphere([radius.to_bits(), *width_segments, *height_segments]),
            Geometry::Box {
                width,
                height,
                depth,
            } => GeometryKey::Box([width.to_bits(), height.to_bits(), depth.to_bits()]),
            Geometry::TorusKnot {
                radius,
                tube,
                tubular_segments,
                radial_segments,
                p,
                q,
            } => GeometryKey::TorusKnot([
                radius.to_bits(),
                tube.to_bits(),
                *tubular_segments,
                *radial_segments,
                *p,
                *q,
            ]),
            Geometry::Grid { size, divisions } => GeometryKey::Grid([size.to_bits(), *divisions]),
            Geometry::AxisLine { axis, length } => GeometryKey::AxisLine(*axis, length.to_bits()),
            Geometry::WireSphere { radius, segments } => {
                GeometryKey::WireSphere([radius.to_bits(), *segments])
            }
            Geometry::Custom(mesh) => GeometryKey::Custom(Arc::as_ptr(mesh) as usize),
        }
    }

    pub fn build(&self) -> MeshData {
        match self {
            Geometry::Sphere {
                radius,
                width_segments,
                height_segments,
            } => build_sphere(*radius, *width_segments, *height_segments),
            Geometry::Box {
                width,
                height,
                depth,
            } => build_box(Vec3::new(*width, *height, *depth)),
            Geometry::TorusKnot {
                radius,
                tube,
                tubular_segments,
                radial_segments,
                p,
                q,
            } => build_torus_knot(*radius, *tube, *tubular_segments, *radial_segments, *p, *q),
            Geometry::Grid { size, divisions } => build_grid(*size, *divisions),
            Geometry::AxisLine { axis, length } => build_axis_line(*axis, *length),
            Geometry::WireSphere { radius, segments } => build_wire_sphere(*radius, *segments),
            Geometry::Custom(mesh) => mesh.as_ref().clone(),
        }
    }
}

fn build_sphere(radius: f32, width_segments: u32, height_segments: u32) -> MeshData {
    let width_segments = width_segments.max(3);
    let height_segments = height_segments.max(2);
    let row = width_segments + 1;

    let mut vertices = Vec::with_capacity((row * (height_segments + 1)) as usize);
    for iy in 0..=height_segments {
        let v = iy as f32 / height_segments as f32;
        for ix in 0..=width_segments {
            let u = ix as f32 / width_segments as f32;
            let direction = Vec3::new(
                -(u * TAU).cos() * (v * PI).sin(),
                (v * PI).cos(),
                (u * TAU).sin() * (v * PI).sin(),
            );
            vertices.push(Vertex::new(direction * radius, direction, [u, v]));
        }
    }

    let mut indices = Vec::new();
    for iy in 0..height_segments {
        for ix in 0..width_segments {
            let a = iy * row + ix + 1;
            let b = iy * row + ix;
            let c = (iy + 1) * row + ix;
            let d = (iy + 1) * row + ix + 1;

            // Pole rows collapse to a single triangle
            if iy != 0 {
                indices.extend_from_slice(&[a, b, d]);
            }
            if iy != height_segments - 1 {
                indices.extend_from_slice(&[b, c, d]);
            }
        }
    }

    MeshData::triangles(vertices, indices)
}

fn build_box(size: Vec3) -> MeshData {
    let half = size * 0.5;
    // (normal, right, up) with right x up == normal so quads wind counter-clockwise
    let faces = [
        (Vec3::X, Vec3::NEG_Z, Vec3::Y),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::X, Vec3::NEG_Z),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
    ];
    let corners = [(-1.0, -1.0, [0.0, 1.0]), (1.0, -1.0, [1.0, 1.0]), (1.0, 1.0, [1.0, 0.0]), (-1.0, 1.0, [0.0, 0.0])];

    let mut vertices = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);
    for (normal, right, up) in faces {
        let base = vertices.len() as u32;
        for (sx, sy, uv) in corners {
            let position = (normal + right * sx + up * sy) * half;
            vertices.push(Vertex::new(position, normal, uv));
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    MeshData::triangles(vertices, indices)
}

fn torus_knot_curve(u: f32, p: f32, q: f32, radius: f32) -> Vec3 {
    let qu_over_p = q / p * u;
    let cs = qu_over_p.cos();
    Vec3::new(
        radius * (2.0 + cs) * 0.5 * u.cos(),
        radius * (2.0 + cs) * u.sin() * 0.5,
        radius * qu_over_p.sin() * 0.5,
    )
}

fn build_torus_knot(
    radius: f32,
    tube: f32,
    tubular_segments: u32,
    radial_segments: u32,
    p: u32,
    q: u32,
) -> MeshData {
    let tubular_segments = tubular_segments.max(3);
    let radial_segments = radial_segments.max(3);
    let (pf, qf) = (p.max(1) as f32, q as f32);

    let mut vertices = Vec::with_capacity(((tubular_segments + 1) * (radial_segments + 1)) as usize);
    for i in 0..=tubular_segments {
        let u = i as f32 / tubular_segments as f32 * pf * TAU;
        let p1 = torus_knot_curve(u, pf, qf, radius);
        let p2 = torus_knot_curve(u + 0.01, pf, qf, radius);

        // Frenet-like frame along the curve
        let tangent = p2 - p1;
        let binormal = tangent.cross(p2 + p1).normalize_or_zero();
        let normal = binormal.cross(tangent).normalize_or_zero();

        for j in 0..=radial_segments {
            let v = j as f32 / radial_segments as f32 * TAU;
            let cx = -tube * v.cos();
            let cy = tube * v.sin();
            let position = p1 + normal * cx + binormal * cy;
            vertices.push(Vertex::new(
                position,
                (position - p1).normalize_or_zero(),
                [
                    i as f32 / tubular_segments as f32,
                    j as f32 / radial_segments as f32,
                ],
            ));
        }
    }

    let row = radial_segments + 1;
    let mut indices = Vec::with_capacity((tubular_segments * radial_segments * 6) as usize);
    for j in 1..=tubular_segments {
        for i in 1..=radial_segments {
            let a = row * (j - 1) + (i - 1);
            let b = row * j + (i - 1);
            let c = row * j + i;
            let d = row * (j - 1) + i;
            indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }

    MeshData::triangles(vertices, indices)
}

fn build_grid(size: f32, divisions: u32) -> MeshData {
    let divisions = divisions.max(1);
    let half = size * 0.5;
    let step = size / divisions as f32;

    let mut vertices = Vec::with_capacity(((divisions + 1) * 4) as usize);
    for i in 0..=divisions {
        let k = -half + i as f32 * step;
        vertices.push(Vertex::new(Vec3::new(-half, 0.0, k), Vec3::Y, [0.0, 0.0]));
        vertices.push(Vertex::new(Vec3::new(half, 0.0, k), Vec3::Y, [1.0, 0.0]));
        vertices.push(Vertex::new(Vec3::new(k, 0.0, -half), Vec3::Y, [0.0, 0.0]));
        vertices.push(Vertex::new(Vec3::new(k, 0.0, half), Vec3::Y, [0.0, 1.0]));
    }
    let indices = (0..vertices.len() as u32).collect();

    MeshData::lines(vertices, indices)
}

fn build_axis_line(axis: Axis, length: f32) -> MeshData {
    let end = axis.unit() * length;
    let vertices = vec![
        Vertex::new(Vec3::ZERO, axis.unit(), [0.0, 0.0]),
        Vertex::new(end, axis.unit(), [1.0, 0.0]),
    ];
    MeshData::lines(vertices, vec![0, 1])
}

fn build_wire_sphere(radius: f32, segments: u32) -> MeshData {
    let segments = segments.max(3);
    let mut vertices = Vec::new();
    let mut indices = Vec::new();

    // Three great circles, one per principal plane
    for plane in 0..3 {
        let base = vertices.len() as u32;
        for s in 0..segments {
            let angle = s as f32 / segments as f32 * TAU;
            let (a, b) = (angle.cos() * radius, angle.sin() * radius);
            let position = match plane {
                0 => Vec3::new(a, b, 0.0),
                1 => Vec3::new(a, 0.0, b),
                _ => Vec3::new(0.0, a, b),
            };
            vertices.push(Vertex::new(position, position.normalize_or_zero(), [0.0, 0.0]));
            indices.extend_from_slice(&[base + s, base + (s + 1) % segments]);
        }
    }

    MeshData::lines(vertices, indices)
}
