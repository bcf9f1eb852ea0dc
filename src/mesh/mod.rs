//! Grid triangulation for the terrain and water-plane meshes.
//!
//! Both meshes share one vertex layout and one winding: counter-clockwise
//! when seen from +Y, so face normals point up.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

use crate::terrain::{world_xz, TerrainField};

/// GPU-ready vertex. Layout matches a single `vec3<f32>` position attribute.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
}

impl Vertex {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { position: [x, y, z] }
    }

    pub fn pos(&self) -> Vec3 {
        Vec3::from_array(self.position)
    }
}

/// Number of indices [`build_indices`] emits for a `width x length` grid.
pub fn index_count(width: u32, length: u32) -> u64 {
    if width < 2 || length < 2 {
        return 0;
    }
    6 * (width as u64 - 1) * (length as u64 - 1)
}

/// True when every vertex of a `width x length` grid has a `u32` index.
pub fn fits_u32_indices(width: u32, length: u32) -> bool {
    width as u64 * length as u64 <= u32::MAX as u64 + 1
}

/// Index buffer covering a `width x length` vertex grid with two triangles
/// per cell.
///
/// For cell `(x, z)` with `tl = z*width + x`, `tr = tl + 1`,
/// `bl = tl + width`, `br = bl + 1`, emits `[tl, bl, tr, tr, bl, br]`. Both
/// triangles share the `bl`–`tr` diagonal. Grids narrower than 2 in either
/// direction, or with more vertices than `u32` can address, produce no
/// indices.
pub fn build_indices(width: u32, length: u32) -> Vec<u32> {
    if width < 2 || length < 2 {
        return Vec::new();
    }
    if !fits_u32_indices(width, length) {
        tracing::warn!(width, length, "grid too large for u32 indices");
        return Vec::new();
    }

    let mut indices = Vec::with_capacity(index_count(width, length) as usize);
    for z in 0..length - 1 {
        for x in 0..width - 1 {
            let top_left = z * width + x;
            let top_right = top_left + 1;
            let bottom_left = (z + 1) * width + x;
            let bottom_right = bottom_left + 1;

            indices.extend_from_slice(&[top_left, bottom_left, top_right]);
            indices.extend_from_slice(&[top_right, bottom_left, bottom_right]);
        }
    }
    indices
}

/// An indexed triangle mesh over a regular grid.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub width: u32,
    pub length: u32,
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl Mesh {
    /// Builds the terrain mesh: one vertex per cell at `(worldX, height, worldZ)`.
    pub fn from_field(field: &TerrainField) -> Self {
        let (width, length) = (field.width, field.length);
        let vertices = (0..length)
            .flat_map(|z| (0..width).map(move |x| (x, z)))
            .map(|(x, z)| {
                let (wx, wz) = world_xz(x, z, width, length);
                Vertex::new(wx, field.get_height(x, z), wz)
            })
            .collect();

        Self {
            width,
            length,
            vertices,
            indices: build_indices(width, length),
        }
    }

    /// Sets every vertex height to `level`.
    pub fn set_level(&mut self, level: f32) {
        for vertex in &mut self.vertices {
            vertex.position[1] = level;
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Axis-aligned bounds `(min, max)` of all vertices.
    pub fn bounds(&self) -> (Vec3, Vec3) {
        self.vertices.iter().fold(
            (Vec3::splat(f32::MAX), Vec3::splat(f32::MIN)),
            |(min, max), v| (min.min(v.pos()), max.max(v.pos())),
        )
    }

    /// Unnormalized face normal of every triangle.
    pub fn face_normals(&self) -> Vec<Vec3> {
        self.indices
            .chunks_exact(3)
            .map(|tri| {
                let a = self.vertices[tri[0] as usize].pos();
                let b = self.vertices[tri[1] as usize].pos();
                let c = self.vertices[tri[2] as usize].pos();
                (b - a).cross(c - a)
            })
            .collect()
    }

    /// Vertex buffer bytes for upload.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Index buffer bytes for upload.
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}

/// A flat `width x length` water plane at `sea_level`, centered like the terrain.
pub fn generate_plane(width: u32, length: u32, sea_level: f32) -> Mesh {
    let vertices = (0..length)
        .flat_map(|z| (0..width).map(move |x| (x, z)))
        .map(|(x, z)| {
            let (wx, wz) = world_xz(x, z, width, length);
            Vertex::new(wx, sea_level, wz)
        })
        .collect();

    Mesh {
        width,
        length,
        vertices,
        indices: build_indices(width, length),
    }
}
