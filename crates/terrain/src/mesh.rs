//! Triangle mesh construction from an elevation grid.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::MeshError;
use crate::grid::ElevationGrid;

/// Index width supported by the consuming renderer.
///
/// Indices are always stored as `u32`; the format only bounds how many
/// vertices a mesh may address.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexFormat {
    #[default]
    U16,
    U32,
}

impl IndexFormat {
    /// Largest vertex count this format can address.
    pub const fn max_vertices(self) -> u64 {
        match self {
            IndexFormat::U16 => 1 << 16,
            IndexFormat::U32 => 1 << 32,
        }
    }
}

/// A render-ready vertex.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub uv: Vec2,
}

/// Vertex and index buffers for one grid snapshot.
///
/// Indices come in triples, two triangles per grid cell.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshBuffers {
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
}

impl MeshBuffers {
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Iterates triangles as vertex index triples.
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }
}

/// Builds meshes spanning `world_size` along the grid's longer side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshBuilder {
    world_size: f32,
    index_format: IndexFormat,
}

impl MeshBuilder {
    /// Creates a builder for 16-bit index buffers.
    pub fn new(world_size: f32) -> Self {
        Self {
            world_size,
            index_format: IndexFormat::default(),
        }
    }

    pub fn with_index_format(mut self, format: IndexFormat) -> Self {
        self.index_format = format;
        self
    }

    pub fn world_size(&self) -> f32 {
        self.world_size
    }

    pub fn index_format(&self) -> IndexFormat {
        self.index_format
    }

    /// Checks whether a `width × height` grid can be meshed without building it.
    pub fn check_capacity(&self, width: usize, height: usize) -> Result<(), MeshError> {
        let vertices = width as u64 * height as u64;
        if vertices == 0 {
            return Err(MeshError::EmptyGrid);
        }
        let limit = self.index_format.max_vertices();
        if vertices > limit {
            return Err(MeshError::CapacityExceeded {
                vertices,
                limit,
                format: self.index_format,
            });
        }
        Ok(())
    }

    /// True when a `width × height` grid fits the index format.
    pub fn fits(&self, width: usize, height: usize) -> bool {
        self.check_capacity(width, height).is_ok()
    }

    /// Builds vertex and index buffers for `grid`.
    ///
    /// Vertex `y * width + x` sits at `(x, h, y) * scale` where
    /// `scale = world_size / (max(width, height) - 1)`. Each cell at vertex
    /// `v` emits triangles `(v, v+1, v+w)` and `(v+w, v+1, v+w+1)`. Normals are
    /// the normalized, unweighted sum of adjacent face normals.
    pub fn build(&self, grid: &ElevationGrid) -> Result<MeshBuffers, MeshError> {
        let (width, height) = (grid.width(), grid.height());
        self.check_capacity(width, height)?;

        let span = width.max(height).saturating_sub(1).max(1);
        let scale = self.world_size / span as f32;

        let mut vertices = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                vertices.push(Vertex {
                    position: Vec3::new(x as f32, grid.get(x, y), y as f32) * scale,
                    normal: Vec3::ZERO,
                    uv: Vec2::new(x as f32 / width as f32, y as f32 / height as f32),
                });
            }
        }

        let cells = width.saturating_sub(1) * height.saturating_sub(1);
        let mut indices = Vec::with_capacity(cells * 6);
        let row = width as u32;
        for y in 0..height.saturating_sub(1) {
            for x in 0..width.saturating_sub(1) {
                let v = (y * width + x) as u32;
                indices.extend_from_slice(&[v, v + 1, v + row, v + row, v + 1, v + row + 1]);
            }
        }

        accumulate_normals(&mut vertices, &indices);

        debug!(
            width,
            height,
            vertices = vertices.len(),
            indices = indices.len(),
            "Built mesh"
        );
        Ok(MeshBuffers { vertices, indices })
    }
}

/// Face normal is `normalize((p1 - p2) × (p0 - p1))`, summed into each corner.
fn accumulate_normals(vertices: &mut [Vertex], indices: &[u32]) {
    for tri in indices.chunks_exact(3) {
        let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
        let edge0 = vertices[a].position - vertices[b].position;
        let edge1 = vertices[b].position - vertices[c].position;
        let face = edge1.cross(edge0).normalize_or_zero();

        vertices[a].normal += face;
        vertices[b].normal += face;
        vertices[c].normal += face;
    }

    for vertex in vertices.iter_mut() {
        vertex.normal = vertex.normal.normalize_or_zero();
    }
}
