//! Display statistics for the current terrain.

use serde::Serialize;
use terrain::resample::octave_level;
use terrain::{HeightMap, MeshBuffers};

/// Figures a settings panel shows next to the terrain.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TerrainStats {
    pub width: usize,
    pub height: usize,
    pub vertices: usize,
    pub triangles: usize,
    /// Grid variance scaled by the squared world size, truncated to hundredths.
    pub variance: f32,
    /// Octave level the next upsample would use.
    pub detail_level: i32,
    /// Dimensions the next upsample would produce.
    pub next_width: usize,
    pub next_height: usize,
}

impl TerrainStats {
    pub fn collect(map: &HeightMap, mesh: &MeshBuffers, world_size: f32) -> Self {
        let (next_width, next_height) = map.next_dims();
        Self {
            width: map.width(),
            height: map.height(),
            vertices: mesh.vertex_count(),
            triangles: mesh.triangle_count(),
            variance: display_variance(map.variance(), world_size),
            detail_level: octave_level(next_width, next_height),
            next_width,
            next_height,
        }
    }
}

fn display_variance(variance: f32, world_size: f32) -> f32 {
    (variance * world_size * world_size * 100.0).trunc() / 100.0
}
