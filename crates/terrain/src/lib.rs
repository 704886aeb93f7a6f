//! Fractal terrain synthesis.
//!
//! This crate grows an elevation grid by repeated fractal upsampling from a
//! 2×2 base and turns the result into render-ready mesh buffers.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use terrain::prelude::*;
//! use rand::{SeedableRng, rngs::StdRng};
//!
//! let mut rng = StdRng::seed_from_u64(12345);
//! let genome = Genome::default();
//! let mut map = HeightMap::new();
//! for _ in 0..6 {
//!     map.upsample(&genome, &mut rng);
//! }
//! let mesh = map.build_mesh(&MeshBuilder::new(50.0))?;
//! ```

pub mod errors;
pub mod genome;
pub mod grid;
pub mod heightmap;
pub mod mask;
pub mod mesh;
pub mod resample;

pub use errors::{GenomeError, GridError, MeshError};
pub use genome::Genome;
pub use grid::ElevationGrid;
pub use heightmap::HeightMap;
pub use mesh::{IndexFormat, MeshBuffers, MeshBuilder, Vertex};

pub mod prelude {
    //! Convenient re-exports for common usage.

    pub use crate::errors::{GenomeError, GridError, MeshError};
    pub use crate::genome::{GENOME_LEN, Genome};
    pub use crate::grid::ElevationGrid;
    pub use crate::heightmap::HeightMap;
    pub use crate::mesh::{IndexFormat, MeshBuffers, MeshBuilder, Vertex};
    pub use crate::resample::{downsample, octave_level, upsample};
}
