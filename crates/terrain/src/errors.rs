use thiserror::Error;

use crate::mesh::IndexFormat;

/// Reasons a genome can be rejected.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GenomeError {
    #[error("Genome must contain at least one value")]
    Empty,

    #[error("Genome value {value} at index {index} is outside [0, 1]")]
    OutOfRange { index: usize, value: f32 },

    #[error("Gene index {index} is out of bounds for a genome of {len}")]
    IndexOutOfBounds { index: usize, len: usize },
}

/// Reasons a caller-supplied grid can be rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("Grid of {width}x{height} needs {expected} samples, got {found}")]
    DimensionMismatch {
        width: usize,
        height: usize,
        expected: usize,
        found: usize,
    },

    #[error("Row {row} has {found} samples, expected {expected}")]
    RaggedRows {
        row: usize,
        expected: usize,
        found: usize,
    },
}

/// Reasons a mesh cannot be built from a grid.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MeshError {
    #[error("Cannot build mesh at this resolution: {vertices} vertices exceed the {limit} addressable by {format:?} indices")]
    CapacityExceeded {
        vertices: u64,
        limit: u64,
        format: IndexFormat,
    },

    #[error("Cannot build mesh from an empty grid")]
    EmptyGrid,
}
