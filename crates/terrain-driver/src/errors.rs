use terrain::{GenomeError, MeshError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DriverError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parsing error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid setting: {0}")]
    InvalidSetting(String),

    #[error("Invalid genome: {0}")]
    Genome(#[from] GenomeError),

    #[error("Mesh error: {0}")]
    Mesh(#[from] MeshError),
}
