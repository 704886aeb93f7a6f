//! Generation driver for the terrain core.
//!
//! Wraps a [`terrain::HeightMap`] with its configuration, mesh and random
//! source, and exposes the settings and actions a front end sends.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use terrain_driver::prelude::*;
//!
//! let config = TerrainConfig::from_env()?;
//! let mut session = TerrainSession::new(config)?;
//! session.generate()?;
//! session.perform(Action::UpSample)?;
//! let stats = session.stats();
//! ```

pub mod config;
pub mod errors;
pub mod session;
pub mod settings;
pub mod stats;

pub use errors::DriverError;

pub mod prelude {
    //! Convenient re-exports for common usage.

    pub use crate::config::TerrainConfig;
    pub use crate::errors::DriverError;
    pub use crate::session::TerrainSession;
    pub use crate::settings::{Action, Setting};
    pub use crate::stats::TerrainStats;
    pub use terrain::{ElevationGrid, Genome, IndexFormat, MeshBuffers};
}
