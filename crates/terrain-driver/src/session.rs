//! Generation session: the grid, its mesh, the settings and the random source.

use std::sync::Arc;

use rand::SeedableRng;
use rand::rngs::StdRng;
use terrain::{ElevationGrid, Genome, HeightMap, MeshBuffers, MeshBuilder};
use tracing::{debug, instrument, warn};

use crate::config::TerrainConfig;
use crate::errors::DriverError;
use crate::settings::{Action, Setting};
use crate::stats::TerrainStats;

/// Drives generation for one terrain.
///
/// The grid and its mesh are always replaced together once both are fully
/// built, so [`TerrainSession::snapshot`] and [`TerrainSession::mesh`] never
/// expose a half-finished update.
#[derive(Debug)]
pub struct TerrainSession {
    config: TerrainConfig,
    map: HeightMap,
    mesh: MeshBuffers,
    rng: StdRng,
}

impl TerrainSession {
    /// Creates a session holding the 2×2 base grid and its mesh.
    ///
    /// Call [`TerrainSession::generate`] to grow it to the configured depth.
    pub fn new(config: TerrainConfig) -> Result<Self, DriverError> {
        config.validate()?;
        let map = HeightMap::new();
        let mesh = map.build_mesh(&config.mesh_builder())?;
        let rng = seeded_rng(config.seed);
        Ok(Self {
            config,
            map,
            mesh,
            rng,
        })
    }

    pub fn config(&self) -> &TerrainConfig {
        &self.config
    }

    pub fn genome(&self) -> &Genome {
        &self.config.genome
    }

    pub fn height_map(&self) -> &HeightMap {
        &self.map
    }

    pub fn mesh(&self) -> &MeshBuffers {
        &self.mesh
    }

    /// Shared handle to the current grid.
    pub fn snapshot(&self) -> Arc<ElevationGrid> {
        self.map.snapshot()
    }

    pub fn mesh_builder(&self) -> MeshBuilder {
        self.config.mesh_builder()
    }

    /// Whether the mesh for the next upsample would fit the index format.
    pub fn can_upsample(&self) -> bool {
        let (width, height) = self.map.next_dims();
        self.mesh_builder().fits(width, height)
    }

    /// Regrows the terrain from the base grid, one upsample per level of
    /// detail. Stops early when the next level would not fit the index
    /// format. Returns the number of levels applied.
    #[instrument(level = "debug", skip(self), fields(lod = self.config.level_of_detail))]
    pub fn generate(&mut self) -> Result<u32, DriverError> {
        let builder = self.mesh_builder();
        let mut map = HeightMap::new();
        let mut applied = 0;

        for _ in 0..self.config.level_of_detail {
            let (width, height) = map.next_dims();
            if let Err(err) = builder.check_capacity(width, height) {
                warn!(%err, applied, "Stopping generation early");
                break;
            }
            if map.upsample(&self.config.genome, &mut self.rng) {
                applied += 1;
            }
        }

        let mesh = map.build_mesh(&builder)?;
        self.commit(map, mesh);
        debug!(applied, width = self.map.width(), "Generated terrain");
        Ok(applied)
    }

    /// Adds one level of detail. Returns `false` when the mesh would not fit
    /// or the grid could not be upsampled.
    #[instrument(level = "debug", skip(self))]
    pub fn upsample(&mut self) -> Result<bool, DriverError> {
        if !self.can_upsample() {
            let (width, height) = self.map.next_dims();
            warn!(width, height, "Upsample refused, mesh would exceed index range");
            return Ok(false);
        }

        let mut map = self.map.clone();
        if !map.upsample(&self.config.genome, &mut self.rng) {
            return Ok(false);
        }
        let mesh = map.build_mesh(&self.mesh_builder())?;
        self.commit(map, mesh);
        Ok(true)
    }

    /// Removes one level of detail. Returns `false` when either side of the
    /// grid is even.
    #[instrument(level = "debug", skip(self))]
    pub fn downsample(&mut self) -> Result<bool, DriverError> {
        let mut map = self.map.clone();
        if !map.downsample() {
            debug!(
                width = map.width(),
                height = map.height(),
                "Downsample skipped"
            );
            return Ok(false);
        }
        let mesh = map.build_mesh(&self.mesh_builder())?;
        self.commit(map, mesh);
        Ok(true)
    }

    /// Restarts the random source from `seed`, the configured seed, or
    /// entropy, in that order of preference.
    pub fn reseed(&mut self, seed: Option<u64>) {
        self.rng = seeded_rng(seed.or(self.config.seed));
    }

    /// Replaces the genome with one drawn from the session's random source.
    pub fn randomize_genome(&mut self) -> &Genome {
        self.config.genome = Genome::random(&mut self.rng);
        &self.config.genome
    }

    /// Applies a setting. Settings that change the mesh layout rebuild the
    /// current mesh; a new seed restarts the random source.
    pub fn apply(&mut self, setting: Setting) -> Result<(), DriverError> {
        let mut config = self.config.clone();
        config.apply(setting)?;

        if let Setting::WorldSize(_) = setting {
            self.mesh = self.map.build_mesh(&config.mesh_builder())?;
        }
        self.config = config;

        if let Setting::Seed(seed) = setting {
            self.reseed(Some(seed));
        }
        Ok(())
    }

    /// Performs an action.
    pub fn perform(&mut self, action: Action) -> Result<(), DriverError> {
        debug!(?action, "Performing action");
        match action {
            Action::Generate => {
                self.generate()?;
            }
            Action::UpSample => {
                self.upsample()?;
            }
            Action::DownSample => {
                self.downsample()?;
            }
            Action::Reseed => self.reseed(None),
            Action::RandomizeGenome => {
                self.randomize_genome();
            }
        }
        Ok(())
    }

    pub fn stats(&self) -> TerrainStats {
        TerrainStats::collect(&self.map, &self.mesh, self.config.world_size)
    }

    fn commit(&mut self, map: HeightMap, mesh: MeshBuffers) {
        self.map = map;
        self.mesh = mesh;
    }
}

fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}
