//! Stateful owner of the current elevation grid.

use std::sync::Arc;

use rand::Rng;

use crate::errors::MeshError;
use crate::genome::Genome;
use crate::grid::ElevationGrid;
use crate::mesh::{MeshBuffers, MeshBuilder};
use crate::resample;

/// Holds one elevation grid and replaces it on every resample.
///
/// The grid lives behind an [`Arc`] so a finished grid can be handed to a
/// reader on another thread with [`HeightMap::snapshot`] while this map moves
/// on to the next one.
#[derive(Debug, Clone, Default)]
pub struct HeightMap {
    grid: Arc<ElevationGrid>,
}

impl HeightMap {
    /// Starts from the 2×2 zero base grid.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the current grid with `grid` as given, without normalizing it.
    pub fn set_map(&mut self, grid: ElevationGrid) {
        self.grid = Arc::new(grid);
    }

    /// Returns to the 2×2 zero base grid.
    pub fn reset(&mut self) {
        self.set_map(ElevationGrid::base());
    }

    pub fn grid(&self) -> &ElevationGrid {
        &self.grid
    }

    /// Shared handle to the current, fully built grid.
    pub fn snapshot(&self) -> Arc<ElevationGrid> {
        Arc::clone(&self.grid)
    }

    pub fn width(&self) -> usize {
        self.grid.width()
    }

    pub fn height(&self) -> usize {
        self.grid.height()
    }

    pub fn variance(&self) -> f32 {
        self.grid.variance()
    }

    /// Upsamples the grid. Returns `false`, leaving the grid untouched, when
    /// there is no grid data to upsample.
    pub fn upsample<R: Rng + ?Sized>(&mut self, genome: &Genome, rng: &mut R) -> bool {
        match resample::upsample(&self.grid, genome, rng) {
            Some(grid) => {
                self.grid = Arc::new(grid);
                true
            }
            None => false,
        }
    }

    /// Downsamples the grid. Returns `false`, leaving the grid untouched, when
    /// either side is even.
    pub fn downsample(&mut self) -> bool {
        match resample::downsample(&self.grid) {
            Some(grid) => {
                self.grid = Arc::new(grid);
                true
            }
            None => false,
        }
    }

    /// Dimensions the next upsample would produce.
    pub fn next_dims(&self) -> (usize, usize) {
        resample::upsampled_dims(self.width(), self.height())
    }

    pub fn build_mesh(&self, builder: &MeshBuilder) -> Result<MeshBuffers, MeshError> {
        builder.build(&self.grid)
    }
}
