//! Per-octave noise control values.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::errors::GenomeError;

/// Number of values in a standard genome.
pub const GENOME_LEN: usize = 7;

/// Value every gene takes in the default genome.
pub const DEFAULT_GENE: f32 = 0.6;

/// Ordered noise amplitude controls, each in `[0, 1]`.
///
/// Indexed by octave level modulo its own length, so any non-empty genome
/// works for any grid size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f32>", into = "Vec<f32>")]
pub struct Genome(Vec<f32>);

impl Genome {
    /// Creates a genome, rejecting empty input and values outside `[0, 1]`.
    pub fn new(values: Vec<f32>) -> Result<Self, GenomeError> {
        if values.is_empty() {
            return Err(GenomeError::Empty);
        }
        if let Some((index, &value)) = values
            .iter()
            .enumerate()
            .find(|(_, v)| !(0.0..=1.0).contains(*v))
        {
            return Err(GenomeError::OutOfRange { index, value });
        }
        Ok(Self(values))
    }

    /// A genome that injects no noise at any octave.
    pub fn flat() -> Self {
        Self(vec![0.0; GENOME_LEN])
    }

    /// Draws a standard-length genome in hundredths, from 0.01 to 1.0.
    pub fn random(rng: &mut impl Rng) -> Self {
        let values = (0..GENOME_LEN)
            .map(|_| (100 - rng.gen_range(0..100)) as f32 / 100.0)
            .collect();
        Self(values)
    }

    /// Returns a copy with the gene at `index` replaced.
    pub fn with_gene(&self, index: usize, value: f32) -> Result<Self, GenomeError> {
        if index >= self.0.len() {
            return Err(GenomeError::IndexOutOfBounds {
                index,
                len: self.0.len(),
            });
        }
        let mut values = self.0.clone();
        values[index] = value;
        Self::new(values)
    }

    pub fn values(&self) -> &[f32] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Gene that controls the given octave level.
    pub fn gene(&self, level: i32) -> f32 {
        let index = level.rem_euclid(self.0.len() as i32) as usize;
        self.0[index]
    }

    /// Noise amplitude for the given octave level: `tan(1.2 * gene)`.
    pub fn amplitude(&self, level: i32) -> f32 {
        (1.2 * self.gene(level)).tan()
    }
}

impl Default for Genome {
    fn default() -> Self {
        Self(vec![DEFAULT_GENE; GENOME_LEN])
    }
}

impl TryFrom<Vec<f32>> for Genome {
    type Error = GenomeError;

    fn try_from(values: Vec<f32>) -> Result<Self, Self::Error> {
        Self::new(values)
    }
}

impl From<Genome> for Vec<f32> {
    fn from(genome: Genome) -> Self {
        genome.0
    }
}
