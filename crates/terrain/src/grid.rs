//! Elevation grid storage and statistical normalization.

use serde::Serialize;

use crate::errors::GridError;

/// A rectangular field of height samples stored row-major (`y * width + x`).
///
/// Grids are never edited after construction. Resampling produces a new grid
/// which replaces the old one wholesale, so a grid handed to another thread is
/// always complete.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElevationGrid {
    width: usize,
    height: usize,
    values: Vec<f32>,
    /// Population variance divided once more by the sample count.
    variance: f32,
}

impl ElevationGrid {
    /// Creates a grid of the given size with every sample at zero.
    pub fn zeros(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            values: vec![0.0; width * height],
            variance: 0.0,
        }
    }

    /// The canonical 2×2 starting grid for generation.
    pub fn base() -> Self {
        Self::zeros(2, 2)
    }

    /// Creates a grid from row-major samples.
    ///
    /// The samples are taken as given: no normalization is applied and the
    /// variance is left at zero until the grid is resampled.
    pub fn from_values(width: usize, height: usize, values: Vec<f32>) -> Result<Self, GridError> {
        let expected = width * height;
        if values.len() != expected {
            return Err(GridError::DimensionMismatch {
                width,
                height,
                expected,
                found: values.len(),
            });
        }
        Ok(Self {
            width,
            height,
            values,
            variance: 0.0,
        })
    }

    /// Creates a grid from a list of rows, `rows[y][x]`.
    pub fn from_rows(rows: &[Vec<f32>]) -> Result<Self, GridError> {
        let width = rows.first().map_or(0, Vec::len);
        let mut values = Vec::with_capacity(width * rows.len());
        for (row, samples) in rows.iter().enumerate() {
            if samples.len() != width {
                return Err(GridError::RaggedRows {
                    row,
                    expected: width,
                    found: samples.len(),
                });
            }
            values.extend_from_slice(samples);
        }
        Self::from_values(width, rows.len(), values)
    }

    /// Internal constructor for resamplers that already sized the buffer.
    pub(crate) fn from_raw(width: usize, height: usize, values: Vec<f32>) -> Self {
        debug_assert_eq!(values.len(), width * height);
        Self {
            width,
            height,
            values,
            variance: 0.0,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when the grid holds no samples. Empty grids are never resampled.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Row-major samples.
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Sample at column `x`, row `y`.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` lies outside the grid.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> f32 {
        debug_assert!(x < self.width && y < self.height);
        self.values[y * self.width + x]
    }

    /// Variance recorded by the last normalization.
    ///
    /// This is the population variance divided by `width * height`, the scale
    /// the statistics display expects.
    pub fn variance(&self) -> f32 {
        self.variance
    }

    /// Arithmetic mean of all samples, or zero for an empty grid.
    pub fn mean(&self) -> f32 {
        if self.values.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.values.iter().map(|&v| f64::from(v)).sum();
        (sum / self.values.len() as f64) as f32
    }

    /// Shifts every sample so the mean is zero and records the variance.
    ///
    /// This is a pure translation: samples are never rescaled.
    pub fn normalized(mut self) -> Self {
        if self.values.is_empty() {
            self.variance = 0.0;
            return self;
        }

        let count = self.values.len() as f64;
        let (sum, sum_sq) = self
            .values
            .iter()
            .map(|&v| f64::from(v))
            .fold((0.0, 0.0), |(s, sq), v| (s + v, sq + v * v));
        let mean = sum / count;
        let mean_sq = sum_sq / count;

        // Clamp guards against tiny negative values from cancellation.
        self.variance = ((mean_sq - mean * mean).max(0.0) / count) as f32;

        let mean = mean as f32;
        for v in &mut self.values {
            *v -= mean;
        }
        self
    }
}

impl Default for ElevationGrid {
    fn default() -> Self {
        Self::base()
    }
}
