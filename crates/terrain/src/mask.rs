//! Interpolation and smoothing kernels.
//!
//! Both masks are normalized exactly once, on first use, and are never
//! modified afterwards.

use std::sync::LazyLock;

/// Sharpening kernel used when upsampling, normalized from `[-1, 9, 9, -1]`.
pub static SHARPEN: LazyLock<Mask<4>> = LazyLock::new(|| Mask::normalized([-1.0, 9.0, 9.0, -1.0]));

/// Smoothing kernel used when downsampling, normalized from `[1, 2, 1]`.
pub static SMOOTH: LazyLock<Mask<3>> = LazyLock::new(|| Mask::normalized([1.0, 2.0, 1.0]));

/// A 1D convolution kernel whose taps sum to one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mask<const N: usize> {
    taps: [f32; N],
}

impl<const N: usize> Mask<N> {
    /// Builds a mask by dividing the raw weights by their sum.
    pub fn normalized(raw: [f32; N]) -> Self {
        let sum: f32 = raw.iter().sum();
        Self {
            taps: raw.map(|t| t / sum),
        }
    }

    pub fn taps(&self) -> &[f32; N] {
        &self.taps
    }

    pub const fn len(&self) -> usize {
        N
    }

    pub const fn is_empty(&self) -> bool {
        N == 0
    }

    pub fn sum(&self) -> f32 {
        self.taps.iter().sum()
    }

    /// Separable 2D kernel, indexed `[y][x]`.
    pub fn outer(&self) -> [[f32; N]; N] {
        let mut out = [[0.0; N]; N];
        for (y, row) in out.iter_mut().enumerate() {
            for (x, cell) in row.iter_mut().enumerate() {
                *cell = self.taps[x] * self.taps[y];
            }
        }
        out
    }
}
