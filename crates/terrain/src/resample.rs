//! Fractal upsampling and smoothing downsampling.
//!
//! Both operations read a source grid and return a brand new, normalized grid.
//! Nothing here mutates its input.

use rand::Rng;
use tracing::debug;

use crate::genome::Genome;
use crate::grid::ElevationGrid;
use crate::mask::{Mask, SHARPEN, SMOOTH};

/// Samples within this distance of a border fall back to plain averaging.
const BORDER: usize = 2;

/// Octave level for a grid of the given size: `floor(log2(min side)) - 1`.
///
/// Counts right shifts of the shorter side until it reaches zero, minus two.
pub fn octave_level(width: usize, height: usize) -> i32 {
    let mut level = -2;
    let mut size = width.min(height);
    while size > 0 {
        level += 1;
        size >>= 1;
    }
    level
}

/// Dimensions an upsample of a `width × height` grid produces.
pub fn upsampled_dims(width: usize, height: usize) -> (usize, usize) {
    ((2 * width).saturating_sub(1), (2 * height).saturating_sub(1))
}

/// Dimensions a downsample of a `width × height` grid produces, if it is
/// allowed. Both sides must be odd.
pub fn downsampled_dims(width: usize, height: usize) -> Option<(usize, usize)> {
    if width == 0 || height == 0 || (width + 1) % 2 != 0 || (height + 1) % 2 != 0 {
        return None;
    }
    Some(((width + 1) / 2, (height + 1) / 2))
}

/// Doubles the resolution of `grid`, interpolating new samples with the
/// sharpening mask and injecting noise scaled by the genome.
///
/// Every output sample is doubled and then receives `amplitude * u` with `u`
/// drawn uniformly from `[0, 1)`, one draw per sample in row-major order.
/// Returns `None` for an empty grid.
pub fn upsample<R: Rng + ?Sized>(
    grid: &ElevationGrid,
    genome: &Genome,
    rng: &mut R,
) -> Option<ElevationGrid> {
    if grid.is_empty() {
        return None;
    }

    let (width, height) = upsampled_dims(grid.width(), grid.height());
    let level = octave_level(width, height);
    let amplitude = genome.amplitude(level);

    let mask = &*SHARPEN;
    let mask_2d = mask.outer();

    let mut values = Vec::with_capacity(width * height);
    for y in 0..height {
        for x in 0..width {
            let sample = match (x % 2 == 0, y % 2 == 0) {
                (true, true) => grid.get(x / 2, y / 2),
                (true, false) => along_column(grid, mask, x / 2, y, height),
                (false, true) => along_row(grid, mask, x, y / 2, width),
                (false, false) => diagonal(grid, &mask_2d, x, y, width, height),
            };
            values.push(sample * 2.0 + amplitude * rng.r#gen::<f32>());
        }
    }

    let upsampled = ElevationGrid::from_raw(width, height, values).normalized();
    debug!(
        width,
        height,
        level,
        amplitude,
        variance = upsampled.variance(),
        "Upsampled grid"
    );
    Some(upsampled)
}

/// Halves the resolution of `grid` with the smoothing mask.
///
/// Each output sample is half the mask-weighted sum of the 3×3 neighborhood
/// around `(2x, 2y)`. Neighbors outside the grid contribute nothing and the
/// mask is not renormalized for them. Returns `None` when either side of the
/// grid is even or the grid is empty.
pub fn downsample(grid: &ElevationGrid) -> Option<ElevationGrid> {
    let (width, height) = downsampled_dims(grid.width(), grid.height())?;

    let mask_2d = SMOOTH.outer();
    let half = SMOOTH.len() / 2;

    let mut values = Vec::with_capacity(width * height);
    for y in 0..height {
        for x in 0..width {
            let mut sum = 0.0;
            for (my, row) in mask_2d.iter().enumerate() {
                let Some(sy) = (2 * y + my).checked_sub(half).filter(|&sy| sy < grid.height())
                else {
                    continue;
                };
                for (mx, weight) in row.iter().enumerate() {
                    let Some(sx) = (2 * x + mx).checked_sub(half).filter(|&sx| sx < grid.width())
                    else {
                        continue;
                    };
                    sum += 0.5 * grid.get(sx, sy) * weight;
                }
            }
            values.push(sum);
        }
    }

    let downsampled = ElevationGrid::from_raw(width, height, values).normalized();
    debug!(
        width,
        height,
        variance = downsampled.variance(),
        "Downsampled grid"
    );
    Some(downsampled)
}

/// True when every sharpening tap around odd coordinate `c` lies inside a
/// side of `len` output samples.
#[inline]
fn is_interior(c: usize, len: usize) -> bool {
    c >= BORDER && c + BORDER < len
}

/// Source index of sharpening tap `i` for odd output coordinate `c`.
#[inline]
fn tap(c: usize, i: usize) -> usize {
    (c + 2 * i + 1 - SHARPEN_TAPS) / 2
}

const SHARPEN_TAPS: usize = 4;

/// Even column `sx`, odd output row `y`.
fn along_column(
    grid: &ElevationGrid,
    mask: &Mask<SHARPEN_TAPS>,
    sx: usize,
    y: usize,
    height: usize,
) -> f32 {
    if is_interior(y, height) {
        mask.taps()
            .iter()
            .enumerate()
            .map(|(i, w)| grid.get(sx, tap(y, i)) * w)
            .sum()
    } else {
        0.5 * (grid.get(sx, (y - 1) / 2) + grid.get(sx, (y + 1) / 2))
    }
}

/// Odd output column `x`, even row `sy`.
fn along_row(
    grid: &ElevationGrid,
    mask: &Mask<SHARPEN_TAPS>,
    x: usize,
    sy: usize,
    width: usize,
) -> f32 {
    if is_interior(x, width) {
        mask.taps()
            .iter()
            .enumerate()
            .map(|(i, w)| grid.get(tap(x, i), sy) * w)
            .sum()
    } else {
        0.5 * (grid.get((x - 1) / 2, sy) + grid.get((x + 1) / 2, sy))
    }
}

/// Odd output column and odd output row.
fn diagonal(
    grid: &ElevationGrid,
    mask_2d: &[[f32; SHARPEN_TAPS]; SHARPEN_TAPS],
    x: usize,
    y: usize,
    width: usize,
    height: usize,
) -> f32 {
    if is_interior(x, width) && is_interior(y, height) {
        let mut sum = 0.0;
        for (my, row) in mask_2d.iter().enumerate() {
            for (mx, weight) in row.iter().enumerate() {
                sum += grid.get(tap(x, mx), tap(y, my)) * weight;
            }
        }
        sum
    } else {
        0.25 * (grid.get((x - 1) / 2, (y - 1) / 2)
            + grid.get((x + 1) / 2, (y - 1) / 2)
            + grid.get((x - 1) / 2, (y + 1) / 2)
            + grid.get((x + 1) / 2, (y + 1) / 2))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn ramp(width: usize, height: usize) -> ElevationGrid {
        let values = (0..width * height).map(|i| i as f32).collect();
        ElevationGrid::from_values(width, height, values).unwrap()
    }

    #[test]
    fn test_octave_level() {
        assert_eq!(octave_level(3, 3), 0);
        assert_eq!(octave_level(5, 5), 1);
        assert_eq!(octave_level(9, 17), 2);
        assert_eq!(octave_level(1025, 1025), 9);
        assert_eq!(octave_level(1, 9), -1);
    }

    #[test]
    fn test_downsampled_dims() {
        assert_eq!(downsampled_dims(5, 9), Some((3, 5)));
        assert_eq!(downsampled_dims(4, 5), None);
        assert_eq!(downsampled_dims(5, 2), None);
        assert_eq!(downsampled_dims(0, 0), None);
    }

    #[test]
    fn test_upsample_base_grid_is_three_by_three() {
        let mut rng = StdRng::seed_from_u64(1);
        let grid = upsample(&ElevationGrid::base(), &Genome::default(), &mut rng).unwrap();
        assert_eq!((grid.width(), grid.height()), (3, 3));
        assert!(grid.mean().abs() < 1e-5);
    }

    #[test]
    fn test_upsample_empty_is_none() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(upsample(&ElevationGrid::zeros(0, 0), &Genome::default(), &mut rng).is_none());
    }

    #[test]
    fn test_upsample_flat_genome_is_noise_free() {
        let mut rng = StdRng::seed_from_u64(1);
        let grid = upsample(&ElevationGrid::base(), &Genome::flat(), &mut rng).unwrap();
        assert!(grid.values().iter().all(|&v| v == 0.0));
        assert_eq!(grid.variance(), 0.0);
    }

    #[test]
    fn test_upsample_linear_ramp_is_reproduced() {
        // Sharpening taps reproduce linear data, so doubling a ramp and removing
        // the mean gives a ramp with half the step.
        let mut rng = StdRng::seed_from_u64(3);
        let source = ramp(5, 5);
        let grid = upsample(&source, &Genome::flat(), &mut rng).unwrap();
        assert_eq!((grid.width(), grid.height()), (9, 9));
        for y in 0..9 {
            for x in 1..9 {
                let step = grid.get(x, y) - grid.get(x - 1, y);
                assert!((step - 1.0).abs() < 1e-4, "step {step} at ({x}, {y})");
            }
        }
    }

    #[test]
    fn test_upsample_interior_uses_sharpening() {
        // A single spike in a 4-wide row: the interior midpoint between
        // source columns 1 and 2 sees taps [-1, 9, 9, -1] / 16.
        let source = ElevationGrid::from_values(4, 1, vec![0.0, 16.0, 0.0, 0.0]).unwrap();
        let mut rng = StdRng::seed_from_u64(9);
        let grid = upsample(&source, &Genome::flat(), &mut rng).unwrap();
        assert_eq!((grid.width(), grid.height()), (7, 1));

        // x = 1 and x = 5 sit on the border and average their two neighbors.
        let doubled: [f32; 7] = [0.0, 16.0, 32.0, 18.0, 0.0, 0.0, 0.0];
        let mean = doubled.iter().sum::<f32>() / 7.0;
        let expected = doubled.map(|v| v - mean);
        for (x, want) in expected.iter().enumerate() {
            let got = grid.get(x, 0);
            assert!((got - want).abs() < 1e-4, "x={x}: {got} vs {want}");
        }
    }

    #[test]
    fn test_upsample_2d_sharpening_around_spike() {
        // 4×4 source with one spike at (1, 1) gives a 7×7 output whose only
        // interior odd coordinate is 3.
        let mut values = vec![0.0; 16];
        values[4 + 1] = 16.0;
        let source = ElevationGrid::from_values(4, 4, values).unwrap();
        let mut rng = StdRng::seed_from_u64(11);
        let grid = upsample(&source, &Genome::flat(), &mut rng).unwrap();
        assert_eq!((grid.width(), grid.height()), (7, 7));

        // (6, 6) copies a zero source sample, so it carries only the mean shift.
        let raw = |x: usize, y: usize| grid.get(x, y) - grid.get(6, 6);
        let cases: [((usize, usize), f32); 5] = [
            // Even x, interior odd y: taps [-1, 9, 9, -1] / 16 down column 1.
            ((2, 3), 2.0 * 16.0 * 9.0 / 16.0),
            // Interior odd/odd: outer-product weight 81/256 on the spike.
            ((3, 3), 2.0 * 16.0 * 81.0 / 256.0),
            // Border odd/odd: 4-point average of source (0..=1, 0..=1).
            ((1, 1), 2.0 * 16.0 / 4.0),
            // Even x, border odd y: 2-point average of rows 0 and 1.
            ((2, 1), 2.0 * 16.0 / 2.0),
            // Copied spike.
            ((2, 2), 2.0 * 16.0),
        ];
        for ((x, y), want) in cases {
            let got = raw(x, y);
            assert!((got - want).abs() < 1e-4, "({x}, {y}): {got} vs {want}");
        }
    }

    #[test]
    fn test_upsample_is_deterministic_for_seed() {
        let genome = Genome::default();
        let a = upsample(&ramp(3, 3), &genome, &mut StdRng::seed_from_u64(42)).unwrap();
        let b = upsample(&ramp(3, 3), &genome, &mut StdRng::seed_from_u64(42)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_downsample_halves_dimensions() {
        let grid = downsample(&ramp(5, 9)).unwrap();
        assert_eq!((grid.width(), grid.height()), (3, 5));
        assert!(grid.mean().abs() < 1e-5);
    }

    #[test]
    fn test_downsample_even_is_none() {
        assert!(downsample(&ramp(4, 5)).is_none());
        assert!(downsample(&ElevationGrid::base()).is_none());
    }

    #[test]
    fn test_downsample_clips_mask_at_border() {
        // A constant grid: interior cells see the full mask (sum 1), corners
        // only four of nine taps (sum 0.5625), edges six (sum 0.75).
        let source = ElevationGrid::from_values(5, 5, vec![4.0; 25]).unwrap();
        let grid = downsample(&source).unwrap();
        let raw_center = 0.5 * 4.0;
        let raw_corner = 0.5 * 4.0 * 0.5625;
        assert!((grid.get(1, 1) - grid.get(0, 0) - (raw_center - raw_corner)).abs() < 1e-5);
    }
}
