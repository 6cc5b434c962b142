use crate::sample::Sample;
use crate::volume::Volume;

use ndarray::ArrayView2;
use rayon::prelude::*;
use tracing::debug;

/// Ranges narrower than this are treated as flat.
pub const MIN_RANGE: f64 = 1e-8;

fn empty_bounds() -> (f64, f64) {
    (f64::INFINITY, f64::NEG_INFINITY)
}

// NaN and infinities (e.g. padding in float stacks) never widen the bounds.
#[inline]
fn include((min, max): (f64, f64), value: f64) -> (f64, f64) {
    if value.is_finite() {
        (min.min(value), max.max(value))
    } else {
        (min, max)
    }
}

/// Intensity bounds shared by every slice rendered from one volume.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntensityStats {
    pub min: f64,
    pub max: f64,
}

impl Default for IntensityStats {
    fn default() -> Self {
        Self { min: 0.0, max: 1.0 }
    }
}

impl IntensityStats {
    /// Exact minimum and maximum of the finite samples of the whole volume
    pub fn compute<T: Sample>(volume: &Volume<T>) -> Self {
        let (min, max) = volume
            .data()
            .par_iter()
            .fold(empty_bounds, |bounds, &value| include(bounds, value.to_f64()))
            .reduce(empty_bounds, |(min_a, max_a), (min_b, max_b)| {
                (min_a.min(min_b), max_a.max(max_b))
            });
        let stats = Self::from_bounds(min, max);
        debug!(min = stats.min, max = stats.max, dim = ?volume.dim(), "computed volume stats");
        stats
    }

    /// Like [`IntensityStats::compute`], falling back to `(0.0, 1.0)` when no
    /// volume is loaded yet
    pub fn compute_or_default<T: Sample>(volume: Option<&Volume<T>>) -> Self {
        volume.map_or_else(Self::default, Self::compute)
    }

    /// Bounds of a single 2D slice
    pub fn of_slice<T: Sample>(slice: &ArrayView2<'_, T>) -> Self {
        let (min, max) = slice
            .iter()
            .fold(empty_bounds(), |bounds, &value| include(bounds, value.to_f64()));
        Self::from_bounds(min, max)
    }

    // Input without finite samples leaves the fold at its identity; report a
    // flat zero range.
    fn from_bounds(min: f64, max: f64) -> Self {
        if min > max {
            return Self { min: 0.0, max: 0.0 };
        }
        Self { min, max }
    }

    /// Width of the value range, `1.0` when the range is (nearly) flat
    #[inline]
    pub fn range(&self) -> f64 {
        let range = self.max - self.min;
        if range < MIN_RANGE { 1.0 } else { range }
    }

    /// Map `value` linearly into `0..=255`, clipping anything outside the bounds
    #[inline]
    pub fn normalize(&self, value: f64) -> u8 {
        let scaled = (value - self.min) / self.range() * 255.0;
        // `as` saturates and maps NaN to 0
        scaled.clamp(0.0, 255.0) as u8
    }
}
