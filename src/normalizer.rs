use crate::enums::{Axis, Normalization};
use crate::sample::Sample;
use crate::stats::IntensityStats;
use crate::volume::Volume;

use ndarray::Array2;

/// One value per viewing axis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AxisSlices<T> {
    pub z: T,
    pub y: T,
    pub x: T,
}

impl<T> AxisSlices<T> {
    pub fn get(&self, axis: Axis) -> &T {
        match axis {
            Axis::Z => &self.z,
            Axis::Y => &self.y,
            Axis::X => &self.x,
        }
    }

    pub fn map<U>(self, mut f: impl FnMut(Axis, T) -> U) -> AxisSlices<U> {
        AxisSlices {
            z: f(Axis::Z, self.z),
            y: f(Axis::Y, self.y),
            x: f(Axis::X, self.x),
        }
    }

    pub fn try_map<U, E>(
        self,
        mut f: impl FnMut(Axis, T) -> Result<U, E>,
    ) -> Result<AxisSlices<U>, E> {
        Ok(AxisSlices {
            z: f(Axis::Z, self.z)?,
            y: f(Axis::Y, self.y)?,
            x: f(Axis::X, self.x)?,
        })
    }
}

pub struct SliceNormalizer;

impl SliceNormalizer {
    /// Cut the slice at `index` along `axis` and scale it to 8 bits.
    ///
    /// `index` is clamped to the volume. With `stats` the slice is scaled
    /// against those bounds, otherwise against its own min and max.
    pub fn extract<T: Sample>(
        volume: &Volume<T>,
        axis: Axis,
        index: usize,
        stats: Option<&IntensityStats>,
    ) -> Array2<u8> {
        let slice = volume.get_slice_from_axis(index, axis);
        let stats = match stats {
            Some(stats) => *stats,
            None => IntensityStats::of_slice(&slice),
        };
        slice.mapv(|value| stats.normalize(value.to_f64()))
    }

    /// [`SliceNormalizer::extract`] with the mode chosen by `normalization`
    pub fn extract_with<T: Sample>(
        volume: &Volume<T>,
        axis: Axis,
        index: usize,
        normalization: Normalization,
        global: &IntensityStats,
    ) -> Array2<u8> {
        match normalization {
            Normalization::Global => Self::extract(volume, axis, index, Some(global)),
            Normalization::Local => Self::extract(volume, axis, index, None),
        }
    }

    /// Slices through all three axes at one shared relative position
    pub fn extract_all_axes<T: Sample>(
        volume: &Volume<T>,
        position: f64,
        stats: Option<&IntensityStats>,
    ) -> AxisSlices<Array2<u8>> {
        Self::extract_all_axes_absolute(
            volume,
            volume.index_at_position(Axis::Z, position),
            volume.index_at_position(Axis::Y, position),
            volume.index_at_position(Axis::X, position),
            stats,
        )
    }

    /// Slices through all three axes at independent indices
    pub fn extract_all_axes_absolute<T: Sample>(
        volume: &Volume<T>,
        z_index: usize,
        y_index: usize,
        x_index: usize,
        stats: Option<&IntensityStats>,
    ) -> AxisSlices<Array2<u8>> {
        AxisSlices {
            z: Self::extract(volume, Axis::Z, z_index, stats),
            y: Self::extract(volume, Axis::Y, y_index, stats),
            x: Self::extract(volume, Axis::X, x_index, stats),
        }
    }
}
