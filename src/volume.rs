use crate::enums::Axis;
use crate::sample::Sample;

use ndarray::Array3;
use ndarray::ArrayView2;
use ndarray::s;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum VolumeError {
    #[error("Volume axes must all be non-empty, got shape {0:?}")]
    EmptyAxis((usize, usize, usize)),
}

/// A 3D grid of scalar samples ordered (depth, height, width), i.e. (Z, Y, X).
#[derive(Debug, Clone, PartialEq)]
pub struct Volume<T: Sample = f64> {
    data: Array3<T>,
}

impl<T: Sample> Volume<T> {
    /// Wrap `data` as a volume
    ///
    /// # Errors
    ///
    /// Returns [`VolumeError::EmptyAxis`] if any axis has length zero
    pub fn new(data: Array3<T>) -> Result<Self, VolumeError> {
        check_shape(data.dim())?;
        Ok(Self { data })
    }

    /// Get the dimensions of the volume (depth, height, width)
    pub fn dim(&self) -> (usize, usize, usize) {
        self.data.dim()
    }

    /// Length of the volume along `axis`
    pub fn len_of(&self, axis: Axis) -> usize {
        len_of(self.dim(), axis)
    }

    /// Get a reference to the underlying data
    pub fn data(&self) -> &Array3<T> {
        &self.data
    }

    pub fn into_inner(self) -> Array3<T> {
        self.data
    }

    /// Clamp `index` into `0..len_of(axis)`
    pub fn clamp_index(&self, axis: Axis, index: usize) -> usize {
        clamp_index(self.dim(), axis, index)
    }

    /// Cross-section with `axis` fixed at `index` (clamped), the other two
    /// axes kept in their natural order
    pub fn get_slice_from_axis(&self, index: usize, axis: Axis) -> ArrayView2<'_, T> {
        slice_at(&self.data, axis, index)
    }

    /// Absolute index for a relative scrub position in `[0, 1]`.
    ///
    /// Positions outside the unit interval (and NaN) are clamped first.
    pub fn index_at_position(&self, axis: Axis, position: f64) -> usize {
        let position = if position.is_nan() {
            0.0
        } else {
            position.clamp(0.0, 1.0)
        };
        let last = (self.len_of(axis) - 1) as f64;
        (position * last).round() as usize
    }
}

/// Segmentation output: one class label per voxel, 0 is background.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelVolume {
    data: Array3<u8>,
}

impl LabelVolume {
    /// # Errors
    ///
    /// Returns [`VolumeError::EmptyAxis`] if any axis has length zero
    pub fn new(data: Array3<u8>) -> Result<Self, VolumeError> {
        check_shape(data.dim())?;
        Ok(Self { data })
    }

    pub fn dim(&self) -> (usize, usize, usize) {
        self.data.dim()
    }

    pub fn data(&self) -> &Array3<u8> {
        &self.data
    }

    /// Same cross-section rule as [`Volume::get_slice_from_axis`]
    pub fn get_slice_from_axis(&self, index: usize, axis: Axis) -> ArrayView2<'_, u8> {
        slice_at(&self.data, axis, index)
    }

    /// Number of voxels with a non-zero label
    pub fn foreground_count(&self) -> usize {
        self.data.iter().filter(|&&label| label > 0).count()
    }
}

fn len_of((depth, height, width): (usize, usize, usize), axis: Axis) -> usize {
    match axis {
        Axis::Z => depth,
        Axis::Y => height,
        Axis::X => width,
    }
}

// Callers guarantee every axis is non-empty.
fn clamp_index(dim: (usize, usize, usize), axis: Axis, index: usize) -> usize {
    index.min(len_of(dim, axis) - 1)
}

fn slice_at<A>(data: &Array3<A>, axis: Axis, index: usize) -> ArrayView2<'_, A> {
    let index = clamp_index(data.dim(), axis, index);
    match axis {
        Axis::Z => data.slice(s![index, .., ..]),
        Axis::Y => data.slice(s![.., index, ..]),
        Axis::X => data.slice(s![.., .., index]),
    }
}

fn check_shape(dim: (usize, usize, usize)) -> Result<(), VolumeError> {
    if dim.0 == 0 || dim.1 == 0 || dim.2 == 0 {
        return Err(VolumeError::EmptyAxis(dim));
    }
    Ok(())
}
