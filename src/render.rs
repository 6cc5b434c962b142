//! Conversion of normalized slices into `image` buffers.

use std::path::Path;

use image::{GrayImage, ImageBuffer, RgbImage};
use ndarray::{Array2, Array3};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Failed to write image: {0}")]
    Image(#[from] image::ImageError),
}

/// An 8-bit slice ready for display: grayscale for the raw view, RGB for
/// the overlay view.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderedSlice {
    Gray(GrayImage),
    Rgb(RgbImage),
}

impl RenderedSlice {
    /// (width, height) in pixels
    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            RenderedSlice::Gray(image) => image.dimensions(),
            RenderedSlice::Rgb(image) => image.dimensions(),
        }
    }

    /// Save the slice, inferring the format from the file extension
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), RenderError> {
        match self {
            RenderedSlice::Gray(image) => image.save(path)?,
            RenderedSlice::Rgb(image) => image.save(path)?,
        }
        Ok(())
    }
}

impl From<Array2<u8>> for RenderedSlice {
    fn from(slice: Array2<u8>) -> Self {
        RenderedSlice::Gray(gray_image(slice))
    }
}

impl From<Array3<u8>> for RenderedSlice {
    fn from(rgb: Array3<u8>) -> Self {
        RenderedSlice::Rgb(rgb_image(rgb))
    }
}

/// Rows of the slice become image rows, columns become image columns
pub fn gray_image(slice: Array2<u8>) -> GrayImage {
    let (height, width) = slice.dim();
    ImageBuffer::from_fn(width as u32, height as u32, |x, y| {
        image::Luma([slice[[y as usize, x as usize]]])
    })
}

/// Expects a `(rows, cols, 3)` array as produced by the overlay compositor
pub fn rgb_image(rgb: Array3<u8>) -> RgbImage {
    let (height, width, _) = rgb.dim();
    ImageBuffer::from_fn(width as u32, height as u32, |x, y| {
        let (row, col) = (y as usize, x as usize);
        image::Rgb([rgb[[row, col, 0]], rgb[[row, col, 1]], rgb[[row, col, 2]]])
    })
}
