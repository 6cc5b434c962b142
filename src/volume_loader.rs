use crate::volume::{LabelVolume, Volume, VolumeError};

use ndarray::{Array2, Array3, s};
use std::{
    fs::File,
    io::{BufReader, Cursor, Read, Seek},
    path::Path,
};
use thiserror::Error;
use tiff::{
    ColorType,
    decoder::{Decoder, DecodingResult},
};
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum VolumeLoaderError {
    #[error("TIFF file contains no pages")]
    NoPages,

    #[error("Page {page} is {found:?} but the first page is {expected:?}")]
    InconsistentDimensions {
        page: usize,
        expected: (usize, usize),
        found: (usize, usize),
    },

    #[error("Unsupported color type {0:?}, expected single-channel grayscale")]
    UnsupportedColorType(ColorType),

    #[error("Unsupported sample format on page {0}")]
    UnsupportedSampleFormat(usize),

    #[error("Label value {0} is not an integer in 0..=255")]
    InvalidLabel(f64),

    #[error("Invalid pixel buffer: {0}")]
    Shape(#[from] ndarray::ShapeError),

    #[error("Invalid volume: {0}")]
    Volume(#[from] VolumeError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TIFF error: {0}")]
    Tiff(#[from] tiff::TiffError),
}

/// Reads multi-page grayscale TIFF stacks, one page per Z slice.
pub struct VolumeLoader;

impl VolumeLoader {
    /// Load a volume from a TIFF file on disk
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read, is not single-channel
    /// grayscale, or its pages differ in size
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Volume<f64>, VolumeLoaderError> {
        let path = path.as_ref();
        info!(path = %path.display(), "loading volume");
        Self::load_from_reader(BufReader::new(File::open(path)?))
    }

    /// Load a volume from an in-memory TIFF file
    pub fn load_from_bytes(bytes: &[u8]) -> Result<Volume<f64>, VolumeLoaderError> {
        Self::load_from_reader(Cursor::new(bytes))
    }

    pub fn load_from_reader<R: Read + Seek>(reader: R) -> Result<Volume<f64>, VolumeLoaderError> {
        let volume = Volume::new(Self::read_pages(reader)?)?;
        debug!(dim = ?volume.dim(), "volume loaded");
        Ok(volume)
    }

    /// Load a label volume; every sample must be a whole number in `0..=255`
    pub fn load_labels_from_path(
        path: impl AsRef<Path>,
    ) -> Result<LabelVolume, VolumeLoaderError> {
        let path = path.as_ref();
        info!(path = %path.display(), "loading labels");
        Self::load_labels_from_reader(BufReader::new(File::open(path)?))
    }

    pub fn load_labels_from_reader<R: Read + Seek>(
        reader: R,
    ) -> Result<LabelVolume, VolumeLoaderError> {
        let samples = Self::read_pages(reader)?;
        if let Some(&bad) = samples.iter().find(|&&v| !Self::is_label(v)) {
            return Err(VolumeLoaderError::InvalidLabel(bad));
        }
        Ok(LabelVolume::new(samples.mapv(|v| v as u8))?)
    }

    fn is_label(value: f64) -> bool {
        value.fract() == 0.0 && (0.0..=255.0).contains(&value)
    }

    fn read_pages<R: Read + Seek>(reader: R) -> Result<Array3<f64>, VolumeLoaderError> {
        let mut decoder = Decoder::new(reader)?;
        let mut pages = Vec::new();

        loop {
            pages.push(Self::decode_page(&mut decoder, pages.len())?);
            if !decoder.more_images() {
                break;
            }
            decoder.next_image()?;
        }

        Self::validate_dimensions(&pages)?;
        Ok(Self::build_volume_array(&pages))
    }

    fn decode_page<R: Read + Seek>(
        decoder: &mut Decoder<R>,
        page: usize,
    ) -> Result<Array2<f64>, VolumeLoaderError> {
        let color_type = decoder.colortype()?;
        if !matches!(color_type, ColorType::Gray(_)) {
            return Err(VolumeLoaderError::UnsupportedColorType(color_type));
        }

        let (width, height) = decoder.dimensions()?;
        let samples = Self::samples_to_f64(decoder.read_image()?)
            .ok_or(VolumeLoaderError::UnsupportedSampleFormat(page))?;
        Ok(Array2::from_shape_vec(
            (height as usize, width as usize),
            samples,
        )?)
    }

    // 64-bit integers do not widen to f64 exactly and are rejected.
    fn samples_to_f64(result: DecodingResult) -> Option<Vec<f64>> {
        fn widen<T: Copy + Into<f64>>(values: Vec<T>) -> Vec<f64> {
            values.into_iter().map(Into::into).collect()
        }

        match result {
            DecodingResult::U8(values) => Some(widen(values)),
            DecodingResult::U16(values) => Some(widen(values)),
            DecodingResult::U32(values) => Some(widen(values)),
            DecodingResult::I8(values) => Some(widen(values)),
            DecodingResult::I16(values) => Some(widen(values)),
            DecodingResult::I32(values) => Some(widen(values)),
            DecodingResult::F32(values) => Some(widen(values)),
            DecodingResult::F64(values) => Some(values),
            _ => None,
        }
    }

    fn validate_dimensions(pages: &[Array2<f64>]) -> Result<(), VolumeLoaderError> {
        let expected = pages.first().ok_or(VolumeLoaderError::NoPages)?.dim();
        match pages.iter().position(|page| page.dim() != expected) {
            Some(page) => Err(VolumeLoaderError::InconsistentDimensions {
                page,
                expected,
                found: pages[page].dim(),
            }),
            None => Ok(()),
        }
    }

    fn build_volume_array(pages: &[Array2<f64>]) -> Array3<f64> {
        let (height, width) = pages[0].dim();
        let depth = pages.len();
        let mut volume = Array3::<f64>::zeros((depth, height, width));

        for (i, page) in pages.iter().enumerate() {
            volume.slice_mut(s![i, .., ..]).assign(page);
        }

        volume
    }
}
