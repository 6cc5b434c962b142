use crate::sample::Sample;
use crate::volume::{LabelVolume, Volume};
use crate::volume_loader::{VolumeLoader, VolumeLoaderError};

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SegmentationError {
    #[error("Label volume shape {found:?} does not match volume shape {expected:?}")]
    ShapeMismatch {
        expected: (usize, usize, usize),
        found: (usize, usize, usize),
    },

    #[error("Segmentation model failed: {0}")]
    Model(String),

    #[error("Failed to load labels: {0}")]
    Loader(#[from] VolumeLoaderError),
}

/// A segmentation model: maps a volume to a same-shaped label volume.
///
/// Implementations are handed to the viewer at call time, so loading the
/// model stays with whoever owns its lifecycle.
pub trait Segmenter<T: Sample = f64> {
    fn segment(&self, volume: &Volume<T>) -> Result<LabelVolume, SegmentationError>;
}

impl<T, F> Segmenter<T> for F
where
    T: Sample,
    F: Fn(&Volume<T>) -> Result<LabelVolume, SegmentationError>,
{
    fn segment(&self, volume: &Volume<T>) -> Result<LabelVolume, SegmentationError> {
        self(volume)
    }
}

/// Labels produced ahead of time and stored as a TIFF stack.
#[derive(Debug, Clone)]
pub struct PrecomputedMask {
    path: PathBuf,
}

impl PrecomputedMask {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl<T: Sample> Segmenter<T> for PrecomputedMask {
    fn segment(&self, volume: &Volume<T>) -> Result<LabelVolume, SegmentationError> {
        let labels = VolumeLoader::load_labels_from_path(&self.path)?;
        check_shape(volume, &labels)?;
        Ok(labels)
    }
}

/// Reject labels that were not derived from `volume`
pub fn check_shape<T: Sample>(
    volume: &Volume<T>,
    labels: &LabelVolume,
) -> Result<(), SegmentationError> {
    if volume.dim() != labels.dim() {
        return Err(SegmentationError::ShapeMismatch {
            expected: volume.dim(),
            found: labels.dim(),
        });
    }
    Ok(())
}
