//! State of one viewer: the loaded volume, its intensity bounds and, once
//! segmentation has run, the label volume.
//!
//! Every query tolerates missing inputs and answers `None` ("nothing to show
//! yet") instead of failing, because the front-end polls it while a volume is
//! still loading or being segmented.

use crate::config::ViewerConfig;
use crate::enums::{Axis, Normalization};
use crate::normalizer::{AxisSlices, SliceNormalizer};
use crate::overlay::{OverlayCompositor, OverlayError};
use crate::render::{gray_image, rgb_image};
use crate::sample::Sample;
use crate::segmenter::{SegmentationError, Segmenter, check_shape};
use crate::stats::IntensityStats;
use crate::volume::{LabelVolume, Volume};
use crate::volume_loader::{VolumeLoader, VolumeLoaderError};

use image::{GrayImage, RgbImage};
use ndarray::Array2;
use std::ops::RangeInclusive;
use std::path::Path;
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub struct ViewerSession<T: Sample = f64> {
    config: ViewerConfig,
    volume: Option<Volume<T>>,
    stats: IntensityStats,
    labels: Option<LabelVolume>,
}

impl<T: Sample> Default for ViewerSession<T> {
    fn default() -> Self {
        Self::new(ViewerConfig::default())
    }
}

impl<T: Sample> ViewerSession<T> {
    pub fn new(config: ViewerConfig) -> Self {
        Self {
            config,
            volume: None,
            stats: IntensityStats::default(),
            labels: None,
        }
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: ViewerConfig) {
        self.config = config;
    }

    pub fn volume(&self) -> Option<&Volume<T>> {
        self.volume.as_ref()
    }

    pub fn labels(&self) -> Option<&LabelVolume> {
        self.labels.as_ref()
    }

    /// Bounds of the loaded volume, `None` before anything is loaded
    pub fn stats(&self) -> Option<&IntensityStats> {
        self.volume.as_ref().map(|_| &self.stats)
    }

    /// Replace the current volume. Stats are computed once here and labels
    /// from the previous volume are dropped.
    pub fn load(&mut self, volume: Volume<T>) {
        self.stats = IntensityStats::compute(&volume);
        info!(
            dim = ?volume.dim(),
            min = self.stats.min,
            max = self.stats.max,
            "volume loaded into session"
        );
        self.volume = Some(volume);
        self.labels = None;
    }

    /// Slider bounds for `axis`, `None` while the raw slider should be hidden
    pub fn slider_range(&self, axis: Axis) -> Option<RangeInclusive<usize>> {
        self.volume
            .as_ref()
            .map(|volume| 0..=volume.len_of(axis) - 1)
    }

    /// Slider bounds for the overlay view, which needs labels as well
    pub fn overlay_slider_range(&self, axis: Axis) -> Option<RangeInclusive<usize>> {
        self.labels.as_ref().and(self.slider_range(axis))
    }

    /// Run `segmenter` on the loaded volume and keep its labels.
    ///
    /// Returns `Ok(false)` when there is no volume to segment. On error the
    /// session keeps whatever labels it had.
    pub fn segment<S>(&mut self, segmenter: &S) -> Result<bool, SegmentationError>
    where
        S: Segmenter<T> + ?Sized,
    {
        let Some(volume) = self.volume.as_ref() else {
            debug!("segmentation requested without a volume");
            return Ok(false);
        };
        let labels = segmenter.segment(volume).inspect_err(|err| {
            warn!(%err, "segmentation failed");
        })?;
        self.set_labels(labels)
    }

    /// Attach labels produced elsewhere. Returns `Ok(false)` and discards
    /// them when there is no volume to attach them to.
    pub fn set_labels(&mut self, labels: LabelVolume) -> Result<bool, SegmentationError> {
        let Some(volume) = self.volume.as_ref() else {
            return Ok(false);
        };
        check_shape(volume, &labels)?;
        info!(foreground = labels.foreground_count(), "labels attached");
        self.labels = Some(labels);
        Ok(true)
    }

    fn raw_array(&self, axis: Axis, index: usize) -> Option<Array2<u8>> {
        let volume = self.volume.as_ref()?;
        Some(SliceNormalizer::extract_with(
            volume,
            axis,
            index,
            self.config.normalization,
            &self.stats,
        ))
    }

    fn stats_for_mode(&self) -> Option<&IntensityStats> {
        match self.config.normalization {
            Normalization::Global => Some(&self.stats),
            Normalization::Local => None,
        }
    }

    /// Grayscale slice at `index` (clamped) along `axis`
    pub fn raw_slice(&self, axis: Axis, index: usize) -> Option<GrayImage> {
        self.raw_array(axis, index).map(gray_image)
    }

    /// Raw slice with the labels blended in red
    pub fn overlay_slice(
        &self,
        axis: Axis,
        index: usize,
    ) -> Result<Option<RgbImage>, OverlayError> {
        let (Some(volume), Some(labels)) = (self.volume.as_ref(), self.labels.as_ref()) else {
            return Ok(None);
        };
        let index = volume.clamp_index(axis, index);
        let raw = self.raw_array(axis, index);
        let mask = labels.get_slice_from_axis(index, axis);
        let blended = OverlayCompositor::blend_optional(
            raw.as_ref().map(Array2::view),
            Some(mask),
            self.config.alpha,
        )?;
        Ok(blended.map(rgb_image))
    }

    /// Grayscale slices through all three axes at a relative position
    pub fn raw_all_axes(&self, position: f64) -> Option<AxisSlices<GrayImage>> {
        let volume = self.volume.as_ref()?;
        let slices = SliceNormalizer::extract_all_axes(volume, position, self.stats_for_mode());
        Some(slices.map(|_, slice| gray_image(slice)))
    }

    /// Overlay slices through all three axes at a relative position
    pub fn overlay_all_axes(
        &self,
        position: f64,
    ) -> Result<Option<AxisSlices<RgbImage>>, OverlayError> {
        let (Some(volume), Some(labels)) = (self.volume.as_ref(), self.labels.as_ref()) else {
            return Ok(None);
        };
        let slices = OverlayCompositor::overlay_all_axes(
            volume,
            labels,
            position,
            self.stats_for_mode(),
            self.config.alpha,
        )?;
        Ok(Some(slices.map(|_, rgb| rgb_image(rgb))))
    }

    /// Back to the empty state; the config is kept
    pub fn reset(&mut self) {
        debug!("session reset");
        self.volume = None;
        self.labels = None;
        self.stats = IntensityStats::default();
    }
}

impl ViewerSession<f64> {
    /// Load a TIFF stack from disk and make it the current volume.
    ///
    /// On failure the previous volume stays loaded.
    pub fn load_from_path(&mut self, path: impl AsRef<Path>) -> Result<(), VolumeLoaderError> {
        let volume = VolumeLoader::load_from_path(path)?;
        self.load(volume);
        Ok(())
    }
}
