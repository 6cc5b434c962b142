use crate::enums::Axis;
use crate::normalizer::{AxisSlices, SliceNormalizer};
use crate::sample::Sample;
use crate::stats::IntensityStats;
use crate::volume::{LabelVolume, Volume};

use ndarray::{Array2, Array3, ArrayView2};
use thiserror::Error;

/// Highlight painted over masked pixels.
pub const HIGHLIGHT_RGB: [u8; 3] = [255, 0, 0];

#[derive(Debug, Error, PartialEq)]
pub enum OverlayError {
    #[error("Slice shape {raw:?} does not match mask shape {mask:?}")]
    ShapeMismatch {
        raw: (usize, usize),
        mask: (usize, usize),
    },

    #[error("Overlay alpha must lie within [0, 1], got {0}")]
    InvalidAlpha(f64),
}

/// Opacity of the mask highlight.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Alpha(f64);

impl Alpha {
    /// Highlight opacity used when none is configured
    pub const DEFAULT: Alpha = Alpha(0.3);

    /// # Errors
    ///
    /// Returns [`OverlayError::InvalidAlpha`] for NaN or values outside `[0, 1]`
    pub fn new(value: f64) -> Result<Self, OverlayError> {
        if !(0.0..=1.0).contains(&value) {
            return Err(OverlayError::InvalidAlpha(value));
        }
        Ok(Self(value))
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl Default for Alpha {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<f64> for Alpha {
    type Error = OverlayError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

pub struct OverlayCompositor;

impl OverlayCompositor {
    /// Blend a red highlight into `raw` wherever `mask` is non-zero.
    ///
    /// Returns a `(rows, cols, 3)` RGB array. Every pixel is
    /// `raw * (1 - alpha) + highlight * alpha`, truncated to 8 bits, where the
    /// highlight is [`HIGHLIGHT_RGB`] under the mask and black elsewhere.
    ///
    /// # Errors
    ///
    /// Returns [`OverlayError::ShapeMismatch`] if the two slices differ in shape
    pub fn blend<L: Sample>(
        raw: ArrayView2<'_, u8>,
        mask: ArrayView2<'_, L>,
        alpha: Alpha,
    ) -> Result<Array3<u8>, OverlayError> {
        if raw.dim() != mask.dim() {
            return Err(OverlayError::ShapeMismatch {
                raw: raw.dim(),
                mask: mask.dim(),
            });
        }

        let alpha = alpha.value();
        let keep = 1.0 - alpha;
        let (rows, cols) = raw.dim();
        let blended = Array3::from_shape_fn((rows, cols, 3), |(row, col, channel)| {
            let base = f64::from(raw[[row, col]]) * keep;
            let highlight = if mask[[row, col]].is_foreground() {
                f64::from(HIGHLIGHT_RGB[channel])
            } else {
                0.0
            };
            highlight.mul_add(alpha, base) as u8
        });
        Ok(blended)
    }

    /// [`OverlayCompositor::blend`] that yields `Ok(None)` until both the
    /// slice and the mask are available
    pub fn blend_optional<L: Sample>(
        raw: Option<ArrayView2<'_, u8>>,
        mask: Option<ArrayView2<'_, L>>,
        alpha: Alpha,
    ) -> Result<Option<Array3<u8>>, OverlayError> {
        match (raw, mask) {
            (Some(raw), Some(mask)) => Self::blend(raw, mask, alpha).map(Some),
            _ => Ok(None),
        }
    }

    /// Overlay slices through all three axes at one shared relative position
    pub fn overlay_all_axes<T: Sample>(
        volume: &Volume<T>,
        labels: &LabelVolume,
        position: f64,
        stats: Option<&IntensityStats>,
        alpha: Alpha,
    ) -> Result<AxisSlices<Array3<u8>>, OverlayError> {
        Self::overlay_all_axes_absolute(
            volume,
            labels,
            volume.index_at_position(Axis::Z, position),
            volume.index_at_position(Axis::Y, position),
            volume.index_at_position(Axis::X, position),
            stats,
            alpha,
        )
    }

    /// Overlay slices through all three axes at independent indices
    pub fn overlay_all_axes_absolute<T: Sample>(
        volume: &Volume<T>,
        labels: &LabelVolume,
        z_index: usize,
        y_index: usize,
        x_index: usize,
        stats: Option<&IntensityStats>,
        alpha: Alpha,
    ) -> Result<AxisSlices<Array3<u8>>, OverlayError> {
        let raw =
            SliceNormalizer::extract_all_axes_absolute(volume, z_index, y_index, x_index, stats);
        let indices = AxisSlices {
            z: volume.clamp_index(Axis::Z, z_index),
            y: volume.clamp_index(Axis::Y, y_index),
            x: volume.clamp_index(Axis::X, x_index),
        };
        raw.try_map(|axis, slice: Array2<u8>| {
            let mask = labels.get_slice_from_axis(*indices.get(axis), axis);
            Self::blend(slice.view(), mask, alpha)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use ndarray::s;

    fn channel(rgb: &Array3<u8>, channel: usize) -> Array2<u8> {
        rgb.slice(s![.., .., channel]).to_owned()
    }

    #[test]
    fn test_alpha_validation() {
        assert_eq!(Alpha::default().value(), 0.3);
        assert!(Alpha::new(0.35).is_ok());
        assert!(Alpha::new(0.0).is_ok());
        assert!(Alpha::new(1.0).is_ok());
        assert_matches!(Alpha::new(1.5), Err(OverlayError::InvalidAlpha(_)));
        assert_matches!(Alpha::try_from(-0.1), Err(OverlayError::InvalidAlpha(_)));
        assert_matches!(Alpha::new(f64::NAN), Err(OverlayError::InvalidAlpha(_)));
    }

    #[test]
    fn test_blend_saturation() {
        let raw = Array2::from_elem((4, 6), 100u8);
        let mask = Array2::from_elem((4, 6), 1u8);
        let alpha = Alpha::new(0.3).unwrap();
        let blended = OverlayCompositor::blend(raw.view(), mask.view(), alpha).unwrap();

        assert_eq!(blended.dim(), (4, 6, 3));
        for row in blended.outer_iter() {
            for pixel in row.outer_iter() {
                assert!(pixel[0].abs_diff(146) <= 1, "red was {}", pixel[0]);
                assert!(pixel[1].abs_diff(70) <= 1, "green was {}", pixel[1]);
                assert_eq!(pixel[1], pixel[2]);
                assert!(pixel[0] > pixel[1]);
            }
        }
    }

    #[test]
    fn test_empty_mask_stays_gray() {
        let raw = Array2::from_shape_fn((3, 5), |(r, c)| (r * 50 + c * 10) as u8);
        let mask = Array2::<u8>::zeros((3, 5));
        let alpha = Alpha::new(0.3).unwrap();
        let blended = OverlayCompositor::blend(raw.view(), mask.view(), alpha).unwrap();

        let red = channel(&blended, 0);
        assert_eq!(red, channel(&blended, 1));
        assert_eq!(red, channel(&blended, 2));
        for ((r, c), &value) in red.indexed_iter() {
            let expected = f64::from(raw[[r, c]]) * 0.7;
            assert!((f64::from(value) - expected).abs() <= 1.0);
        }
    }

    #[test]
    fn test_zero_alpha_returns_raw() {
        let raw = Array2::from_shape_fn((3, 5), |(r, c)| (r * 50 + c * 10) as u8);
        let mask = Array2::from_elem((3, 5), 1u8);
        let alpha = Alpha::new(0.0).unwrap();
        let blended = OverlayCompositor::blend(raw.view(), mask.view(), alpha).unwrap();
        for ch in 0..3 {
            assert_eq!(channel(&blended, ch), raw);
        }
    }

    #[test]
    fn test_any_positive_label_is_masked() {
        let raw = Array2::<u8>::zeros((1, 3));
        let mask = Array2::from_shape_vec((1, 3), vec![0u16, 2, 9]).unwrap();
        let blended = OverlayCompositor::blend(raw.view(), mask.view(), Alpha::default()).unwrap();
        assert_eq!(blended[[0, 0, 0]], 0);
        assert!(blended[[0, 1, 0]] > 0);
        assert_eq!(blended[[0, 1, 0]], blended[[0, 2, 0]]);
        assert_eq!(blended[[0, 2, 1]], 0);
    }

    #[test]
    fn test_shape_mismatch() {
        let raw = Array2::<u8>::zeros((3, 4));
        let mask = Array2::<u8>::zeros((4, 3));
        let result = OverlayCompositor::blend(raw.view(), mask.view(), Alpha::default());
        assert_matches!(
            result,
            Err(OverlayError::ShapeMismatch { raw: (3, 4), mask: (4, 3) })
        );
    }

    #[test]
    fn test_blend_optional_absent_inputs() {
        let raw = Array2::<u8>::zeros((2, 2));
        let alpha = Alpha::default();
        let none = OverlayCompositor::blend_optional::<u8>(Some(raw.view()), None, alpha);
        assert_eq!(none, Ok(None));
        let none = OverlayCompositor::blend_optional(None, Some(raw.view()), alpha);
        assert_eq!(none, Ok(None));
        let some = OverlayCompositor::blend_optional(Some(raw.view()), Some(raw.view()), alpha);
        assert_matches!(some, Ok(Some(rgb)) if rgb.dim() == (2, 2, 3));
    }

    #[test]
    fn test_all_ones_mask_on_every_axis() {
        let data = Array3::from_shape_fn((4, 5, 6), |(z, y, x)| (z + y + x) as f32);
        let volume = Volume::new(data).unwrap();
        let labels = LabelVolume::new(Array3::from_elem((4, 5, 6), 1u8)).unwrap();
        let stats = IntensityStats::compute(&volume);

        let overlays = OverlayCompositor::overlay_all_axes_absolute(
            &volume,
            &labels,
            2,
            10,
            3,
            Some(&stats),
            Alpha::default(),
        )
        .unwrap();

        assert_eq!(overlays.z.dim(), (5, 6, 3));
        assert_eq!(overlays.y.dim(), (4, 6, 3));
        assert_eq!(overlays.x.dim(), (4, 5, 3));
        for axis in Axis::ALL {
            let rgb = overlays.get(axis);
            assert!(channel(rgb, 0).iter().all(|&red| red >= 76));
            assert_eq!(channel(rgb, 1), channel(rgb, 2));
            assert!(
                channel(rgb, 0)
                    .iter()
                    .zip(channel(rgb, 1).iter())
                    .all(|(red, green)| red > green)
            );
        }
    }

    #[test]
    fn test_overlay_all_axes_relative_matches_absolute() {
        let data = Array3::from_shape_fn((3, 5, 7), |(z, y, x)| (z * y + x) as u16);
        let volume = Volume::new(data).unwrap();
        let mask = Array3::from_shape_fn((3, 5, 7), |(z, _, x)| ((z + x) % 2) as u8);
        let labels = LabelVolume::new(mask).unwrap();
        let alpha = Alpha::default();
        let relative =
            OverlayCompositor::overlay_all_axes(&volume, &labels, 0.5, None, alpha).unwrap();
        let absolute =
            OverlayCompositor::overlay_all_axes_absolute(&volume, &labels, 1, 2, 3, None, alpha)
                .unwrap();
        assert_eq!(relative, absolute);
    }
}
