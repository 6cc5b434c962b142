//! # lung-slice
//!
//! Viewer core for 3D lung CT volumes and their segmentation masks.
//!
//! A volume is loaded from a multi-page grayscale TIFF (one page per Z
//! slice) into a (Z, Y, X) [`Volume`]. Its intensity bounds are computed once
//! with [`IntensityStats::compute`] so that every slice is scaled the same
//! way, whichever axis it is cut along:
//!  - Z (axial), slices span (Y, X)
//!  - Y (coronal), slices span (Z, X)
//!  - X (sagittal), slices span (Z, Y)
//!
//! The segmentation itself is done by an external model plugged in through
//! the [`Segmenter`] trait. Its [`LabelVolume`] is drawn on top of the
//! grayscale slice as a semi-transparent red overlay by the
//! [`OverlayCompositor`].
//!
//! Slice indices are always clamped to the volume and missing inputs
//! produce "nothing to show" rather than errors, so the API can be driven
//! directly by UI sliders.
//!
//! # Examples
//!
//! ## Rendering the middle axial slice with its mask
//!
//! ```no_run
//! # use lung_slice::{Axis, PrecomputedMask, ViewerSession};
//! let mut session: ViewerSession = ViewerSession::default();
//! session
//!     .load_from_path("scan.tif")
//!     .expect("should have loaded the volume");
//! session
//!     .segment(&PrecomputedMask::new("scan_labels.tif"))
//!     .expect("labels should match the volume");
//!
//! let middle = session.volume().map_or(0, |v| v.dim().0 / 2);
//! let overlay = session
//!     .overlay_slice(Axis::Z, middle)
//!     .expect("shapes match")
//!     .expect("volume and labels are loaded");
//! overlay.save("overlay.png").expect("should have written the png");
//! ```

pub mod cli;
pub mod config;
pub mod enums;
pub mod logging;
pub mod mask_writer;
pub mod normalizer;
pub mod overlay;
pub mod render;
pub mod sample;
pub mod segmenter;
pub mod session;
pub mod stats;
pub mod volume;
pub mod volume_loader;

pub use config::ViewerConfig;
pub use enums::{Axis, Normalization};
pub use mask_writer::MaskWriter;
pub use normalizer::{AxisSlices, SliceNormalizer};
pub use overlay::{Alpha, OverlayCompositor, OverlayError};
pub use render::{RenderError, RenderedSlice};
pub use sample::Sample;
pub use segmenter::{PrecomputedMask, SegmentationError, Segmenter};
pub use session::ViewerSession;
pub use stats::IntensityStats;
pub use volume::{LabelVolume, Volume, VolumeError};
pub use volume_loader::{VolumeLoader, VolumeLoaderError};
