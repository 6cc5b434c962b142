use clap::Parser;
use std::path::PathBuf;

use crate::enums::Axis;

/// Render slices and mask overlays of a 3D TIFF volume
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Multi-page grayscale TIFF volume, pages ordered along Z
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Label TIFF with the same shape as the volume, drawn as a red overlay
    #[arg(short, long, value_name = "LABELS")]
    pub mask: Option<PathBuf>,

    /// Axis held fixed for the slice
    #[arg(short, long, value_enum, default_value_t = Axis::Z)]
    pub axis: Axis,

    /// Absolute slice index (clamped to the volume)
    #[arg(short, long, conflicts_with = "position")]
    pub index: Option<usize>,

    /// Relative slice position in [0, 1]
    #[arg(short, long, default_value_t = 0.5)]
    pub position: f64,

    /// Render all three axes at the same relative position
    #[arg(long, conflicts_with_all = ["axis", "index"])]
    pub all_axes: bool,

    /// Overlay opacity in [0, 1]
    #[arg(long, default_value_t = 0.3)]
    pub alpha: f64,

    /// Scale each slice by its own min and max instead of the volume's
    #[arg(long)]
    pub local: bool,

    /// Directory the PNG files are written to
    #[arg(short, long, default_value = ".")]
    pub output: PathBuf,

    /// Log at debug level
    #[arg(short, long)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_command_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["lung-slice", "scan.tif"]).unwrap();
        assert_eq!(args.axis, Axis::Z);
        assert_eq!(args.index, None);
        assert_eq!(args.position, 0.5);
        assert_eq!(args.alpha, 0.3);
        assert!(!args.local);
        assert!(args.mask.is_none());
        assert_eq!(args.output, PathBuf::from("."));
    }

    #[test]
    fn test_axis_and_index() {
        let args = Args::try_parse_from([
            "lung-slice",
            "scan.tif",
            "--axis",
            "y",
            "--index",
            "12",
            "-m",
            "mask.tif",
        ])
        .unwrap();
        assert_eq!(args.axis, Axis::Y);
        assert_eq!(args.index, Some(12));
        assert_eq!(args.mask, Some(PathBuf::from("mask.tif")));
    }

    #[test]
    fn test_index_conflicts_with_position() {
        let result = Args::try_parse_from(["lung-slice", "scan.tif", "-i", "3", "-p", "0.2"]);
        assert!(result.is_err());
    }
}
