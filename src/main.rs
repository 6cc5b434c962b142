use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use lung_slice::cli::Args;
use lung_slice::logging;
use lung_slice::{
    Alpha, Axis, Normalization, PrecomputedMask, RenderedSlice, ViewerConfig, ViewerSession,
};

fn main() {
    let args = Args::parse();
    logging::init_tracing(if args.verbose { "debug" } else { "info" });

    if let Err(e) = run(&args) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    // Stage 1: Build the session from the command line
    let alpha = Alpha::new(args.alpha).context("Invalid --alpha")?;
    let normalization = if args.local {
        Normalization::Local
    } else {
        Normalization::Global
    };
    let mut session: ViewerSession = ViewerSession::new(
        ViewerConfig::default()
            .with_alpha(alpha)
            .with_normalization(normalization),
    );

    // Stage 2: Load the volume and, if given, its labels
    session
        .load_from_path(&args.input)
        .with_context(|| format!("Failed to load volume {}", args.input.display()))?;
    if let Some(mask) = &args.mask {
        session
            .segment(&PrecomputedMask::new(mask))
            .with_context(|| format!("Failed to load labels {}", mask.display()))?;
    }

    // Stage 3: Render and write the requested slices
    fs::create_dir_all(&args.output)
        .with_context(|| format!("Failed to create {}", args.output.display()))?;
    let stem = args
        .input
        .file_stem()
        .map_or_else(|| "volume".to_string(), |s| s.to_string_lossy().into_owned());

    if args.all_axes {
        write_all_axes(&session, args, &stem)
    } else {
        let index = match (args.index, session.volume()) {
            (Some(index), _) => index,
            (None, Some(volume)) => volume.index_at_position(args.axis, args.position),
            (None, None) => 0,
        };
        write_axis(&session, args, &stem, args.axis, index)
    }
}

fn write_axis(
    session: &ViewerSession,
    args: &Args,
    stem: &str,
    axis: Axis,
    index: usize,
) -> Result<()> {
    let index = session
        .volume()
        .map_or(index, |volume| volume.clamp_index(axis, index));

    if let Some(raw) = session.raw_slice(axis, index) {
        save(RenderedSlice::Gray(raw), &output_path(args, stem, axis, index, "raw"))?;
    }
    if let Some(overlay) = session.overlay_slice(axis, index)? {
        save(RenderedSlice::Rgb(overlay), &output_path(args, stem, axis, index, "overlay"))?;
    }
    Ok(())
}

fn write_all_axes(session: &ViewerSession, args: &Args, stem: &str) -> Result<()> {
    let Some(volume) = session.volume() else {
        return Ok(());
    };
    let index = |axis| volume.index_at_position(axis, args.position);

    if let Some(raw) = session.raw_all_axes(args.position) {
        for axis in Axis::ALL {
            let image = raw.get(axis).clone();
            let path = output_path(args, stem, axis, index(axis), "raw");
            save(RenderedSlice::Gray(image), &path)?;
        }
    }
    if let Some(overlay) = session.overlay_all_axes(args.position)? {
        for axis in Axis::ALL {
            let image = overlay.get(axis).clone();
            let path = output_path(args, stem, axis, index(axis), "overlay");
            save(RenderedSlice::Rgb(image), &path)?;
        }
    }
    Ok(())
}

fn output_path(args: &Args, stem: &str, axis: Axis, index: usize, kind: &str) -> PathBuf {
    args.output.join(format!("{stem}_{axis}_{index}_{kind}.png"))
}

fn save(slice: RenderedSlice, path: &Path) -> Result<()> {
    slice
        .save(path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    let (width, height) = slice.dimensions();
    info!(path = %path.display(), width, height, "wrote slice");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lung_slice::{LabelVolume, MaskWriter};
    use ndarray::Array3;
    use std::ffi::OsString;
    use tiff::encoder::{TiffEncoder, colortype};

    fn write_volume(path: &Path, depth: u32, height: u32, width: u32) {
        let file = fs::File::create(path).unwrap();
        let mut encoder = TiffEncoder::new(std::io::BufWriter::new(file)).unwrap();
        for z in 0..depth {
            let page: Vec<u16> = (0..height * width).map(|i| (z * 100 + i) as u16).collect();
            encoder
                .write_image::<colortype::Gray16>(width, height, &page)
                .unwrap();
        }
    }

    fn args_for(input: PathBuf, output: PathBuf) -> Args {
        Args::try_parse_from([
            OsString::from("lung-slice"),
            input.into_os_string(),
            OsString::from("--output"),
            output.into_os_string(),
        ])
        .unwrap()
    }

    #[test]
    fn test_writes_raw_and_overlay() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("scan.tif");
        write_volume(&input, 4, 3, 5);
        let mask = dir.path().join("mask.tif");
        let labels = LabelVolume::new(Array3::from_elem((4, 3, 5), 1u8)).unwrap();
        MaskWriter::write_to_path(&labels, &mask).unwrap();

        let out = dir.path().join("out");
        let mut args = args_for(input, out.clone());
        args.mask = Some(mask);
        args.axis = Axis::Y;
        args.index = Some(99);
        run(&args).unwrap();

        let raw = image::open(out.join("scan_y_2_raw.png")).unwrap();
        assert_eq!((raw.width(), raw.height()), (5, 4));
        let overlay = image::open(out.join("scan_y_2_overlay.png")).unwrap().to_rgb8();
        assert!(overlay.pixels().all(|p| p.0[0] > p.0[1]));
    }

    #[test]
    fn test_all_axes_without_mask() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("scan.tif");
        write_volume(&input, 3, 4, 5);

        let out = dir.path().join("out");
        let mut args = args_for(input, out.clone());
        args.all_axes = true;
        args.position = 1.0;
        run(&args).unwrap();

        assert!(out.join("scan_z_2_raw.png").exists());
        assert!(out.join("scan_y_3_raw.png").exists());
        assert!(out.join("scan_x_4_raw.png").exists());
        assert!(!out.join("scan_z_2_overlay.png").exists());
    }

    #[test]
    fn test_mask_shape_mismatch_fails() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("scan.tif");
        write_volume(&input, 2, 2, 2);
        let mask = dir.path().join("mask.tif");
        let labels = LabelVolume::new(Array3::from_elem((2, 2, 3), 1u8)).unwrap();
        MaskWriter::write_to_path(&labels, &mask).unwrap();

        let mut args = args_for(input, dir.path().to_path_buf());
        args.mask = Some(mask);
        let err = run(&args).unwrap_err();
        assert!(format!("{err:#}").contains("does not match"));
    }

    #[test]
    fn test_invalid_alpha() {
        let dir = tempfile::tempdir().unwrap();
        let mut args = args_for(dir.path().join("scan.tif"), dir.path().to_path_buf());
        args.alpha = 2.0;
        assert!(run(&args).is_err());
    }
}
