use crate::volume::LabelVolume;

use ndarray::Axis;
use std::{
    fs::File,
    io::{BufWriter, Seek, Write},
    path::Path,
};
use tiff::encoder::{Compression, DeflateLevel, TiffEncoder, colortype};
use tracing::info;

/// Writes label volumes as multi-page, deflate-compressed 8-bit TIFF, one
/// page per Z slice.
pub struct MaskWriter;

impl MaskWriter {
    /// # Errors
    ///
    /// Returns error if the file cannot be created or encoding fails
    pub fn write_to_path(
        labels: &LabelVolume,
        path: impl AsRef<Path>,
    ) -> Result<(), tiff::TiffError> {
        let path = path.as_ref();
        let mut writer = BufWriter::new(File::create(path)?);
        Self::write_to_writer(labels, &mut writer)?;
        writer.flush()?;
        info!(
            path = %path.display(),
            foreground = labels.foreground_count(),
            "wrote labels"
        );
        Ok(())
    }

    pub fn write_to_writer<W: Write + Seek>(
        labels: &LabelVolume,
        writer: &mut W,
    ) -> Result<(), tiff::TiffError> {
        let (_, height, width) = labels.dim();
        let mut encoder = TiffEncoder::new(writer)?
            .with_compression(Compression::Deflate(DeflateLevel::Balanced));
        for page in labels.data().axis_iter(Axis(0)) {
            let pixels: Vec<u8> = page.iter().copied().collect();
            encoder.write_image::<colortype::Gray8>(width as u32, height as u32, &pixels)?;
        }
        Ok(())
    }
}
