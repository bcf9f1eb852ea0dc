//! RAW heightmap export for engine terrain importers.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use thiserror::Error;

use super::png::quantize_u16;
use crate::terrain::TerrainField;

/// Errors that can occur during RAW export.
#[derive(Error, Debug)]
pub enum RawExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid height range: min ({0}) >= max ({1})")]
    InvalidHeightRange(f32, f32),
}

/// RAW sample layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RawFormat {
    /// 16-bit unsigned integer, little-endian (Unity default).
    #[default]
    R16LittleEndian,
    /// 16-bit unsigned integer, big-endian.
    R16BigEndian,
    /// 32-bit float, little-endian. Heights are written unnormalized.
    R32Float,
}

impl RawFormat {
    /// Bytes per sample.
    pub fn sample_size(self) -> u64 {
        match self {
            RawFormat::R16LittleEndian | RawFormat::R16BigEndian => 2,
            RawFormat::R32Float => 4,
        }
    }
}

/// Exports a terrain field as a headerless RAW heightmap in row-major order.
///
/// `min_height`/`max_height` normalize the R16 formats and are ignored for
/// R32.
pub fn export_field_raw(
    field: &TerrainField,
    path: &Path,
    format: RawFormat,
    min_height: f32,
    max_height: f32,
) -> Result<(), RawExportError> {
    if format != RawFormat::R32Float && !(min_height < max_height) {
        return Err(RawExportError::InvalidHeightRange(min_height, max_height));
    }

    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    let range = max_height - min_height;

    for &height in &field.heights {
        match format {
            RawFormat::R16LittleEndian => {
                writer.write_all(&quantize_u16(height, min_height, range).to_le_bytes())?
            }
            RawFormat::R16BigEndian => {
                writer.write_all(&quantize_u16(height, min_height, range).to_be_bytes())?
            }
            RawFormat::R32Float => writer.write_all(&height.to_le_bytes())?,
        }
    }

    writer.flush()?;
    tracing::debug!(path = %path.display(), ?format, "heightmap raw written");
    Ok(())
}

/// Returns the expected file size for a RAW export of a `width` x `length` grid.
pub fn expected_file_size(width: u32, length: u32, format: RawFormat) -> u64 {
    width as u64 * length as u64 * format.sample_size()
}
