//! PNG export functionality for heightmaps.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ImageBuffer, ImageEncoder, Luma};
use thiserror::Error;

use crate::terrain::TerrainField;

/// Errors that can occur during PNG export.
#[derive(Error, Debug)]
pub enum PngExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Invalid height range: min ({0}) >= max ({1})")]
    InvalidHeightRange(f32, f32),
}

/// Options for PNG export.
#[derive(Debug, Clone)]
pub struct PngExportOptions {
    /// Height mapped to black.
    pub min_height: f32,
    /// Height mapped to white.
    pub max_height: f32,
    /// PNG compression type.
    pub compression: CompressionType,
    /// PNG filter type.
    pub filter: FilterType,
}

impl Default for PngExportOptions {
    fn default() -> Self {
        Self {
            min_height: -100.0,
            max_height: 100.0,
            compression: CompressionType::Default,
            filter: FilterType::Adaptive,
        }
    }
}

impl PngExportOptions {
    /// Creates options spanning the field's own height range.
    ///
    /// A flat field gets a unit-wide range so it still exports (as black).
    pub fn auto_range(field: &TerrainField) -> Self {
        let (min, max) = field.height_range();
        Self {
            min_height: min,
            max_height: if max > min { max } else { min + 1.0 },
            ..Default::default()
        }
    }
}

/// Maps `height` into `[0, 65535]` over `[min, max]`.
pub(crate) fn quantize_u16(height: f32, min: f32, range: f32) -> u16 {
    let normalized = ((height - min) / range).clamp(0.0, 1.0);
    (normalized * 65535.0) as u16
}

/// Exports a terrain field as a 16-bit grayscale PNG, one pixel per cell.
///
/// Row `z` of the field becomes image row `z`.
pub fn export_field_png(
    field: &TerrainField,
    path: &Path,
    options: &PngExportOptions,
) -> Result<(), PngExportError> {
    let min = options.min_height;
    let max = options.max_height;

    if !(min < max) {
        return Err(PngExportError::InvalidHeightRange(min, max));
    }

    let range = max - min;
    let img: ImageBuffer<Luma<u16>, Vec<u16>> = ImageBuffer::from_fn(field.width, field.length, |x, z| {
        Luma([quantize_u16(field.get_height(x, z), min, range)])
    });

    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let encoder = PngEncoder::new_with_quality(writer, options.compression, options.filter);

    // The encoder takes native-endian bytes for L16.
    let byte_slice: &[u8] = bytemuck::cast_slice(img.as_raw());
    encoder.write_image(byte_slice, field.width, field.length, image::ExtendedColorType::L16)?;

    tracing::debug!(path = %path.display(), min, max, "heightmap png written");
    Ok(())
}
