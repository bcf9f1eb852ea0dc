//! Biome preview map export.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ImageBuffer, ImageEncoder, Rgb};
use thiserror::Error;

use crate::terrain::TerrainField;

/// Errors that can occur during biome map export.
#[derive(Error, Debug)]
pub enum BiomeMapError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),
}

/// Options for biome map export.
#[derive(Debug, Clone)]
pub struct BiomeMapOptions {
    pub compression: CompressionType,
    pub filter: FilterType,
    /// Cells at or below this height are painted with `water_color`.
    /// `None` paints every cell with its biome color.
    pub sea_level: Option<f32>,
    pub water_color: [u8; 3],
}

impl Default for BiomeMapOptions {
    fn default() -> Self {
        Self {
            compression: CompressionType::Default,
            filter: FilterType::Adaptive,
            sea_level: None,
            water_color: [15, 40, 90],
        }
    }
}

/// Exports the biome labels of a field as an RGB PNG, one pixel per cell.
pub fn export_biome_map_png(
    field: &TerrainField,
    path: &Path,
    options: &BiomeMapOptions,
) -> Result<(), BiomeMapError> {
    let img: ImageBuffer<Rgb<u8>, Vec<u8>> = ImageBuffer::from_fn(field.width, field.length, |x, z| {
        let cell = field.cell(x, z);
        match options.sea_level {
            Some(level) if cell.height <= level => Rgb(options.water_color),
            _ => Rgb(cell.biome.preview_rgb()),
        }
    });

    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let encoder = PngEncoder::new_with_quality(writer, options.compression, options.filter);
    encoder.write_image(img.as_raw(), field.width, field.length, image::ExtendedColorType::Rgb8)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::biomes::BiomeClass;
    use tempfile::tempdir;

    #[test]
    fn test_export_biome_map_colors() {
        let mut field = TerrainField::new(3, 2);
        field.biomes[1] = BiomeClass::Hills;
        field.biomes[2] = BiomeClass::Desert;
        field.heights = vec![-5.0, 4.0, 4.0, 4.0, 4.0, 4.0];

        let dir = tempdir().unwrap();
        let path = dir.path().join("biomes.png");
        let options = BiomeMapOptions {
            sea_level: Some(0.0),
            ..Default::default()
        };
        export_biome_map_png(&field, &path, &options).unwrap();

        let img = image::open(&path).unwrap().into_rgb8();
        assert_eq!(img.dimensions(), (3, 2));
        assert_eq!(img.get_pixel(0, 0).0, options.water_color);
        assert_eq!(img.get_pixel(1, 0).0, BiomeClass::Hills.preview_rgb());
        assert_eq!(img.get_pixel(2, 0).0, BiomeClass::Desert.preview_rgb());
        assert_eq!(img.get_pixel(0, 1).0, BiomeClass::Plains.preview_rgb());
    }
}
