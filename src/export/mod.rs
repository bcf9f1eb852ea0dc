//! Export module for saving terrain fields to disk.
//!
//! Supports 16-bit PNG for universal compatibility, RAW formats
//! for game engine imports, and RGB biome preview maps.

mod png;
mod raw;
mod biome_map;

pub use png::{export_field_png, PngExportError, PngExportOptions};
pub use raw::{export_field_raw, expected_file_size, RawExportError, RawFormat};
pub use biome_map::{export_biome_map_png, BiomeMapError, BiomeMapOptions};
