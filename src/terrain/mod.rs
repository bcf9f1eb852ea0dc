//! Terrain generation module.
//!
//! Provides the [`TerrainField`] grid plus the per-phase operations the
//! generation pipeline is built from: biome field sampling, fractal height
//! synthesis, border falloff and smoothing.

mod config;
mod falloff;
mod field;
mod heightmap;
mod smooth;

pub use config::{ConfigError, GenerationConfig, SettingsError, ShapingConfig, TerrainSettings};
pub use falloff::falloff;
pub use field::{world_xz, TerrainCell, TerrainField};
pub use heightmap::{generate_biome_field, generate_heightmap, sample_biome_noise, synthesize_height};
pub use smooth::smooth_heights;
