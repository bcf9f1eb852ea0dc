//! Biome-blended procedural terrain with a flat water plane.
//!
//! A low-frequency biome noise field selects fuzzy-blended fractal
//! parameters per cell; heights are synthesized with fBm, attenuated toward
//! the grid border and smoothed. The result feeds an indexed triangle mesh,
//! alongside a flat water plane whose level and wave uniforms live in
//! [`SeaSettings`].

pub mod noise;
pub mod biomes;
pub mod terrain;
pub mod pipeline;
pub mod mesh;
pub mod water;
pub mod background;
pub mod export;

pub use noise::{FractalNoiseConfig, GradientNoise, NoiseSource};
pub use biomes::{BiomeClass, BiomeConfig, BiomeParameters};
pub use terrain::{GenerationConfig, ShapingConfig, TerrainField, TerrainSettings};
pub use pipeline::{generate_terrain, generate_terrain_with, GenerationStage, Pipeline, StageConfig, TerrainError};
pub use mesh::{build_indices, generate_plane, Mesh, Vertex};
pub use water::SeaSettings;
pub use background::{BackgroundGenerator, GenerationResult};
