//! Pipeline module for orchestrating terrain generation stages.
//!
//! Provides a trait-based architecture for modular generation stages
//! that compose into the biome → heightmap → smoothing pipeline.

mod stage;

pub use stage::{
    generate_terrain, generate_terrain_with, BiomeFieldStage, GenerationStage, HeightmapStage, Pipeline,
    PipelineError, SmoothingStage, StageConfig, StageId, TerrainError,
};
