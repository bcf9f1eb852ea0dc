//! Generation stage trait and pipeline orchestration.

use std::time::Instant;

use thiserror::Error;

use crate::noise::{GradientNoise, NoiseSource};
use crate::terrain::{
    generate_biome_field, generate_heightmap, smooth_heights, ConfigError, TerrainField, TerrainSettings,
};

/// Unique identifier for generation stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageId {
    /// Biome noise sampling and labelling.
    BiomeField,
    /// Fractal synthesis with biome blending and border falloff.
    Heightmap,
    /// Neighbor-averaging post-process.
    Smoothing,
}

impl StageId {
    /// Returns the name of the stage.
    pub fn name(&self) -> &'static str {
        match self {
            StageId::BiomeField => "biome_field",
            StageId::Heightmap => "heightmap",
            StageId::Smoothing => "smoothing",
        }
    }
}

/// Inputs shared by every stage of a run.
#[derive(Clone, Copy)]
pub struct StageConfig<'a> {
    pub settings: &'a TerrainSettings,
    pub noise: &'a dyn NoiseSource,
}

impl<'a> StageConfig<'a> {
    pub fn new(settings: &'a TerrainSettings, noise: &'a dyn NoiseSource) -> Self {
        Self { settings, noise }
    }
}

/// Errors that can occur during pipeline execution.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),
    #[error("Stage '{0}' failed: {1}")]
    StageFailed(String, String),
    #[error("Missing dependency: stage '{0}' requires '{1}'")]
    MissingDependency(String, String),
}

/// Error type of the top-level generation entry points.
pub type TerrainError = PipelineError;

/// Trait for implementing generation stages.
///
/// Each stage transforms the field in place, building upon previous stages.
pub trait GenerationStage: Send + Sync {
    /// Returns the unique identifier for this stage.
    fn id(&self) -> StageId;

    /// Returns a human-readable name for the stage.
    fn name(&self) -> &str;

    /// Returns the stage IDs that must be executed before this stage.
    fn dependencies(&self) -> &[StageId] {
        &[]
    }

    /// Executes the generation stage, modifying the field in place.
    fn execute(&self, field: &mut TerrainField, config: &StageConfig<'_>) -> Result<(), PipelineError>;
}

/// Orchestrates multiple generation stages into a complete pipeline.
#[derive(Default)]
pub struct Pipeline {
    stages: Vec<Box<dyn GenerationStage>>,
}

impl Pipeline {
    /// Creates a new empty pipeline.
    pub fn new() -> Self {
        Self { stages: Vec::new() }
    }

    /// Biome field, heightmap, then smoothing.
    pub fn standard() -> Self {
        let mut pipeline = Self::new();
        pipeline
            .add_stage(BiomeFieldStage)
            .add_stage(HeightmapStage)
            .add_stage(SmoothingStage);
        pipeline
    }

    /// Adds a stage to the pipeline.
    pub fn add_stage<S: GenerationStage + 'static>(&mut self, stage: S) -> &mut Self {
        self.stages.push(Box::new(stage));
        self
    }

    /// Returns the number of stages in the pipeline.
    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    /// Executes all stages in order on the given field.
    pub fn run(&self, field: &mut TerrainField, config: &StageConfig<'_>) -> Result<(), PipelineError> {
        self.run_with_callbacks(field, config, |_, _, _| {}, |_, _, _| {})
    }

    /// Executes all stages with progress callbacks.
    ///
    /// # Arguments
    /// * `on_stage_start` - Called when each stage begins
    /// * `on_stage_complete` - Called when each stage finishes
    pub fn run_with_callbacks<F1, F2>(
        &self,
        field: &mut TerrainField,
        config: &StageConfig<'_>,
        mut on_stage_start: F1,
        mut on_stage_complete: F2,
    ) -> Result<(), PipelineError>
    where
        F1: FnMut(&str, usize, usize),
        F2: FnMut(&str, usize, usize),
    {
        let total = self.stages.len();
        let mut completed: Vec<StageId> = Vec::new();

        for (i, stage) in self.stages.iter().enumerate() {
            on_stage_start(stage.name(), i, total);

            for dep in stage.dependencies() {
                if !completed.contains(dep) {
                    return Err(PipelineError::MissingDependency(
                        stage.name().to_string(),
                        dep.name().to_string(),
                    ));
                }
            }

            let start = Instant::now();
            stage.execute(field, config)?;
            tracing::debug!(stage = stage.id().name(), elapsed = ?start.elapsed(), "stage complete");
            completed.push(stage.id());

            on_stage_complete(stage.name(), i, total);
        }

        Ok(())
    }
}

/// Samples biome noise and assigns biome labels.
pub struct BiomeFieldStage;

impl GenerationStage for BiomeFieldStage {
    fn id(&self) -> StageId {
        StageId::BiomeField
    }

    fn name(&self) -> &str {
        "Biome Field"
    }

    fn execute(&self, field: &mut TerrainField, config: &StageConfig<'_>) -> Result<(), PipelineError> {
        generate_biome_field(field, config.noise, config.settings);
        Ok(())
    }
}

/// Synthesizes heights from the biome field.
pub struct HeightmapStage;

impl GenerationStage for HeightmapStage {
    fn id(&self) -> StageId {
        StageId::Heightmap
    }

    fn name(&self) -> &str {
        "Heightmap Generation"
    }

    fn dependencies(&self) -> &[StageId] {
        &[StageId::BiomeField]
    }

    fn execute(&self, field: &mut TerrainField, config: &StageConfig<'_>) -> Result<(), PipelineError> {
        let clamped = generate_heightmap(field, config.noise, config.settings);
        if clamped > 0 {
            tracing::warn!(cells = clamped, "non-finite heights clamped to baseline");
        }
        field.anomalies += clamped;
        Ok(())
    }
}

/// Runs the configured number of smoothing passes.
pub struct SmoothingStage;

impl GenerationStage for SmoothingStage {
    fn id(&self) -> StageId {
        StageId::Smoothing
    }

    fn name(&self) -> &str {
        "Smoothing"
    }

    fn dependencies(&self) -> &[StageId] {
        &[StageId::Heightmap]
    }

    fn execute(&self, field: &mut TerrainField, config: &StageConfig<'_>) -> Result<(), PipelineError> {
        let passes = config.settings.shaping.smoothing_passes;
        let baseline = config.settings.generation.sea_level;
        field.heights = smooth_heights(&field.heights, field.width, field.length, passes);

        let mut clamped = 0usize;
        for height in field.heights.iter_mut().filter(|h| !h.is_finite()) {
            *height = baseline;
            clamped += 1;
        }
        if clamped > 0 {
            tracing::warn!(cells = clamped, "non-finite smoothed heights clamped to baseline");
        }
        field.anomalies += clamped;
        Ok(())
    }
}

/// Generates a terrain field with the default gradient noise.
pub fn generate_terrain(settings: &TerrainSettings) -> Result<TerrainField, TerrainError> {
    generate_terrain_with(&GradientNoise::default(), settings)
}

/// Generates a terrain field using `noise` as the gradient primitive.
///
/// Settings are validated up front; an invalid configuration returns an error
/// and no field.
pub fn generate_terrain_with(noise: &dyn NoiseSource, settings: &TerrainSettings) -> Result<TerrainField, TerrainError> {
    settings.validate()?;

    let generation = &settings.generation;
    if settings.shaping.attenuates_everywhere(generation.width, generation.length) {
        tracing::warn!(
            width = generation.width,
            length = generation.length,
            border = settings.shaping.border_threshold,
            "grid is too small to escape border falloff; no cell reaches full height"
        );
    }

    let start = Instant::now();
    let mut field = TerrainField::new(generation.width, generation.length);
    Pipeline::standard().run(&mut field, &StageConfig::new(settings, noise))?;

    tracing::debug!(
        width = field.width,
        length = field.length,
        elapsed = ?start.elapsed(),
        "terrain generated"
    );
    Ok(field)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::GenerationConfig;

    fn small(seed: f32) -> TerrainSettings {
        TerrainSettings::new(GenerationConfig {
            width: 4,
            length: 4,
            scale: 10.0,
            seed,
            octaves: 1,
            sea_level: 0.0,
        })
    }

    #[test]
    fn test_standard_pipeline_has_three_stages() {
        assert_eq!(Pipeline::standard().stage_count(), 3);
    }

    #[test]
    fn test_small_grid_end_to_end() {
        let field = generate_terrain(&small(0.0)).unwrap();
        assert_eq!(field.cell_count(), 16);
        assert_eq!(field.biomes.len(), 16);
        assert!(field.heights.iter().all(|h| h.is_finite()));
        assert_eq!(field.anomalies, 0);
    }

    #[test]
    fn test_generation_is_deterministic() {
        let a = generate_terrain(&small(0.0)).unwrap();
        let b = generate_terrain(&small(0.0)).unwrap();
        assert_eq!(a.heights, b.heights);
        assert_eq!(a.biomes, b.biomes);
    }

    #[test]
    fn test_seed_changes_the_field() {
        let a = generate_terrain(&small(0.0)).unwrap();
        let b = generate_terrain(&small(1.0)).unwrap();
        assert_ne!(a.biome_noise, b.biome_noise);
        assert_ne!(a.heights, b.heights);
    }

    #[test]
    fn test_larger_grid_has_relief() {
        let mut settings = small(3.0);
        settings.generation.width = 128;
        settings.generation.length = 96;
        settings.generation.octaves = 4;
        let field = generate_terrain(&settings).unwrap();

        assert_eq!(field.cell_count(), 128 * 96);
        let (min, max) = field.height_range();
        assert!(min < max);
        assert!(max.abs() <= 100.0 && min.abs() <= 100.0);
    }

    #[test]
    fn test_default_field_mixes_biomes_and_relief() {
        let settings = TerrainSettings::default();
        let field = generate_terrain(&settings).unwrap();

        let labels = field.biome_histogram().iter().filter(|&&count| count > 0).count();
        assert!(labels >= 2, "histogram {:?}", field.biome_histogram());

        let (lo, hi) = field
            .biome_noise
            .iter()
            .fold((f32::MAX, f32::MIN), |(lo, hi), &v| (lo.min(v), hi.max(v)));
        assert!(hi - lo > 0.1, "biome noise only spans [{}, {}]", lo, hi);

        // Plains has the smallest height scale; real relief is a sizable share of it.
        let (min, max) = field.height_range();
        assert!(max - min > 0.3 * settings.biomes.plains.height_scale, "height range [{}, {}]", min, max);
    }

    #[test]
    fn test_invalid_config_returns_no_field() {
        let mut settings = small(0.0);
        settings.generation.scale = 0.0;
        let err = generate_terrain(&settings).unwrap_err();
        assert!(matches!(err, PipelineError::InvalidConfig(ConfigError::InvalidScale(_))));
    }

    #[test]
    fn test_stub_noise_produces_expected_interior() {
        // Constant noise 0.5: biome value 0.75 (fallback scale 50), raw height 0.5.
        let mut settings = small(0.0);
        settings.generation.width = 9;
        settings.generation.length = 9;
        settings.shaping.border_threshold = 2;
        settings.shaping.smoothing_passes = 0;
        let constant = |_: f32, _: f32, _: f32| 0.5f32;

        let field = generate_terrain_with(&constant, &settings).unwrap();
        assert_eq!(field.get_height(4, 4), 25.0);
        assert_eq!(field.get_height(0, 4), 0.0);
        assert!(field.biomes.iter().all(|&b| b == crate::biomes::BiomeClass::Desert));
    }

    #[test]
    fn test_overflowing_smoothing_is_clamped_not_failed() {
        let mut settings = small(0.0);
        settings.generation.width = 9;
        settings.generation.length = 9;
        settings.generation.sea_level = -1.0;
        settings.shaping.border_threshold = 2;
        settings.biomes.fallback.height_scale = 3e38;
        let constant = |_: f32, _: f32, _: f32| 0.5f32;

        let field = generate_terrain_with(&constant, &settings).unwrap();
        assert!(field.anomalies > 0);
        assert!(field.heights.iter().all(|h| h.is_finite()));
        assert_eq!(field.get_height(4, 4), -1.0);
    }

    #[test]
    fn test_smoothing_stage_flattens_spikes() {
        let mut settings = small(0.0);
        settings.shaping.smoothing_passes = 2;
        let noise = GradientNoise::default();
        let config = StageConfig::new(&settings, &noise);

        let mut field = TerrainField::new(5, 5);
        field.set_height(2, 2, 90.0);
        let mut pipeline = Pipeline::new();
        pipeline.add_stage(SmoothingStage);
        // Smoothing declares a dependency on the heightmap stage.
        assert!(matches!(
            pipeline.run(&mut field, &config),
            Err(PipelineError::MissingDependency(_, _))
        ));

        SmoothingStage.execute(&mut field, &config).unwrap();
        assert!(field.get_height(2, 2) < 90.0);
        assert!(field.get_height(0, 0) > 0.0);
    }

    #[test]
    fn test_callbacks_see_every_stage() {
        let settings = small(0.0);
        let noise = GradientNoise::default();
        let mut field = TerrainField::new(4, 4);
        let mut started = Vec::new();
        let mut finished = 0;

        Pipeline::standard()
            .run_with_callbacks(
                &mut field,
                &StageConfig::new(&settings, &noise),
                |name, _, total| {
                    assert_eq!(total, 3);
                    started.push(name.to_string());
                },
                |_, _, _| finished += 1,
            )
            .unwrap();

        assert_eq!(started, vec!["Biome Field", "Heightmap Generation", "Smoothing"]);
        assert_eq!(finished, 3);
    }
}
