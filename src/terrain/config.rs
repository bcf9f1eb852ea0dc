//! Generation settings and their validation.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::biomes::BiomeConfig;

/// Errors detected when validating settings before generation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Grid must be at least 2x2, got {width}x{length}")]
    GridTooSmall { width: u32, length: u32 },
    #[error("Grid {width}x{length} has more vertices than a u32 index buffer can address")]
    GridTooLarge { width: u32, length: u32 },
    #[error("Scale must be finite and non-zero, got {0}")]
    InvalidScale(f32),
    #[error("Octave count must be at least 1")]
    NoOctaves,
    #[error("'{name}' must be finite, got {value}")]
    NonFinite { name: &'static str, value: f32 },
    #[error("Border threshold must be at least 1 cell")]
    ZeroBorder,
    #[error("Membership band '{0}' must satisfy start < peak < end")]
    MalformedBand(&'static str),
    #[error("Biome parameters '{0}' must be finite and non-negative")]
    InvalidBiomeParameters(&'static str),
}

/// Errors that can occur while loading a settings file.
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to read settings: {0}")]
    Read(#[from] std::io::Error),
    #[error("Failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Inputs of a single generation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Grid cells along x.
    pub width: u32,
    /// Grid cells along z.
    pub length: u32,
    /// World units per noise unit. Larger values stretch the terrain.
    pub scale: f32,
    /// Offsets the noise along its y axis, so fractional seeds are meaningful.
    pub seed: f32,
    /// Fractal octaves per cell.
    pub octaves: u32,
    /// Plays two roles. As a unitless multiplier it is the falloff baseline,
    /// the factor applied to heights at the grid border. As a world-space
    /// height it is the value non-finite cells are clamped to and the level
    /// below which biome maps paint water.
    pub sea_level: f32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            width: 256,
            length: 256,
            scale: 50.0,
            seed: 0.0,
            octaves: 4,
            sea_level: 0.0,
        }
    }
}

impl GenerationConfig {
    /// Number of grid cells.
    pub fn cell_count(&self) -> usize {
        self.width as usize * self.length as usize
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width < 2 || self.length < 2 {
            return Err(ConfigError::GridTooSmall { width: self.width, length: self.length });
        }
        if self.width as u64 * self.length as u64 > u32::MAX as u64 {
            return Err(ConfigError::GridTooLarge { width: self.width, length: self.length });
        }
        if !self.scale.is_finite() || self.scale == 0.0 {
            return Err(ConfigError::InvalidScale(self.scale));
        }
        if self.octaves == 0 {
            return Err(ConfigError::NoOctaves);
        }
        if !self.seed.is_finite() {
            return Err(ConfigError::NonFinite { name: "seed", value: self.seed });
        }
        if !self.sea_level.is_finite() {
            return Err(ConfigError::NonFinite { name: "sea_level", value: self.sea_level });
        }
        Ok(())
    }
}

/// Post-processing constants applied to the height field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShapingConfig {
    /// Distance from the border (cells) at which falloff stops.
    pub border_threshold: u32,
    /// Neighbor-averaging passes run after synthesis.
    pub smoothing_passes: u32,
}

impl Default for ShapingConfig {
    fn default() -> Self {
        Self {
            border_threshold: 50,
            smoothing_passes: 3,
        }
    }
}

impl ShapingConfig {
    /// True when no cell of a `width x length` grid is far enough from the
    /// border to escape falloff.
    pub fn attenuates_everywhere(&self, width: u32, length: u32) -> bool {
        let reach = 2 * self.border_threshold as u64;
        (width as u64) <= reach || (length as u64) <= reach
    }
}

/// Everything `generate_terrain` needs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainSettings {
    pub generation: GenerationConfig,
    pub shaping: ShapingConfig,
    pub biomes: BiomeConfig,
}

impl TerrainSettings {
    pub fn new(generation: GenerationConfig) -> Self {
        Self {
            generation,
            ..Default::default()
        }
    }

    /// Loads settings from a JSON file. Missing fields take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, SettingsError> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    pub fn to_json_string(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.generation.validate()?;
        if self.shaping.border_threshold == 0 {
            return Err(ConfigError::ZeroBorder);
        }
        let bands = [
            ("plains", &self.biomes.plains_band),
            ("hills", &self.biomes.hills_band),
            ("mountains", &self.biomes.mountains_band),
        ];
        for (name, band) in bands {
            if !band.is_well_formed() {
                return Err(ConfigError::MalformedBand(name));
            }
        }
        let parameters = [
            ("plains", &self.biomes.plains),
            ("hills", &self.biomes.hills),
            ("mountains", &self.biomes.mountains),
            ("fallback", &self.biomes.fallback),
        ];
        for (name, params) in parameters {
            if !params.is_valid() {
                return Err(ConfigError::InvalidBiomeParameters(name));
            }
        }
        Ok(())
    }
}
