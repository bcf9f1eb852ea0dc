//! Per-cell biome noise and fractal height synthesis.

use glam::Vec3;
use rayon::prelude::*;

use crate::biomes::{classify, resolve_biome_parameters, BiomeParameters};
use crate::noise::{sample_fractal_noise, NoiseSource};
use super::config::{GenerationConfig, TerrainSettings};
use super::falloff::falloff;
use super::field::{world_xz, TerrainField};

/// Biome blend position in `[0, 1]` for cell `(x, z)`.
///
/// Samples at four times the terrain scale so biomes change far more slowly
/// than the terrain itself.
pub fn sample_biome_noise(noise: &dyn NoiseSource, x: u32, z: u32, config: &GenerationConfig) -> f32 {
    let (world_x, world_z) = world_xz(x, z, config.width, config.length);
    let biome_scale = config.scale * 4.0;
    let v = noise.noise3(world_x / biome_scale, config.seed * 0.1, world_z / biome_scale);
    ((v + 1.0) * 0.5).clamp(0.0, 1.0)
}

/// Amplitude-normalized fractal height for cell `(x, z)`, before the biome
/// height scale and border falloff are applied.
pub fn synthesize_height(
    noise: &dyn NoiseSource,
    x: u32,
    z: u32,
    config: &GenerationConfig,
    params: &BiomeParameters,
) -> f32 {
    let (world_x, world_z) = world_xz(x, z, config.width, config.length);
    let pos = Vec3::new(world_x / config.scale, config.seed * 0.5, world_z / config.scale);
    sample_fractal_noise(noise, pos, &params.fractal(config.octaves))
}

/// Fills `biome_noise` and `biomes` for every cell, one rayon task per row.
pub fn generate_biome_field(field: &mut TerrainField, noise: &dyn NoiseSource, settings: &TerrainSettings) {
    let config = &settings.generation;
    let width = field.width as usize;

    field
        .biome_noise
        .par_chunks_mut(width)
        .zip(field.biomes.par_chunks_mut(width))
        .enumerate()
        .for_each(|(z, (noise_row, biome_row))| {
            for (x, (value, biome)) in noise_row.iter_mut().zip(biome_row.iter_mut()).enumerate() {
                *value = sample_biome_noise(noise, x as u32, z as u32, config);
                *biome = classify(*value, &settings.biomes);
            }
        });
}

/// Fills `heights` from the biome field: resolve parameters, synthesize,
/// scale and attenuate toward the border.
///
/// Non-finite results are clamped to the baseline. Returns how many cells
/// needed clamping.
pub fn generate_heightmap(field: &mut TerrainField, noise: &dyn NoiseSource, settings: &TerrainSettings) -> usize {
    let config = &settings.generation;
    let border = settings.shaping.border_threshold;
    let (width, length) = (field.width, field.length);

    field
        .heights
        .par_chunks_mut(width as usize)
        .zip(field.biome_noise.par_chunks(width as usize))
        .enumerate()
        .map(|(z, (height_row, noise_row))| {
            let z = z as u32;
            let mut clamped = 0usize;
            for (x, (height, &biome_value)) in height_row.iter_mut().zip(noise_row).enumerate() {
                let x = x as u32;
                let params = resolve_biome_parameters(biome_value, &settings.biomes);
                let raw = synthesize_height(noise, x, z, config, &params);
                let shaped = raw * params.height_scale * falloff(x, z, width, length, config.sea_level, border);

                *height = if shaped.is_finite() {
                    shaped
                } else {
                    clamped += 1;
                    config.sea_level
                };
            }
            clamped
        })
        .sum()
}
