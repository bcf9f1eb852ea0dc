//! Multi-octave fractal Brownian motion (fBm) noise generation.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::NoiseSource;

/// Configuration for multi-octave fractal noise generation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FractalNoiseConfig {
    /// Number of noise octaves.
    pub octaves: u32,
    /// Base frequency of the first octave.
    pub frequency: f32,
    /// Frequency multiplier per octave.
    pub lacunarity: f32,
    /// Amplitude decay per octave.
    pub persistence: f32,
}

impl Default for FractalNoiseConfig {
    fn default() -> Self {
        Self {
            octaves: 4,
            frequency: 1.0,
            lacunarity: 2.0,
            persistence: 0.5,
        }
    }
}

/// Samples fractal noise at a 3D position.
///
/// Octave `o` samples `pos * frequency * lacunarity^o` with amplitude
/// `persistence^o`. The sum is divided by the accumulated amplitude, so the
/// result stays within the source's `[-1, 1]` range.
///
/// Returns `0.0` when `config.octaves == 0`.
pub fn sample_fractal_noise(noise: &dyn NoiseSource, pos: Vec3, config: &FractalNoiseConfig) -> f32 {
    let mut total = 0.0f32;
    let mut amplitude = 1.0f32;
    let mut max_amplitude = 0.0f32;

    for octave in 0..config.octaves {
        let frequency = config.frequency * config.lacunarity.powi(octave as i32);
        let p = pos * frequency;

        total += noise.noise3(p.x, p.y, p.z) * amplitude;
        max_amplitude += amplitude;
        amplitude *= config.persistence;
    }

    if max_amplitude > 0.0 {
        total / max_amplitude
    } else {
        0.0
    }
}
