//! Noise generation module for terrain synthesis.
//!
//! The gradient primitive is an injected [`NoiseSource`] so the generation
//! pipeline can run against simdnoise in production and a deterministic stub
//! in tests.

mod fractal;
mod source;

pub use fractal::{FractalNoiseConfig, sample_fractal_noise};
pub use source::{GradientNoise, NoiseSource};
