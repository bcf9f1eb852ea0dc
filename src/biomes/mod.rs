//! Biome classification and fuzzy parameter blending.
//!
//! A low-frequency biome noise value in `[0, 1]` drives two things per cell:
//! - a blended set of fractal parameters, from triangular membership in the
//!   plains, hills and mountains bands
//! - a discrete [`BiomeClass`] label, from fixed thresholds

mod config;

pub use config::{BiomeConfig, MembershipBand};

use serde::{Deserialize, Serialize};

use crate::noise::FractalNoiseConfig;

/// Biome classification label. `as_u8()` is stable and used for storage/export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BiomeClass {
    Plains = 0,
    Hills = 1,
    /// Only assigned when `BiomeConfig::mountain_label` is set.
    Mountains = 2,
    Desert = 3,
}

impl BiomeClass {
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn from_u8(id: u8) -> Option<Self> {
        match id {
            0 => Some(BiomeClass::Plains),
            1 => Some(BiomeClass::Hills),
            2 => Some(BiomeClass::Mountains),
            3 => Some(BiomeClass::Desert),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            BiomeClass::Plains => "plains",
            BiomeClass::Hills => "hills",
            BiomeClass::Mountains => "mountains",
            BiomeClass::Desert => "desert",
        }
    }

    /// RGB preview color for this biome.
    pub fn preview_rgb(self) -> [u8; 3] {
        match self {
            BiomeClass::Plains => [130, 180, 90],
            BiomeClass::Hills => [60, 120, 60],
            BiomeClass::Mountains => [140, 140, 140],
            BiomeClass::Desert => [220, 205, 140],
        }
    }
}

/// Terrain shaping parameters for one cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BiomeParameters {
    pub height_scale: f32,
    pub frequency: f32,
    pub persistence: f32,
    pub lacunarity: f32,
}

impl BiomeParameters {
    pub const fn new(height_scale: f32, frequency: f32, persistence: f32, lacunarity: f32) -> Self {
        Self {
            height_scale,
            frequency,
            persistence,
            lacunarity,
        }
    }

    /// All four values are finite and non-negative.
    pub fn is_valid(&self) -> bool {
        [self.height_scale, self.frequency, self.persistence, self.lacunarity]
            .iter()
            .all(|v| v.is_finite() && *v >= 0.0)
    }

    /// Fractal settings for sampling `octaves` layers with these parameters.
    pub fn fractal(&self, octaves: u32) -> FractalNoiseConfig {
        FractalNoiseConfig {
            octaves,
            frequency: self.frequency,
            lacunarity: self.lacunarity,
            persistence: self.persistence,
        }
    }
}

/// Degree (0..1) to which `value` belongs to `band`.
pub fn membership(value: f32, band: &MembershipBand) -> f32 {
    if value < band.start || value > band.end {
        return 0.0;
    }
    if value < band.peak {
        return (value - band.start) / (band.peak - band.start);
    }
    (band.end - value) / (band.end - band.peak)
}

/// Blends the plains, hills and mountains parameter sets by membership.
///
/// Falls back to `cfg.fallback` when `value` lies outside every band, which
/// includes the exact band boundaries where every membership is zero.
pub fn resolve_biome_parameters(value: f32, cfg: &BiomeConfig) -> BiomeParameters {
    let weights = [
        (membership(value, &cfg.plains_band), &cfg.plains),
        (membership(value, &cfg.hills_band), &cfg.hills),
        (membership(value, &cfg.mountains_band), &cfg.mountains),
    ];

    let total: f32 = weights.iter().map(|(w, _)| w).sum();
    if total <= 0.0 {
        return cfg.fallback;
    }

    let blend = |field: fn(&BiomeParameters) -> f32| -> f32 {
        weights.iter().map(|(w, p)| (w / total) * field(p)).sum()
    };

    BiomeParameters {
        height_scale: blend(|p| p.height_scale),
        frequency: blend(|p| p.frequency),
        persistence: blend(|p| p.persistence),
        lacunarity: blend(|p| p.lacunarity),
    }
}

/// Discrete biome label for a biome noise value.
pub fn classify(value: f32, cfg: &BiomeConfig) -> BiomeClass {
    if value < cfg.plains_below {
        BiomeClass::Plains
    } else if value < cfg.hills_below {
        BiomeClass::Hills
    } else if cfg.mountain_label {
        BiomeClass::Mountains
    } else {
        BiomeClass::Desert
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plains_peak_is_pure_plains() {
        let params = resolve_biome_parameters(0.25, &BiomeConfig::default());
        assert_eq!(params.height_scale, 30.0);
        assert_eq!(params.frequency, 0.8);
        assert_eq!(params.persistence, 0.4);
        assert_eq!(params.lacunarity, 1.5);
    }

    #[test]
    fn test_outside_all_bands_uses_fallback() {
        let cfg = BiomeConfig::default();
        assert_eq!(resolve_biome_parameters(1.5, &cfg), BiomeParameters::new(50.0, 1.0, 0.5, 2.0));
        assert_eq!(resolve_biome_parameters(-0.2, &cfg), cfg.fallback);
    }

    #[test]
    fn test_band_boundaries_fall_back() {
        // Adjacent bands meet at zero membership.
        let cfg = BiomeConfig::default();
        for v in [0.0, 0.5, 0.75, 1.0] {
            assert_eq!(resolve_biome_parameters(v, &cfg), cfg.fallback, "value {}", v);
        }
    }

    #[test]
    fn test_hills_and_mountain_peaks() {
        let cfg = BiomeConfig::default();
        assert_eq!(resolve_biome_parameters(0.625, &cfg).height_scale, 60.0);
        assert_eq!(resolve_biome_parameters(0.875, &cfg).height_scale, 100.0);
    }

    #[test]
    fn test_membership_is_triangular() {
        let band = MembershipBand::new(0.0, 0.25, 0.5);
        assert_eq!(membership(-0.1, &band), 0.0);
        assert_eq!(membership(0.0, &band), 0.0);
        assert!((membership(0.125, &band) - 0.5).abs() < 1e-6);
        assert_eq!(membership(0.25, &band), 1.0);
        assert!((membership(0.375, &band) - 0.5).abs() < 1e-6);
        assert_eq!(membership(0.5, &band), 0.0);
        assert_eq!(membership(0.6, &band), 0.0);
    }

    #[test]
    fn test_memberships_and_blends_stay_in_range() {
        let cfg = BiomeConfig::default();
        for i in 0..=400 {
            let v = -0.5 + i as f32 * 0.005;
            for band in [&cfg.plains_band, &cfg.hills_band, &cfg.mountains_band] {
                let m = membership(v, band);
                assert!((0.0..=1.0).contains(&m), "membership {} at {}", m, v);
            }
            let p = resolve_biome_parameters(v, &cfg);
            assert!(
                p.height_scale >= 30.0 - 1e-4 && p.height_scale <= 100.0 + 1e-4,
                "height scale {} at {}",
                p.height_scale,
                v
            );
        }
    }

    #[test]
    fn test_labels_use_their_own_thresholds() {
        let cfg = BiomeConfig::default();
        assert_eq!(classify(0.1, &cfg), BiomeClass::Plains);
        assert_eq!(classify(0.29, &cfg), BiomeClass::Plains);
        assert_eq!(classify(0.3, &cfg), BiomeClass::Hills);
        assert_eq!(classify(0.54, &cfg), BiomeClass::Hills);
        assert_eq!(classify(0.55, &cfg), BiomeClass::Desert);
        assert_eq!(classify(0.95, &cfg), BiomeClass::Desert);
    }

    #[test]
    fn test_mountain_label_replaces_desert() {
        let cfg = BiomeConfig { mountain_label: true, ..Default::default() };
        assert_eq!(classify(0.9, &cfg), BiomeClass::Mountains);
        assert_eq!(classify(0.2, &cfg), BiomeClass::Plains);
    }

    #[test]
    fn test_parameter_validity() {
        let cfg = BiomeConfig::default();
        for params in [cfg.plains, cfg.hills, cfg.mountains, cfg.fallback] {
            assert!(params.is_valid());
        }
        assert!(!BiomeParameters::new(-7.0, 1.0, 0.5, 2.0).is_valid());
        assert!(!BiomeParameters::new(30.0, f32::NAN, 0.5, 2.0).is_valid());
        assert!(!BiomeParameters::new(30.0, 1.0, 0.5, f32::INFINITY).is_valid());
    }

    #[test]
    fn test_ids_are_stable() {
        for class in [BiomeClass::Plains, BiomeClass::Hills, BiomeClass::Mountains, BiomeClass::Desert] {
            assert_eq!(BiomeClass::from_u8(class.as_u8()), Some(class));
        }
        assert_eq!(BiomeClass::from_u8(9), None);
    }
}
