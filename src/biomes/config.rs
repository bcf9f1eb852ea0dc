//! Biome blending and labelling configuration.

use serde::{Deserialize, Serialize};

use super::BiomeParameters;

/// A triangular fuzzy membership band: 0 outside `[start, end]`, rising
/// linearly to 1 at `peak`, then falling back to 0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MembershipBand {
    pub start: f32,
    pub peak: f32,
    pub end: f32,
}

impl MembershipBand {
    pub const fn new(start: f32, peak: f32, end: f32) -> Self {
        Self { start, peak, end }
    }

    /// A band is usable when `start < peak < end` and all bounds are finite.
    pub fn is_well_formed(&self) -> bool {
        self.start.is_finite()
            && self.peak.is_finite()
            && self.end.is_finite()
            && self.start < self.peak
            && self.peak < self.end
    }
}

/// Configuration for biome parameter blending and per-cell labels.
///
/// The blend uses three bands (plains, hills, mountains) while the discrete
/// label uses its own two thresholds. The two sets disagree: with the default
/// `mountain_label = false`, every value at or above `hills_below` is labelled
/// `Desert` even though the blend treats the top of the range as mountains.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BiomeConfig {
    pub plains_band: MembershipBand,
    pub hills_band: MembershipBand,
    pub mountains_band: MembershipBand,

    pub plains: BiomeParameters,
    pub hills: BiomeParameters,
    pub mountains: BiomeParameters,
    /// Returned when a value falls outside every band.
    pub fallback: BiomeParameters,

    /// Values below this are labelled `Plains`.
    pub plains_below: f32,
    /// Values below this (and not plains) are labelled `Hills`.
    pub hills_below: f32,
    /// Label the top range `Mountains` instead of `Desert`.
    pub mountain_label: bool,
}

impl Default for BiomeConfig {
    fn default() -> Self {
        Self {
            plains_band: MembershipBand::new(0.0, 0.25, 0.5),
            hills_band: MembershipBand::new(0.5, 0.625, 0.75),
            mountains_band: MembershipBand::new(0.75, 0.875, 1.0),

            plains: BiomeParameters::new(30.0, 0.8, 0.4, 1.5),
            hills: BiomeParameters::new(60.0, 1.2, 0.5, 2.0),
            mountains: BiomeParameters::new(100.0, 1.5, 0.6, 2.5),
            fallback: BiomeParameters::new(50.0, 1.0, 0.5, 2.0),

            plains_below: 0.3,
            hills_below: 0.55,
            mountain_label: false,
        }
    }
}
