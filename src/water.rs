//! Live sea and wave parameters owned by the render loop.
//!
//! Wave displacement itself runs in the water shader; this module only keeps
//! the values the shader reads in range and reports when they change, so the
//! caller re-uploads uniforms and re-levels the plane mesh only on edits.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::mesh::Mesh;

pub const SEA_LEVEL_RANGE: RangeInclusive<f32> = -25.0..=10.0;
pub const FREQUENCY_RANGE: RangeInclusive<f32> = 0.0..=1.0;
pub const AMPLITUDE_RANGE: RangeInclusive<f32> = 0.0..=2.0;
pub const WAVE_SPEED_RANGE: RangeInclusive<f32> = 0.0..=0.01;
pub const WAVE_COUNT_RANGE: RangeInclusive<u32> = 1..=10;

/// Sea surface settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeaSettings {
    /// Height of the water plane.
    pub sea_level: f32,
    /// Spatial frequency of the wave sum.
    pub frequency: f32,
    /// Peak displacement of a single wave.
    pub amplitude: f32,
    /// Phase advance per time unit.
    pub wave_speed: f32,
    /// Number of summed wave functions.
    pub wave_count: u32,
}

impl Default for SeaSettings {
    fn default() -> Self {
        Self {
            sea_level: 0.0,
            frequency: 0.2,
            amplitude: 0.5,
            wave_speed: 0.001,
            wave_count: 4,
        }
    }
}

fn clamp_range(value: f32, range: &RangeInclusive<f32>) -> f32 {
    if value.is_nan() {
        return *range.start();
    }
    value.clamp(*range.start(), *range.end())
}

impl SeaSettings {
    /// Returns a copy with every field clamped into its slider range.
    /// NaN inputs snap to the lower bound.
    pub fn clamped(&self) -> Self {
        Self {
            sea_level: clamp_range(self.sea_level, &SEA_LEVEL_RANGE),
            frequency: clamp_range(self.frequency, &FREQUENCY_RANGE),
            amplitude: clamp_range(self.amplitude, &AMPLITUDE_RANGE),
            wave_speed: clamp_range(self.wave_speed, &WAVE_SPEED_RANGE),
            wave_count: self.wave_count.clamp(*WAVE_COUNT_RANGE.start(), *WAVE_COUNT_RANGE.end()),
        }
    }

    /// Stores `edited` (clamped) and returns true if anything changed.
    pub fn update(&mut self, edited: SeaSettings) -> bool {
        let next = edited.clamped();
        if next == *self {
            return false;
        }
        *self = next;
        true
    }

    /// Moves `plane` to the current sea level.
    pub fn apply_to_plane(&self, plane: &mut Mesh) {
        plane.set_level(self.sea_level);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::generate_plane;

    #[test]
    fn test_defaults_are_in_range() {
        let sea = SeaSettings::default();
        assert_eq!(sea.clamped(), sea);
    }

    #[test]
    fn test_update_reports_changes_only() {
        let mut sea = SeaSettings::default();
        assert!(!sea.update(SeaSettings::default()));

        let edited = SeaSettings { amplitude: 1.25, ..sea };
        assert!(sea.update(edited));
        assert_eq!(sea.amplitude, 1.25);
        assert!(!sea.update(edited));
    }

    #[test]
    fn test_update_clamps_out_of_range_values() {
        let mut sea = SeaSettings::default();
        let wild = SeaSettings {
            sea_level: -100.0,
            frequency: 3.0,
            amplitude: f32::NAN,
            wave_speed: -1.0,
            wave_count: 40,
        };
        assert!(sea.update(wild));
        assert_eq!(sea.sea_level, -25.0);
        assert_eq!(sea.frequency, 1.0);
        assert_eq!(sea.amplitude, 0.0);
        assert_eq!(sea.wave_speed, 0.0);
        assert_eq!(sea.wave_count, 10);

        // Clamped values equal to the stored ones are not a change.
        assert!(!sea.update(wild));
    }

    #[test]
    fn test_applies_level_to_plane() {
        let mut plane = generate_plane(4, 4, 0.0);
        let mut sea = SeaSettings::default();
        sea.update(SeaSettings { sea_level: 3.0, ..sea });
        sea.apply_to_plane(&mut plane);
        assert!(plane.vertices.iter().all(|v| v.position[1] == 3.0));
    }
}
