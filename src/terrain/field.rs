//! The generated height/biome grid.

use serde::{Deserialize, Serialize};

use crate::biomes::BiomeClass;

/// One grid cell of a [`TerrainField`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TerrainCell {
    pub height: f32,
    pub biome: BiomeClass,
}

/// A `width x length` row-major grid of heights and biome labels.
///
/// Cell `(x, z)` lives at index `z * width + x`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerrainField {
    pub width: u32,
    pub length: u32,
    /// Final heights in world units.
    pub heights: Vec<f32>,
    /// Discrete biome label per cell.
    pub biomes: Vec<BiomeClass>,
    /// Biome noise scalar in `[0, 1]` that drove each cell's blend.
    pub biome_noise: Vec<f32>,
    /// Cells whose height was non-finite and got clamped to the baseline.
    pub anomalies: usize,
}

impl TerrainField {
    /// Creates a flat field of plains with all heights at 0.0.
    pub fn new(width: u32, length: u32) -> Self {
        let size = width as usize * length as usize;
        Self {
            width,
            length,
            heights: vec![0.0; size],
            biomes: vec![BiomeClass::Plains; size],
            biome_noise: vec![0.0; size],
            anomalies: 0,
        }
    }

    /// Returns the total number of cells.
    pub fn cell_count(&self) -> usize {
        self.heights.len()
    }

    #[inline]
    pub fn index(&self, x: u32, z: u32) -> usize {
        z as usize * self.width as usize + x as usize
    }

    pub fn get_height(&self, x: u32, z: u32) -> f32 {
        self.heights[self.index(x, z)]
    }

    pub fn set_height(&mut self, x: u32, z: u32, height: f32) {
        let i = self.index(x, z);
        self.heights[i] = height;
    }

    pub fn cell(&self, x: u32, z: u32) -> TerrainCell {
        let i = self.index(x, z);
        TerrainCell {
            height: self.heights[i],
            biome: self.biomes[i],
        }
    }

    /// Iterates cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = TerrainCell> + '_ {
        self.heights
            .iter()
            .zip(self.biomes.iter())
            .map(|(&height, &biome)| TerrainCell { height, biome })
    }

    /// World-space `(x, z)` of a cell, centered on the grid origin.
    pub fn world_xz(&self, x: u32, z: u32) -> (f32, f32) {
        world_xz(x, z, self.width, self.length)
    }

    /// Computes the min and max height values.
    pub fn height_range(&self) -> (f32, f32) {
        let mut min = f32::MAX;
        let mut max = f32::MIN;

        for &height in &self.heights {
            min = min.min(height);
            max = max.max(height);
        }

        (min, max)
    }

    /// Number of cells carrying each biome label, indexed by `BiomeClass::as_u8`.
    pub fn biome_histogram(&self) -> [usize; 4] {
        let mut counts = [0usize; 4];
        for biome in &self.biomes {
            counts[biome.as_u8() as usize] += 1;
        }
        counts
    }
}

/// World-space `(x, z)` of grid cell `(x, z)` on a `width x length` grid.
#[inline]
pub fn world_xz(x: u32, z: u32, width: u32, length: u32) -> (f32, f32) {
    (x as f32 - width as f32 / 2.0, z as f32 - length as f32 / 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_field_is_flat() {
        let field = TerrainField::new(8, 4);
        assert_eq!(field.cell_count(), 32);
        assert_eq!(field.height_range(), (0.0, 0.0));
        assert_eq!(field.biome_histogram(), [32, 0, 0, 0]);
    }

    #[test]
    fn test_indexing_is_row_major() {
        let mut field = TerrainField::new(5, 3);
        field.set_height(4, 2, 7.5);
        assert_eq!(field.heights[2 * 5 + 4], 7.5);
        assert_eq!(field.get_height(4, 2), 7.5);
        assert_eq!(field.cell(4, 2).height, 7.5);
    }

    #[test]
    fn test_world_coordinates_are_centered() {
        assert_eq!(world_xz(0, 0, 4, 6), (-2.0, -3.0));
        assert_eq!(world_xz(3, 5, 4, 6), (1.0, 2.0));
        assert_eq!(world_xz(1, 1, 3, 3), (-0.5, -0.5));
    }
}
