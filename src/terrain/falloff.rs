//! Border falloff toward the baseline level.

/// Height multiplier for cell `(x, z)` on a `width x length` grid.
///
/// Cells at least `border_threshold` cells from every edge get `1.0`. Closer
/// cells interpolate linearly from `baseline` at the edge to `1.0` at the
/// threshold. When either dimension is `<= 2 * border_threshold`, no cell
/// reaches `1.0`.
pub fn falloff(x: u32, z: u32, width: u32, length: u32, baseline: f32, border_threshold: u32) -> f32 {
    let left = x;
    let right = width.saturating_sub(1).saturating_sub(x);
    let top = z;
    let bottom = length.saturating_sub(1).saturating_sub(z);

    let distance_to_edge = left.min(right).min(top).min(bottom);
    if distance_to_edge >= border_threshold {
        return 1.0;
    }

    let t = distance_to_edge as f32 / border_threshold as f32;
    baseline + (1.0 - baseline) * t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interior_is_unattenuated() {
        assert_eq!(falloff(50, 50, 200, 200, 0.0, 50), 1.0);
        assert_eq!(falloff(100, 120, 200, 200, -0.3, 50), 1.0);
        assert_eq!(falloff(149, 149, 200, 200, 0.25, 50), 1.0);
    }

    #[test]
    fn test_edges_sit_at_baseline() {
        for baseline in [0.0, 0.2, -1.5] {
            assert_eq!(falloff(0, 80, 200, 200, baseline, 50), baseline);
            assert_eq!(falloff(199, 80, 200, 200, baseline, 50), baseline);
            assert_eq!(falloff(80, 0, 200, 200, baseline, 50), baseline);
            assert_eq!(falloff(80, 199, 200, 200, baseline, 50), baseline);
        }
    }

    #[test]
    fn test_ramp_is_linear() {
        assert!((falloff(25, 100, 200, 200, 0.0, 50) - 0.5).abs() < 1e-6);
        assert!((falloff(10, 100, 200, 200, 0.5, 50) - 0.6).abs() < 1e-6);
    }

    #[test]
    fn test_small_grid_never_reaches_full_height() {
        let (w, l) = (64, 64);
        for z in 0..l {
            for x in 0..w {
                assert!(falloff(x, z, w, l, 0.0, 50) < 1.0);
            }
        }
    }
}
