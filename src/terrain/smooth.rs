//! Box smoothing of the height grid.

use rayon::prelude::*;

/// Runs `passes` rounds of 3x3 neighbor averaging over a `width x length`
/// row-major grid and returns the smoothed heights.
///
/// Every pass reads a settled copy of the previous pass, so the result does
/// not depend on visit order. Out-of-bounds neighbors are skipped and the
/// divisor shrinks with them: corners average 4 values, edges 6, the rest 9.
pub fn smooth_heights(heights: &[f32], width: u32, length: u32, passes: u32) -> Vec<f32> {
    let w = width as usize;
    let l = length as usize;
    debug_assert_eq!(heights.len(), w * l);

    let mut current = heights.to_vec();
    if passes == 0 || w == 0 || l == 0 {
        return current;
    }
    let mut next = vec![0.0f32; current.len()];

    for _pass in 0..passes {
        let src = &current;
        next.par_chunks_mut(w).enumerate().for_each(|(z, row)| {
            let z0 = z.saturating_sub(1);
            let z1 = (z + 1).min(l - 1);
            for (x, out) in row.iter_mut().enumerate() {
                let x0 = x.saturating_sub(1);
                let x1 = (x + 1).min(w - 1);

                let mut sum = 0.0f32;
                let mut count = 0u32;
                for nz in z0..=z1 {
                    for nx in x0..=x1 {
                        sum += src[nz * w + nx];
                        count += 1;
                    }
                }
                *out = sum / count as f32;
            }
        });
        std::mem::swap(&mut current, &mut next);
    }

    current
}
