//! Reference 2D phase unwrapper
//!
//! Itoh-style sequential unwrapping: the first column is unwrapped top to
//! bottom, then every row left to right seeded from its column value. This
//! is the simple collaborator the reconstruction pipeline hands its wrapped
//! phase maps to in tests; it is correct only while phase differences
//! between adjacent pixels stay below π, and it makes no attempt at the
//! residue handling a robust production unwrapper would need.

use ndarray::Array2;
use wsi_core::phase_unwrap::unwrap_phase_1d;
use wsi_core::WrappedPhaseMap;

/// Unwrap a 2D wrapped-phase map into a continuous surface.
pub fn unwrap_2d(wrapped: &WrappedPhaseMap) -> Array2<f64> {
    let (n_y, n_x) = wrapped.dim();
    let mut output = Array2::<f64>::zeros((n_y, n_x));
    if n_y == 0 || n_x == 0 {
        return output;
    }

    let first_column: Vec<f64> = (0..n_y).map(|y| wrapped[[y, 0]]).collect();
    let seeds = unwrap_phase_1d(&first_column);

    for y in 0..n_y {
        let row: Vec<f64> = (0..n_x).map(|x| wrapped[[y, x]]).collect();
        let unwrapped = unwrap_phase_1d(&row);
        // unwrap_phase_1d keeps the first sample, so the seed correction is
        // an exact multiple of 2π.
        let offset = seeds[y] - unwrapped[0];
        for x in 0..n_x {
            output[[y, x]] = unwrapped[x] + offset;
        }
    }
    output
}
