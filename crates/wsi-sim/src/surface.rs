//! Ground-truth surfaces for simulation
//!
//! Synthetic 2D height fields used to generate test stacks and to score
//! reconstructions against.

use ndarray::Array2;

/// Flat surface with a centered rectangular mesa of the given height.
///
/// The mesa spans from one quarter to three quarters of each dimension;
/// everything else is at height zero. Heights are in meters.
pub fn step_surface(shape: (usize, usize), step_height: f64) -> Array2<f64> {
    let (n_y, n_x) = shape;
    let mut surface = Array2::<f64>::zeros(shape);
    for y in n_y / 4..n_y * 3 / 4 {
        for x in n_x / 4..n_x * 3 / 4 {
            surface[[y, x]] = step_height;
        }
    }
    surface
}
