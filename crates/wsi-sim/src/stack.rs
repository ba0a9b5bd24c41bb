//! Ideal WSI stack synthesis
//!
//! Generates the noiseless interference intensity a white-light
//! interferometer would record while scanning over a known surface:
//!
//! ```text
//! I(z, y, x) = Idc + A0 · exp(−((z − h)/Lc)²) · cos(4π(z − h)/λ)
//! ```
//!
//! with the coherence envelope width `Lc` and fringe period λ/2 along the
//! scan axis.

use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use wsi_core::IntensityStack;

/// Physical parameters of the simulated interferometer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimParams {
    /// Center wavelength in meters.
    pub wavelength: f64,
    /// Coherence length in meters (envelope 1/e half-width).
    pub coherence_length: f64,
    /// Constant background intensity.
    pub dc_level: f64,
    /// Fringe amplitude at zero optical path difference.
    pub amplitude: f64,
}

impl Default for SimParams {
    fn default() -> Self {
        Self {
            wavelength: 600e-9,
            coherence_length: 0.8e-6,
            dc_level: 1.0,
            amplitude: 0.6,
        }
    }
}

/// Simulate an ideal intensity stack for `surface` sampled at `z_scan`.
pub fn simulate_stack(surface: &Array2<f64>, z_scan: &[f64], params: &SimParams) -> IntensityStack {
    let (n_y, n_x) = surface.dim();
    let n_z = z_scan.len();
    let mut stack = IntensityStack::zeros((n_z, n_y, n_x));
    let k0 = 4.0 * PI / params.wavelength;
    for (zi, &z) in z_scan.iter().enumerate() {
        for y in 0..n_y {
            for x in 0..n_x {
                let opd = z - surface[[y, x]];
                let envelope = params.amplitude
                    * (-(opd / params.coherence_length) * (opd / params.coherence_length)).exp();
                stack[[zi, y, x]] = params.dc_level + envelope * (k0 * opd).cos();
            }
        }
    }
    stack
}

/// Evenly spaced scan axis of `n` positions spanning `[-half_span, half_span]`.
pub fn symmetric_axis(n: usize, half_span: f64) -> Vec<f64> {
    (0..n)
        .map(|i| -half_span + 2.0 * half_span * i as f64 / (n - 1) as f64)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    #[test]
    fn test_peak_contrast_at_surface() {
        let mut surface = Array2::<f64>::zeros((1, 1));
        surface[[0, 0]] = 0.0;
        let z = symmetric_axis(201, 2e-6);
        let stack = simulate_stack(&surface, &z, &SimParams::default());
        // At zero OPD the fringe sits at its maximum: Idc + A0.
        assert!((stack[[100, 0, 0]] - 1.6).abs() < 1e-9);
        // Far away only the DC level remains.
        assert!((stack[[0, 0, 0]] - 1.0).abs() < 2e-3);
    }

    #[test]
    fn test_intensity_bounds() {
        let surface = Array2::<f64>::from_elem((4, 4), 20e-9);
        let z = symmetric_axis(64, 1e-6);
        let stack = simulate_stack(&surface, &z, &SimParams::default());
        for &v in stack.iter() {
            assert!(v >= 0.4 - 1e-12 && v <= 1.6 + 1e-12);
        }
    }

    #[test]
    fn test_axis_symmetric_and_increasing() {
        let z = symmetric_axis(256, 2e-6);
        assert_eq!(z.len(), 256);
        assert!((z[0] + 2e-6).abs() < 1e-18);
        assert!((z[255] - 2e-6).abs() < 1e-18);
        assert!(z.windows(2).all(|w| w[1] > w[0]));
    }

    #[test]
    fn test_shifted_surface_shifts_pattern() {
        let z = symmetric_axis(128, 2e-6);
        let flat = simulate_stack(&Array2::zeros((1, 1)), &z, &SimParams::default());
        let raised = simulate_stack(&Array2::from_elem((1, 1), z[1] - z[0]), &z, &SimParams::default());
        // Raising the surface by one scan step shifts the pattern one sample.
        for zi in 1..128 {
            assert!((raised[[zi, 0, 0]] - flat[[zi - 1, 0, 0]]).abs() < 1e-9);
        }
    }
}
