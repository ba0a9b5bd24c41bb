//! Gaussian Filter — 1D envelope smoothing along the scan axis
//!
//! Smooths coherence envelopes with a normalized Gaussian kernel before peak
//! search. This is the principal noise-rejection step of both reconstruction
//! algorithms: with vibration and sensor noise present, sigma in the 8–15
//! sample range is needed to suppress spurious side-fringe peaks.
//!
//! Boundaries are edge-replicated: samples past either end of the lane read
//! the end sample.
//!
//! ## Example
//!
//! ```rust
//! use wsi_core::gaussian_filter::{gaussian_kernel, smooth_lane};
//!
//! let kernel = gaussian_kernel(2.0);
//! let mut lane = vec![0.0; 21];
//! lane[10] = 1.0;
//! let smooth = smooth_lane(&lane, &kernel);
//! // Mass is spread but conserved.
//! let sum: f64 = smooth.iter().sum();
//! assert!((sum - 1.0).abs() < 1e-9);
//! assert!(smooth[10] < 1.0 && smooth[10] > smooth[9]);
//! ```

use ndarray::Array3;

use crate::types::IntensityStack;

/// Normalized Gaussian kernel with radius `4σ + 0.5` (truncated at four
/// standard deviations).
///
/// `sigma` must be positive.
pub fn gaussian_kernel(sigma: f64) -> Vec<f64> {
    assert!(sigma > 0.0 && sigma.is_finite(), "sigma must be positive");
    let radius = (4.0 * sigma + 0.5) as usize;
    let mut kernel = Vec::with_capacity(2 * radius + 1);
    let mut sum = 0.0;
    for i in 0..=2 * radius {
        let d = i as f64 - radius as f64;
        let w = (-0.5 * (d / sigma) * (d / sigma)).exp();
        kernel.push(w);
        sum += w;
    }
    for w in &mut kernel {
        *w /= sum;
    }
    kernel
}

/// Convolve one lane with a symmetric kernel, replicating edge samples.
pub fn smooth_lane(input: &[f64], kernel: &[f64]) -> Vec<f64> {
    let n = input.len();
    let radius = (kernel.len() / 2) as isize;
    let mut output = vec![0.0; n];
    for (i, out) in output.iter_mut().enumerate() {
        let mut acc = 0.0;
        for (k, &w) in kernel.iter().enumerate() {
            let j = (i as isize + k as isize - radius).clamp(0, n as isize - 1);
            acc += w * input[j as usize];
        }
        *out = acc;
    }
    output
}

/// Gaussian-smooth every z lane of a `(z, y, x)` stack.
pub fn smooth_axis(stack: &IntensityStack, sigma: f64) -> IntensityStack {
    let (n_z, n_y, n_x) = stack.dim();
    let kernel = gaussian_kernel(sigma);
    let mut output = Array3::<f64>::zeros((n_z, n_y, n_x));
    let mut lane = vec![0.0; n_z];
    for y in 0..n_y {
        for x in 0..n_x {
            for z in 0..n_z {
                lane[z] = stack[[z, y, x]];
            }
            let smooth = smooth_lane(&lane, &kernel);
            for z in 0..n_z {
                output[[z, y, x]] = smooth[z];
            }
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;

    #[test]
    fn test_kernel_normalized() {
        for &sigma in &[0.5, 1.0, 8.0, 15.0] {
            let k = gaussian_kernel(sigma);
            let sum: f64 = k.iter().sum();
            assert!((sum - 1.0).abs() < 1e-12, "sigma {sigma}: sum {sum}");
        }
    }

    #[test]
    fn test_kernel_symmetric_and_peaked() {
        let k = gaussian_kernel(3.0);
        let mid = k.len() / 2;
        for i in 0..mid {
            assert!((k[i] - k[k.len() - 1 - i]).abs() < 1e-15);
            assert!(k[i] < k[mid]);
        }
    }

    #[test]
    fn test_kernel_radius() {
        // radius = 4*sigma + 0.5 truncated
        assert_eq!(gaussian_kernel(1.0).len(), 2 * 4 + 1);
        assert_eq!(gaussian_kernel(8.0).len(), 2 * 32 + 1);
    }

    #[test]
    fn test_constant_lane_unchanged() {
        let k = gaussian_kernel(4.0);
        let lane = vec![2.5; 20];
        let smooth = smooth_lane(&lane, &k);
        for &v in &smooth {
            assert!((v - 2.5).abs() < 1e-12);
        }
    }

    #[test]
    fn test_edge_replication() {
        // A step held at the boundary keeps its level there; reflect or zero
        // padding would pull the end sample down.
        let k = gaussian_kernel(2.0);
        let lane = vec![1.0; 30];
        let smooth = smooth_lane(&lane, &k);
        assert!((smooth[0] - 1.0).abs() < 1e-12);
        assert!((smooth[29] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_smoothing_reduces_ripple() {
        let lane: Vec<f64> = (0..64)
            .map(|i| {
                let x = i as f64;
                (-((x - 32.0) / 10.0).powi(2)).exp() * (1.0 + 0.3 * (x * 2.0).sin())
            })
            .collect();
        let smooth = smooth_lane(&lane, &gaussian_kernel(4.0));
        let ripple = |s: &[f64]| {
            s.windows(2)
                .map(|w| (w[1] - w[0]).abs())
                .fold(0.0f64, f64::max)
        };
        assert!(ripple(&smooth) < ripple(&lane));
    }

    #[test]
    fn test_smooth_axis_matches_lane() {
        let mut stack = Array3::<f64>::zeros((16, 2, 2));
        for z in 0..16 {
            stack[[z, 1, 0]] = if z == 8 { 1.0 } else { 0.0 };
        }
        let smoothed = smooth_axis(&stack, 2.0);
        let lane: Vec<f64> = (0..16).map(|z| stack[[z, 1, 0]]).collect();
        let expected = smooth_lane(&lane, &gaussian_kernel(2.0));
        for z in 0..16 {
            assert_eq!(smoothed[[z, 1, 0]], expected[z]);
            assert_eq!(smoothed[[z, 0, 1]], 0.0);
        }
    }
}
