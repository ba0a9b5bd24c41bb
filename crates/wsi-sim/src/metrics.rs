//! Reconstruction quality metrics
//!
//! Scores a reconstructed height map against the ground-truth surface it
//! was simulated from, using the zero-height region as the background
//! reference.

use ndarray::Array2;

/// Step-reconstruction quality summary. All values in meters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepMetrics {
    /// Mean raised-region height minus mean background height.
    pub step_height: f64,
    /// Standard deviation of the background region.
    pub background_std: f64,
    /// Root mean square error against the ground truth.
    pub rmse: f64,
}

/// Evaluate a height map against a ground-truth surface.
///
/// Background pixels are those with ground truth exactly zero, raised
/// pixels those strictly above zero. A metric whose region is empty comes
/// back as NaN.
pub fn evaluate_step(height_map: &Array2<f64>, ground_truth: &Array2<f64>) -> StepMetrics {
    assert_eq!(height_map.dim(), ground_truth.dim());

    let mut bg_sum = 0.0;
    let mut bg_count = 0usize;
    let mut step_sum = 0.0;
    let mut step_count = 0usize;
    let mut sq_err = 0.0;

    for (&h, &t) in height_map.iter().zip(ground_truth.iter()) {
        if t == 0.0 {
            bg_sum += h;
            bg_count += 1;
        } else if t > 0.0 {
            step_sum += h;
            step_count += 1;
        }
        sq_err += (h - t) * (h - t);
    }

    let bg_mean = bg_sum / bg_count as f64;
    let step_mean = step_sum / step_count as f64;

    let mut bg_var = 0.0;
    for (&h, &t) in height_map.iter().zip(ground_truth.iter()) {
        if t == 0.0 {
            bg_var += (h - bg_mean) * (h - bg_mean);
        }
    }

    StepMetrics {
        step_height: step_mean - bg_mean,
        background_std: (bg_var / bg_count as f64).sqrt(),
        rmse: (sq_err / height_map.len() as f64).sqrt(),
    }
}
