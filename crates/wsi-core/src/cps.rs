//! Coherence Peak Sensing — envelope-peak height reconstruction
//!
//! For every pixel, the coherence envelope of the interference signal peaks
//! where the optical path difference is zero; the scan position of that peak
//! is the surface height. The envelope comes from the time-domain analytic
//! signal, is Gaussian-smoothed along the scan axis to reject side-fringe
//! peaks, and the integer peak is refined to a fractional scan position by a
//! parabolic fit.
//!
//! If the smoothed peak sits on either end of the scan axis the true peak
//! was outside the acquisition range: the height is reported at that exact
//! end position with the smoothed envelope as confidence, and no refinement
//! is attempted.
//!
//! ## Example
//!
//! ```rust
//! use ndarray::Array3;
//! use wsi_core::cps::reconstruct_cps;
//!
//! // A lane whose contrast peaks mid-scan.
//! let n_z = 64;
//! let z: Vec<f64> = (0..n_z).map(|i| i as f64 * 1e-7).collect();
//! let mut stack = Array3::<f64>::zeros((n_z, 1, 1));
//! for i in 0..n_z {
//!     let d = (i as f64 - 30.0) / 8.0;
//!     stack[[i, 0, 0]] = 1.0 + (-d * d).exp() * (0.9 * i as f64).cos();
//! }
//! let (height, coherence) = reconstruct_cps(&stack, &z, 2.0).unwrap();
//! assert!(height[[0, 0]] >= z[0] && height[[0, 0]] <= z[n_z - 1]);
//! assert!(coherence[[0, 0]] > 0.0);
//! ```

use ndarray::Array2;

use crate::analytic::analytic_signal;
use crate::axial_fft::AxialFft;
use crate::gaussian_filter::{gaussian_kernel, smooth_lane};
use crate::subpixel::{interp_at, parabolic_peak_offset, peak_index};
use crate::types::{check_inputs, CoherenceMap, HeightMap, IntensityStack, ReconResult};

/// Reconstruct a height map by coherence peak sensing.
///
/// `smooth_sigma` is the Gaussian envelope-smoothing strength in scan
/// samples; 8–15 suits realistic sensor and vibration noise. Fails with
/// [`ReconError::InsufficientSamples`](crate::types::ReconError) when the
/// axis has fewer than 3 samples, before any computation.
///
/// Returns the height map in meters and the per-pixel coherence map. The
/// result is deterministic; pixels are independent.
pub fn reconstruct_cps(
    stack: &IntensityStack,
    z_scan: &[f64],
    smooth_sigma: f64,
) -> ReconResult<(HeightMap, CoherenceMap)> {
    check_inputs(stack, z_scan)?;
    let (n_z, n_y, n_x) = stack.dim();
    let kernel = gaussian_kernel(smooth_sigma);
    let mut fft = AxialFft::new(n_z);
    let mut height = Array2::<f64>::zeros((n_y, n_x));
    let mut coherence = Array2::<f64>::zeros((n_y, n_x));
    let mut lane = vec![0.0; n_z];
    for y in 0..n_y {
        for x in 0..n_x {
            for z in 0..n_z {
                lane[z] = stack[[z, y, x]];
            }
            let (h, c) = cps_pixel(&mut fft, &kernel, &lane, z_scan);
            height[[y, x]] = h;
            coherence[[y, x]] = c;
        }
    }
    Ok((height, coherence))
}

/// Full CPS chain for one pixel lane: analytic envelope, smoothing, peak
/// search, refinement.
pub(crate) fn cps_pixel(
    fft: &mut AxialFft,
    kernel: &[f64],
    lane: &[f64],
    z_scan: &[f64],
) -> (f64, f64) {
    let analytic = analytic_signal(fft, lane);
    let envelope: Vec<f64> = analytic.iter().map(|c| c.norm()).collect();
    let smoothed = smooth_lane(&envelope, kernel);
    refine_cps_peak(&smoothed, &envelope, z_scan)
}

/// Subpixel height and coherence from a smoothed envelope lane.
///
/// The height interpolates the raw scan axis at the refined index and the
/// coherence interpolates the raw (unsmoothed) envelope; the boundary case
/// reads both from the end sample directly, with the smoothed envelope as
/// coherence.
pub(crate) fn refine_cps_peak(smoothed: &[f64], envelope: &[f64], z_scan: &[f64]) -> (f64, f64) {
    let n = smoothed.len();
    let peak = peak_index(smoothed);
    if peak == 0 || peak == n - 1 {
        return (z_scan[peak], smoothed[peak]);
    }
    let shift = parabolic_peak_offset(smoothed[peak - 1], smoothed[peak], smoothed[peak + 1]);
    let index = peak as f64 + shift;
    (interp_at(z_scan, index), interp_at(envelope, index))
}
