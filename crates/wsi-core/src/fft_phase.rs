//! FFT Phase Extraction — wrapped-phase reconstruction from the carrier
//!
//! Reads the interference phase at the coherence peak instead of the peak
//! position itself, trading an extra 2D unwrap step downstream for much
//! finer height resolution. Two carrier-extraction strategies are exposed
//! and neither supersedes the other:
//!
//! - [`CarrierMode::AdaptiveBandpass`]: build an analytic signal through a
//!   Gaussian band-pass locked onto the detected carrier bin, then read the
//!   phase at the subpixel-refined envelope peak. Robust under heavy noise.
//! - [`CarrierMode::DirectBin`]: read phase and magnitude of the single
//!   strongest strictly-positive frequency bin per pixel. No inverse
//!   transform, no refinement; fastest, adequate for clean fringes.
//!
//! Converting the (externally unwrapped) phase map to height is
//! `phase_to_height` in [`crate::phase_unwrap`].
//!
//! ## Example
//!
//! ```rust
//! use ndarray::Array3;
//! use wsi_core::fft_phase::{reconstruct_fft_phase, FftPhaseConfig};
//!
//! let n_z = 64;
//! let z: Vec<f64> = (0..n_z).map(|i| i as f64 * 1e-8).collect();
//! let mut stack = Array3::<f64>::zeros((n_z, 1, 1));
//! for i in 0..n_z {
//!     let d = (i as f64 - 32.0) / 12.0;
//!     stack[[i, 0, 0]] = 1.0 + (-d * d).exp() * (0.8 * i as f64).cos();
//! }
//! let cfg = FftPhaseConfig::default();
//! let (phase, coherence) = reconstruct_fft_phase(&stack, &z, &cfg).unwrap();
//! assert!(phase[[0, 0]].abs() <= std::f64::consts::PI);
//! assert!(coherence[[0, 0]] > 0.0);
//! ```

use ndarray::{Array2, Array3};
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::analytic::{analytic_mask, bandpass_window, carrier_index};
use crate::axial_fft::{fft_frequencies, AxialFft};
use crate::gaussian_filter::{gaussian_kernel, smooth_lane};
use crate::subpixel::{interp_at, interp_complex_at, parabolic_peak_offset, peak_index};
use crate::types::{check_inputs, CoherenceMap, IntensityStack, ReconError, ReconResult, WrappedPhaseMap};

/// Carrier-extraction strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CarrierMode {
    /// Adaptive Gaussian band-pass analytic signal with subpixel phase
    /// interpolation at the envelope peak.
    AdaptiveBandpass,
    /// Phase read directly from the strongest positive-frequency bin.
    DirectBin,
}

impl Default for CarrierMode {
    fn default() -> Self {
        Self::AdaptiveBandpass
    }
}

/// FFT-phase reconstruction parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FftPhaseConfig {
    /// Carrier-extraction strategy.
    pub mode: CarrierMode,
    /// Envelope smoothing strength in scan samples (adaptive mode only).
    pub smooth_sigma: f64,
    /// Fractional band-pass width, 0 < band_frac <= 1 (adaptive mode only).
    pub band_frac: f64,
}

impl Default for FftPhaseConfig {
    fn default() -> Self {
        Self {
            mode: CarrierMode::AdaptiveBandpass,
            smooth_sigma: 10.0,
            band_frac: 0.15,
        }
    }
}

/// Reconstruct a wrapped-phase map from an intensity stack.
///
/// The effective sampling interval is taken from the first two axis samples;
/// non-uniform axes silently bias the frequency grid. Fails with
/// `InsufficientSamples` below 3 samples and, in direct-bin mode, with
/// `CarrierNotFound` when no strictly positive finite frequency bin exists.
pub fn reconstruct_fft_phase(
    stack: &IntensityStack,
    z_scan: &[f64],
    config: &FftPhaseConfig,
) -> ReconResult<(WrappedPhaseMap, CoherenceMap)> {
    check_inputs(stack, z_scan)?;
    let dz = z_scan[1] - z_scan[0];
    match config.mode {
        CarrierMode::AdaptiveBandpass => adaptive_bandpass(stack, dz, config),
        CarrierMode::DirectBin => direct_bin(stack, dz),
    }
}

/// Forward-transform every z lane, accumulating the pixel-averaged
/// magnitude spectrum alongside.
fn forward_spectra(stack: &IntensityStack) -> (Array3<Complex64>, Vec<f64>) {
    let (n_z, n_y, n_x) = stack.dim();
    let mut fft = AxialFft::new(n_z);
    let mut spectra = Array3::<Complex64>::zeros((n_z, n_y, n_x));
    let mut mean_magnitude = vec![0.0; n_z];
    let mut buffer = vec![Complex64::new(0.0, 0.0); n_z];
    for y in 0..n_y {
        for x in 0..n_x {
            for z in 0..n_z {
                buffer[z] = Complex64::new(stack[[z, y, x]], 0.0);
            }
            fft.forward(&mut buffer);
            for z in 0..n_z {
                spectra[[z, y, x]] = buffer[z];
                mean_magnitude[z] += buffer[z].norm();
            }
        }
    }
    let pixels = (n_y * n_x) as f64;
    for m in &mut mean_magnitude {
        *m /= pixels;
    }
    (spectra, mean_magnitude)
}

fn adaptive_bandpass(
    stack: &IntensityStack,
    dz: f64,
    config: &FftPhaseConfig,
) -> ReconResult<(WrappedPhaseMap, CoherenceMap)> {
    let (n_z, n_y, n_x) = stack.dim();
    let (spectra, mean_magnitude) = forward_spectra(stack);

    let center = carrier_index(&mean_magnitude);
    let band = bandpass_window(n_z, center, config.band_frac);
    let mask = analytic_mask(&fft_frequencies(n_z, dz));
    let filter: Vec<f64> = band.iter().zip(mask.iter()).map(|(b, m)| b * m).collect();

    let kernel = gaussian_kernel(config.smooth_sigma);
    let mut fft = AxialFft::new(n_z);
    let mut phase = Array2::<f64>::zeros((n_y, n_x));
    let mut coherence = Array2::<f64>::zeros((n_y, n_x));
    let mut lane = vec![Complex64::new(0.0, 0.0); n_z];
    for y in 0..n_y {
        for x in 0..n_x {
            for z in 0..n_z {
                lane[z] = spectra[[z, y, x]] * filter[z];
            }
            fft.inverse(&mut lane);
            let (ph, coh) = refine_phase_peak(&lane, &kernel);
            phase[[y, x]] = ph;
            coherence[[y, x]] = coh;
        }
    }
    Ok((phase, coherence))
}

/// Subpixel wrapped phase and coherence from one analytic lane.
///
/// The smoothed-envelope peak is clamped one sample inward at both ends,
/// then the complex analytic signal is interpolated at the refined index;
/// the raw envelope at that index is the confidence.
pub(crate) fn refine_phase_peak(analytic: &[Complex64], kernel: &[f64]) -> (f64, f64) {
    let n = analytic.len();
    let envelope: Vec<f64> = analytic.iter().map(|c| c.norm()).collect();
    let smoothed = smooth_lane(&envelope, kernel);
    let peak = peak_index(&smoothed).clamp(1, n - 2);
    let shift = parabolic_peak_offset(smoothed[peak - 1], smoothed[peak], smoothed[peak + 1]);
    let index = peak as f64 + shift;
    let value = interp_complex_at(analytic, index);
    (value.arg(), interp_at(&envelope, index))
}

fn direct_bin(stack: &IntensityStack, dz: f64) -> ReconResult<(WrappedPhaseMap, CoherenceMap)> {
    let (n_z, n_y, n_x) = stack.dim();
    let freqs = fft_frequencies(n_z, dz);
    let (spectra, mean_magnitude) = forward_spectra(stack);

    // Strongest pixel-averaged bin among strictly positive finite
    // frequencies, first occurrence on ties.
    let mut carrier: Option<usize> = None;
    for (i, &f) in freqs.iter().enumerate() {
        if !(f.is_finite() && f > 0.0) {
            continue;
        }
        match carrier {
            Some(best) if mean_magnitude[i] <= mean_magnitude[best] => {}
            _ => carrier = Some(i),
        }
    }
    let carrier = carrier.ok_or(ReconError::CarrierNotFound)?;

    let mut phase = Array2::<f64>::zeros((n_y, n_x));
    let mut coherence = Array2::<f64>::zeros((n_y, n_x));
    for y in 0..n_y {
        for x in 0..n_x {
            let value = spectra[[carrier, y, x]];
            phase[[y, x]] = value.arg();
            coherence[[y, x]] = value.norm();
        }
    }
    Ok((phase, coherence))
}
