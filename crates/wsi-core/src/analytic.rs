//! Analytic Signal Builder — envelope and phase from real intensity lanes
//!
//! Converts a real interference signal sampled along the scan axis into a
//! complex analytic signal whose magnitude is the coherence envelope and
//! whose argument is the interference phase. Two constructions are provided:
//!
//! - **Time-domain**: FFT-based Hilbert construction (double positive bins,
//!   keep DC and the even-length Nyquist bin at unit weight, zero the
//!   negative half). Used by coherence-peak sensing.
//! - **Frequency-domain**: a Gaussian band-pass window centered on the
//!   carrier bin detected from the pixel-averaged magnitude spectrum,
//!   multiplied by the analytic mask, applied before the inverse transform.
//!   Used by the adaptive FFT-phase mode; far more selective under heavy
//!   noise since everything outside the carrier band is discarded.
//!
//! ## Example
//!
//! ```rust
//! use wsi_core::analytic::analytic_signal;
//! use wsi_core::axial_fft::AxialFft;
//! use std::f64::consts::PI;
//!
//! let n = 64;
//! let lane: Vec<f64> = (0..n).map(|i| (2.0 * PI * 8.0 * i as f64 / n as f64).cos()).collect();
//! let mut fft = AxialFft::new(n);
//! let analytic = analytic_signal(&mut fft, &lane);
//! // A pure cosine has a flat unit envelope.
//! for c in &analytic {
//!     assert!((c.norm() - 1.0).abs() < 1e-9);
//! }
//! ```

use ndarray::Array3;
use num_complex::Complex64;

use crate::axial_fft::AxialFft;
use crate::phase_unwrap::unwrap_phase_1d;
use crate::subpixel::peak_index;
use crate::types::IntensityStack;

/// Analytic signal of one real lane via the FFT Hilbert construction.
///
/// `fft` must be planned for `lane.len()`.
pub fn analytic_signal(fft: &mut AxialFft, lane: &[f64]) -> Vec<Complex64> {
    let n = fft.len();
    assert_eq!(lane.len(), n);
    let mut buffer: Vec<Complex64> = lane.iter().map(|&v| Complex64::new(v, 0.0)).collect();
    fft.forward(&mut buffer);
    apply_hilbert_weights(&mut buffer);
    fft.inverse(&mut buffer);
    buffer
}

/// Spectrum weights for the analytic signal: DC stays, strictly positive
/// bins double, the even-length Nyquist bin stays, negative bins vanish.
fn apply_hilbert_weights(spectrum: &mut [Complex64]) {
    let n = spectrum.len();
    let half = n / 2;
    let positive_end = if n % 2 == 0 { half } else { half + 1 };
    for bin in spectrum.iter_mut().take(positive_end).skip(1) {
        *bin *= 2.0;
    }
    for bin in spectrum.iter_mut().skip(half + 1) {
        *bin = Complex64::new(0.0, 0.0);
    }
}

/// Analytic signal of every z lane of a stack (time-domain mode).
pub fn analytic_stack(stack: &IntensityStack) -> Array3<Complex64> {
    let (n_z, n_y, n_x) = stack.dim();
    let mut fft = AxialFft::new(n_z);
    let mut output = Array3::<Complex64>::zeros((n_z, n_y, n_x));
    let mut lane = vec![0.0; n_z];
    for y in 0..n_y {
        for x in 0..n_x {
            for z in 0..n_z {
                lane[z] = stack[[z, y, x]];
            }
            let analytic = analytic_signal(&mut fft, &lane);
            for z in 0..n_z {
                output[[z, y, x]] = analytic[z];
            }
        }
    }
    output
}

/// Carrier bin: argmax of a pixel-averaged magnitude spectrum, first
/// occurrence on ties.
pub fn carrier_index(mean_spectrum: &[f64]) -> usize {
    peak_index(mean_spectrum)
}

/// Gaussian band-pass window over `n` bins centered on `center`.
///
/// Half-bandwidth is `max(2, round(n·band_frac/2))` bins and the Gaussian
/// sigma `max(1, half_bw/2)`, so even a narrow request keeps a usable
/// pass band.
pub fn bandpass_window(n: usize, center: usize, band_frac: f64) -> Vec<f64> {
    let half_bw = ((n as f64 * band_frac / 2.0).round() as usize).max(2);
    let sigma = (half_bw as f64 / 2.0).max(1.0);
    (0..n)
        .map(|i| {
            let d = i as f64 - center as f64;
            (-0.5 * (d / sigma) * (d / sigma)).exp()
        })
        .collect()
}

/// Analytic-signal mask over a frequency grid: 2 for strictly positive
/// finite frequencies, 1 at zero, 0 elsewhere.
pub fn analytic_mask(freqs: &[f64]) -> Vec<f64> {
    freqs
        .iter()
        .map(|&f| {
            if f == 0.0 {
                1.0
            } else if f.is_finite() && f > 0.0 {
                2.0
            } else {
                0.0
            }
        })
        .collect()
}

/// Instantaneous unwrapped phase of a real lane.
pub fn instantaneous_phase(lane: &[f64]) -> Vec<f64> {
    if lane.is_empty() {
        return Vec::new();
    }
    let mut fft = AxialFft::new(lane.len());
    let analytic = analytic_signal(&mut fft, lane);
    let phase: Vec<f64> = analytic.iter().map(|c| c.arg()).collect();
    unwrap_phase_1d(&phase)
}
