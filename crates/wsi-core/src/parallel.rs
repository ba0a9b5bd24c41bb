//! Parallel Processing — pixel-parallel reconstruction with Rayon
//!
//! Every pixel column is an independent computation writing one scalar per
//! output map, so both algorithms distribute over a thread pool without any
//! locking. Enable with the `parallel` feature flag:
//!
//! ```toml
//! [dependencies]
//! wsi-core = { version = "0.1", features = ["parallel"] }
//! ```
//!
//! The parallel variants are required to produce bit-identical results to
//! their sequential counterparts; only the wall-clock time changes. The one
//! cross-pixel step — carrier detection from the pixel-averaged spectrum —
//! completes before the per-pixel stage begins.

use ndarray::{Array2, Array3};
use num_complex::Complex64;
use rayon::prelude::*;

use crate::analytic::{analytic_mask, bandpass_window, carrier_index};
use crate::axial_fft::{fft_frequencies, AxialFft};
use crate::cps::cps_pixel;
use crate::fft_phase::{refine_phase_peak, CarrierMode, FftPhaseConfig};
use crate::gaussian_filter::gaussian_kernel;
use crate::types::{
    check_inputs, CoherenceMap, HeightMap, IntensityStack, ReconError, ReconResult,
    WrappedPhaseMap,
};

/// Pixel-parallel coherence peak sensing.
///
/// Same contract and output as
/// [`reconstruct_cps`](crate::cps::reconstruct_cps).
pub fn reconstruct_cps_parallel(
    stack: &IntensityStack,
    z_scan: &[f64],
    smooth_sigma: f64,
) -> ReconResult<(HeightMap, CoherenceMap)> {
    check_inputs(stack, z_scan)?;
    let (n_z, n_y, n_x) = stack.dim();
    let kernel = gaussian_kernel(smooth_sigma);
    let plan = AxialFft::new(n_z);
    let results: Vec<(f64, f64)> = (0..n_y * n_x)
        .into_par_iter()
        .map_init(
            || (plan.clone(), vec![0.0; n_z]),
            |(fft, lane), p| {
                let (y, x) = (p / n_x, p % n_x);
                for z in 0..n_z {
                    lane[z] = stack[[z, y, x]];
                }
                cps_pixel(fft, &kernel, lane, z_scan)
            },
        )
        .collect();
    Ok(split_maps(&results, n_y, n_x))
}

/// Pixel-parallel FFT-phase reconstruction.
///
/// Same contract and output as
/// [`reconstruct_fft_phase`](crate::fft_phase::reconstruct_fft_phase).
pub fn reconstruct_fft_phase_parallel(
    stack: &IntensityStack,
    z_scan: &[f64],
    config: &FftPhaseConfig,
) -> ReconResult<(WrappedPhaseMap, CoherenceMap)> {
    check_inputs(stack, z_scan)?;
    let dz = z_scan[1] - z_scan[0];
    let (n_z, n_y, n_x) = stack.dim();
    let plan = AxialFft::new(n_z);

    // Stage 1: forward transform of every lane, then the cross-pixel
    // mean-magnitude reduction all modes key off.
    let spectra: Vec<Vec<Complex64>> = (0..n_y * n_x)
        .into_par_iter()
        .map_init(
            || plan.clone(),
            |fft, p| {
                let (y, x) = (p / n_x, p % n_x);
                let mut buffer: Vec<Complex64> = (0..n_z)
                    .map(|z| Complex64::new(stack[[z, y, x]], 0.0))
                    .collect();
                fft.forward(&mut buffer);
                buffer
            },
        )
        .collect();
    let mut mean_magnitude = vec![0.0; n_z];
    for spectrum in &spectra {
        for (m, c) in mean_magnitude.iter_mut().zip(spectrum.iter()) {
            *m += c.norm();
        }
    }
    let pixels = (n_y * n_x) as f64;
    for m in &mut mean_magnitude {
        *m /= pixels;
    }

    match config.mode {
        CarrierMode::AdaptiveBandpass => {
            let center = carrier_index(&mean_magnitude);
            let band = bandpass_window(n_z, center, config.band_frac);
            let mask = analytic_mask(&fft_frequencies(n_z, dz));
            let filter: Vec<f64> = band.iter().zip(mask.iter()).map(|(b, m)| b * m).collect();
            let kernel = gaussian_kernel(config.smooth_sigma);
            let results: Vec<(f64, f64)> = spectra
                .par_iter()
                .map_init(
                    || plan.clone(),
                    |fft, spectrum| {
                        let mut lane: Vec<Complex64> = spectrum
                            .iter()
                            .zip(filter.iter())
                            .map(|(&c, &f)| c * f)
                            .collect();
                        fft.inverse(&mut lane);
                        refine_phase_peak(&lane, &kernel)
                    },
                )
                .collect();
            Ok(split_maps(&results, n_y, n_x))
        }
        CarrierMode::DirectBin => {
            let freqs = fft_frequencies(n_z, dz);
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
            let results: Vec<(f64, f64)> = spectra
                .par_iter()
                .map(|spectrum| {
                    let value = spectrum[carrier];
                    (value.arg(), value.norm())
                })
                .collect();
            Ok(split_maps(&results, n_y, n_x))
        }
    }
}

/// Gather per-pixel `(a, b)` pairs (row-major) into two maps.
fn split_maps(results: &[(f64, f64)], n_y: usize, n_x: usize) -> (Array2<f64>, Array2<f64>) {
    let mut first = Array2::<f64>::zeros((n_y, n_x));
    let mut second = Array2::<f64>::zeros((n_y, n_x));
    for (p, &(a, b)) in results.iter().enumerate() {
        let (y, x) = (p / n_x, p % n_x);
        first[[y, x]] = a;
        second[[y, x]] = b;
    }
    (first, second)
}

/// Gaussian-smooth every z lane of a stack in parallel.
pub fn smooth_axis_parallel(stack: &IntensityStack, sigma: f64) -> IntensityStack {
    use crate::gaussian_filter::smooth_lane;
    let (n_z, n_y, n_x) = stack.dim();
    let kernel = gaussian_kernel(sigma);
    let lanes: Vec<Vec<f64>> = (0..n_y * n_x)
        .into_par_iter()
        .map(|p| {
            let (y, x) = (p / n_x, p % n_x);
            let lane: Vec<f64> = (0..n_z).map(|z| stack[[z, y, x]]).collect();
            smooth_lane(&lane, &kernel)
        })
        .collect();
    let mut output = Array3::<f64>::zeros((n_z, n_y, n_x));
    for (p, lane) in lanes.iter().enumerate() {
        let (y, x) = (p / n_x, p % n_x);
        for z in 0..n_z {
            output[[z, y, x]] = lane[z];
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cps::reconstruct_cps;
    use crate::fft_phase::reconstruct_fft_phase;
    use crate::gaussian_filter::smooth_axis;
    use ndarray::Array3;
    use std::f64::consts::PI;

    fn test_stack(n_z: usize, n_y: usize, n_x: usize) -> (IntensityStack, Vec<f64>) {
        let z: Vec<f64> = (0..n_z)
            .map(|i| -2e-6 + 4e-6 * i as f64 / (n_z - 1) as f64)
            .collect();
        let mut stack = Array3::<f64>::zeros((n_z, n_y, n_x));
        for (zi, &zv) in z.iter().enumerate() {
            for y in 0..n_y {
                for x in 0..n_x {
                    let h = (y * n_x + x) as f64 * 10e-9;
                    let opd = zv - h;
                    let env = 0.6 * (-(opd / 0.8e-6) * (opd / 0.8e-6)).exp();
                    stack[[zi, y, x]] = 1.0 + env * (4.0 * PI * opd / 600e-9).cos();
                }
            }
        }
        (stack, z)
    }

    #[test]
    fn test_cps_parallel_matches_sequential() {
        let (stack, z) = test_stack(64, 4, 5);
        let sequential = reconstruct_cps(&stack, &z, 8.0).unwrap();
        let parallel = reconstruct_cps_parallel(&stack, &z, 8.0).unwrap();
        assert_eq!(sequential.0, parallel.0);
        assert_eq!(sequential.1, parallel.1);
    }

    #[test]
    fn test_fft_phase_parallel_matches_sequential() {
        let (stack, z) = test_stack(64, 4, 5);
        for mode in [CarrierMode::AdaptiveBandpass, CarrierMode::DirectBin] {
            let cfg = FftPhaseConfig {
                mode,
                ..FftPhaseConfig::default()
            };
            let sequential = reconstruct_fft_phase(&stack, &z, &cfg).unwrap();
            let parallel = reconstruct_fft_phase_parallel(&stack, &z, &cfg).unwrap();
            assert_eq!(sequential.0, parallel.0, "{mode:?}");
            assert_eq!(sequential.1, parallel.1, "{mode:?}");
        }
    }

    #[test]
    fn test_parallel_errors_match() {
        let stack = Array3::<f64>::zeros((2, 2, 2));
        let err = reconstruct_cps_parallel(&stack, &[0.0, 1e-8], 8.0).unwrap_err();
        assert!(matches!(err, ReconError::InsufficientSamples { .. }));

        let stack = Array3::<f64>::ones((4, 2, 2));
        let cfg = FftPhaseConfig {
            mode: CarrierMode::DirectBin,
            ..FftPhaseConfig::default()
        };
        let err =
            reconstruct_fft_phase_parallel(&stack, &[1e-6, 1e-6, 1e-6, 1e-6], &cfg).unwrap_err();
        assert_eq!(err, ReconError::CarrierNotFound);
    }

    #[test]
    fn test_smooth_axis_parallel_matches() {
        let (stack, _) = test_stack(32, 3, 3);
        assert_eq!(smooth_axis(&stack, 4.0), smooth_axis_parallel(&stack, 4.0));
    }
}
