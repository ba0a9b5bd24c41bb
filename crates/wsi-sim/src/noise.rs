//! Production noise model
//!
//! Corrupts an ideal intensity stack with the disturbances seen on a real
//! instrument, in order:
//!
//! 1. **Vibration**: a sinusoidal stage displacement over the scan time,
//!    entering as the multiplicative fringe-contrast factor
//!    `cos(4π·d(t)/λ)`.
//! 2. **Sensor noise**: additive white Gaussian noise at a target SNR
//!    computed from the mean squared signal power.
//! 3. **Shot noise** (optional): Poisson statistics via photon-count
//!    rescaling.
//! 4. **Saturation**: hard clip to `[0, clip_ceiling]`.
//!
//! All randomness comes from a seeded generator so corrupted stacks are
//! reproducible.
//!
//! ## Example
//!
//! ```rust
//! use ndarray::Array3;
//! use wsi_sim::noise::{NoiseConfig, NoiseInjector};
//!
//! let stack = Array3::<f64>::ones((32, 4, 4));
//! let mut injector = NoiseInjector::new(NoiseConfig::default());
//! let (noisy, vibration) = injector.apply(&stack);
//! assert_eq!(noisy.dim(), stack.dim());
//! assert_eq!(vibration.len(), 32);
//! ```

use ndarray::Array3;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal, Poisson};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use wsi_core::IntensityStack;

/// Noise model configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoiseConfig {
    /// Center wavelength in meters (sets the vibration phase scale).
    pub wavelength: f64,
    /// Vibration amplitude in meters.
    pub vib_amplitude: f64,
    /// Vibration frequency in Hz over a unit scan time.
    pub vib_freq_hz: f64,
    /// Target signal-to-noise ratio in dB for the additive noise.
    pub snr_db: f64,
    /// Enable Poisson shot noise with this full-scale photon count.
    pub shot_noise_photons: Option<f64>,
    /// Saturation ceiling; output intensities clip to `[0, ceiling]`.
    pub clip_ceiling: f64,
    /// Random seed.
    pub seed: u64,
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            wavelength: 600e-9,
            vib_amplitude: 10e-9,
            vib_freq_hz: 50.0,
            snr_db: 30.0,
            shot_noise_photons: None,
            clip_ceiling: 2.0,
            seed: 42,
        }
    }
}

/// Applies the configured disturbance chain to ideal stacks.
#[derive(Debug)]
pub struct NoiseInjector {
    config: NoiseConfig,
    rng: StdRng,
}

impl NoiseInjector {
    pub fn new(config: NoiseConfig) -> Self {
        let rng = StdRng::seed_from_u64(config.seed);
        Self { config, rng }
    }

    /// Corrupt a stack, returning the noisy copy and the vibration
    /// displacement trace (meters, one sample per scan position) used.
    pub fn apply(&mut self, stack: &IntensityStack) -> (IntensityStack, Vec<f64>) {
        let (n_z, n_y, n_x) = stack.dim();
        let cfg = &self.config;

        // Stage displacement over a unit scan time and its fringe-contrast
        // factor.
        let vibration: Vec<f64> = (0..n_z)
            .map(|i| {
                let t = if n_z > 1 {
                    i as f64 / (n_z - 1) as f64
                } else {
                    0.0
                };
                cfg.vib_amplitude * (2.0 * PI * cfg.vib_freq_hz * t).sin()
            })
            .collect();
        let k0 = 4.0 * PI / cfg.wavelength;
        let contrast: Vec<f64> = vibration.iter().map(|&d| (k0 * d).cos()).collect();

        let mut noisy = Array3::<f64>::zeros((n_z, n_y, n_x));
        for z in 0..n_z {
            for y in 0..n_y {
                for x in 0..n_x {
                    noisy[[z, y, x]] = stack[[z, y, x]] * contrast[z];
                }
            }
        }

        // Additive Gaussian noise sized from the mean squared signal power.
        let signal_power = noisy.iter().map(|v| v * v).sum::<f64>() / noisy.len() as f64;
        let noise_std = (signal_power / 10f64.powf(cfg.snr_db / 10.0)).sqrt();
        if noise_std > 0.0 {
            let normal = Normal::new(0.0, noise_std).expect("noise_std is positive");
            for v in noisy.iter_mut() {
                *v += normal.sample(&mut self.rng);
            }
        }

        // Optional shot noise: rescale to photon counts, draw Poisson,
        // rescale back.
        if let Some(max_photons) = cfg.shot_noise_photons {
            let mean = noisy.iter().sum::<f64>() / noisy.len() as f64;
            if mean > 0.0 && max_photons > 0.0 {
                let scale = max_photons / mean;
                for v in noisy.iter_mut() {
                    let photons = (*v * scale).max(0.0);
                    *v = if photons > 0.0 {
                        match Poisson::new(photons) {
                            Ok(dist) => dist.sample(&mut self.rng) / scale,
                            Err(_) => 0.0,
                        }
                    } else {
                        0.0
                    };
                }
            }
        }

        // Saturation.
        for v in noisy.iter_mut() {
            *v = v.clamp(0.0, cfg.clip_ceiling);
        }

        (noisy, vibration)
    }

    pub fn config(&self) -> &NoiseConfig {
        &self.config
    }
}
