//! # WSI Sim — simulation collaborators for interferometric reconstruction
//!
//! Everything the reconstruction core treats as an external collaborator:
//! ground-truth surfaces, ideal stack synthesis, the production noise model,
//! a reference 2D phase unwrapper, and reconstruction quality metrics.
//!
//! ## Example
//!
//! ```rust
//! use wsi_sim::prelude::*;
//!
//! let surface = step_surface((32, 32), 40e-9);
//! let z = symmetric_axis(128, 2e-6);
//! let stack = simulate_stack(&surface, &z, &SimParams::default());
//! let (height, _) = wsi_core::reconstruct_cps(&stack, &z, 8.0).unwrap();
//! let metrics = evaluate_step(&height, &surface);
//! assert!((metrics.step_height - 40e-9).abs() < 2e-9);
//! ```

pub mod metrics;
pub mod noise;
pub mod stack;
pub mod surface;
pub mod unwrap2d;

/// Commonly used items.
pub mod prelude {
    pub use crate::metrics::{evaluate_step, StepMetrics};
    pub use crate::noise::{NoiseConfig, NoiseInjector};
    pub use crate::stack::{simulate_stack, symmetric_axis, SimParams};
    pub use crate::surface::step_surface;
    pub use crate::unwrap2d::unwrap_2d;
}

pub use crate::metrics::{evaluate_step, StepMetrics};
pub use crate::noise::{NoiseConfig, NoiseInjector};
pub use crate::stack::{simulate_stack, symmetric_axis, SimParams};
pub use crate::surface::step_surface;
pub use crate::unwrap2d::unwrap_2d;

#[cfg(test)]
mod tests {
    //! End-to-end reconstruction round trips over simulated stacks.

    use super::*;
    use wsi_core::phase_unwrap::phase_to_height;
    use wsi_core::{reconstruct_cps, reconstruct_fft_phase, CarrierMode, FftPhaseConfig};

    #[test]
    fn test_cps_round_trip_noiseless() {
        let surface = step_surface((128, 128), 40e-9);
        let z = symmetric_axis(256, 2e-6);
        let stack = simulate_stack(&surface, &z, &SimParams::default());

        let (height, coherence) = reconstruct_cps(&stack, &z, 8.0).unwrap();
        let metrics = evaluate_step(&height, &surface);

        assert!(
            (metrics.step_height - 40e-9).abs() < 2e-9,
            "step {:.3} nm",
            metrics.step_height * 1e9
        );
        assert!(
            metrics.background_std < 2e-9,
            "background std {:.3} nm",
            metrics.background_std * 1e9
        );
        for &c in coherence.iter() {
            assert!(c >= 0.0);
        }
        // Heights stay within the scanned range.
        for &h in height.iter() {
            assert!(h >= z[0] && h <= z[255]);
        }
    }

    #[test]
    fn test_cps_round_trip_noisy() {
        let surface = step_surface((64, 64), 40e-9);
        let z = symmetric_axis(256, 2e-6);
        let stack = simulate_stack(&surface, &z, &SimParams::default());
        let (noisy, vibration) = NoiseInjector::new(NoiseConfig::default()).apply(&stack);
        assert_eq!(vibration.len(), 256);

        let (height, _) = reconstruct_cps(&noisy, &z, 8.0).unwrap();
        let metrics = evaluate_step(&height, &surface);

        assert!(
            (metrics.step_height - 40e-9).abs() < 5e-9,
            "step {:.3} nm",
            metrics.step_height * 1e9
        );
        assert!(
            metrics.background_std < 5e-9,
            "background std {:.3} nm",
            metrics.background_std * 1e9
        );
    }

    #[test]
    fn test_direct_bin_round_trip_noiseless() {
        let surface = step_surface((64, 64), 40e-9);
        let z = symmetric_axis(256, 2e-6);
        let stack = simulate_stack(&surface, &z, &SimParams::default());

        let cfg = FftPhaseConfig {
            mode: CarrierMode::DirectBin,
            ..FftPhaseConfig::default()
        };
        let (wrapped, _) = reconstruct_fft_phase(&stack, &z, &cfg).unwrap();
        let unwrapped = unwrap_2d(&wrapped);
        let height = unwrapped.map(|&p| phase_to_height(p, 600e-9));
        let metrics = evaluate_step(&height, &surface);

        // The carrier-bin phase decreases with height, and the quantized
        // carrier frequency undershoots 2/λ slightly, so the recovered
        // magnitude lands a little short of the true 40 nm.
        assert!(
            (metrics.step_height.abs() - 40e-9).abs() < 3e-9,
            "step {:.3} nm",
            metrics.step_height * 1e9
        );
        assert!(
            metrics.background_std < 1e-9,
            "background std {:.3} nm",
            metrics.background_std * 1e9
        );
    }

    #[test]
    fn test_adaptive_phase_is_peak_residual() {
        // The adaptive mode samples the interference phase at the refined
        // envelope peak, so an ideal stack leaves only a near-zero residual
        // at every pixel regardless of the surface underneath.
        let surface = step_surface((48, 48), 40e-9);
        let z = symmetric_axis(256, 2e-6);
        let stack = simulate_stack(&surface, &z, &SimParams::default());

        let cfg = FftPhaseConfig::default();
        let (wrapped, coherence) = reconstruct_fft_phase(&stack, &z, &cfg).unwrap();
        for &p in wrapped.iter() {
            assert!(p.abs() < 0.05, "residual {p}");
        }
        for &c in coherence.iter() {
            assert!(c > 0.0);
        }
    }

    #[test]
    fn test_wrapped_phase_range_over_noisy_stack() {
        let surface = step_surface((32, 32), 40e-9);
        let z = symmetric_axis(128, 2e-6);
        let stack = simulate_stack(&surface, &z, &SimParams::default());
        let (noisy, _) = NoiseInjector::new(NoiseConfig::default()).apply(&stack);

        for mode in [CarrierMode::AdaptiveBandpass, CarrierMode::DirectBin] {
            let cfg = FftPhaseConfig {
                mode,
                ..FftPhaseConfig::default()
            };
            let (wrapped, _) = reconstruct_fft_phase(&noisy, &z, &cfg).unwrap();
            for &p in wrapped.iter() {
                assert!(
                    p > -std::f64::consts::PI - 1e-12 && p <= std::f64::consts::PI + 1e-12
                );
            }
        }
    }
}
