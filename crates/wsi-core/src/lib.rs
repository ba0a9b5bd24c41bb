//! # WSI Core — White-Light Scanning Interferometry Reconstruction
//!
//! This crate turns a z-stack of white-light interference intensities into a
//! surface height map. For each lateral pixel the stack records intensity
//! versus scan position; interference contrast peaks where the optical path
//! difference is zero, so the position of that peak encodes the local
//! surface height.
//!
//! Two reconstruction algorithms are provided:
//!
//! - **Coherence peak sensing (CPS)**: locate the peak of the coherence
//!   envelope along the scan axis and refine it below the sampling grid.
//!   Direct, robust, resolution limited by envelope-peak localization.
//! - **FFT phase extraction**: detect the fringe carrier in the frequency
//!   domain and read the interference phase, leaving a wrapped-phase map for
//!   a downstream 2D unwrapper. Finer height sensitivity, more moving parts.
//!
//! ## Signal Flow
//!
//! ```text
//!                    ┌────────────────────┐     height map (m)
//!                ┌──▶│  CPS: envelope     │──▶  coherence map
//!  intensity     │   │  peak + subpixel   │
//!  stack (z,y,x)─┤   └────────────────────┘
//!  scan axis (z) │   ┌────────────────────┐     wrapped phase map
//!                └──▶│  FFT phase:        │──▶  coherence map
//!                    │  carrier readout   │       │ external 2D unwrap
//!                    └────────────────────┘       ▼
//!                                            height = φ·λ/4π
//! ```
//!
//! ## Example
//!
//! ```rust
//! use ndarray::Array3;
//! use wsi_core::prelude::*;
//!
//! // A tiny stack: one pixel whose contrast peaks mid-scan.
//! let n_z = 48;
//! let z: Vec<f64> = (0..n_z).map(|i| i as f64 * 2e-8).collect();
//! let mut stack = Array3::<f64>::zeros((n_z, 1, 1));
//! for i in 0..n_z {
//!     let d = (i as f64 - 20.0) / 6.0;
//!     stack[[i, 0, 0]] = 1.0 + (-d * d).exp() * (1.1 * i as f64).cos();
//! }
//!
//! let (height, _) = reconstruct_cps(&stack, &z, 3.0).unwrap();
//! assert!(height[[0, 0]] >= z[0] && height[[0, 0]] <= z[n_z - 1]);
//! ```
//!
//! All algorithms are pure functions: inputs are never mutated, outputs are
//! freshly allocated, and identical inputs give bit-identical outputs. The
//! per-pixel loops distribute over a thread pool with the `parallel`
//! feature.

pub mod analytic;
pub mod axial_fft;
pub mod cps;
pub mod fft_phase;
pub mod gaussian_filter;
#[cfg(feature = "parallel")]
pub mod parallel;
pub mod phase_unwrap;
pub mod subpixel;
pub mod types;

/// Commonly used items.
pub mod prelude {
    pub use crate::cps::reconstruct_cps;
    pub use crate::fft_phase::{reconstruct_fft_phase, CarrierMode, FftPhaseConfig};
    #[cfg(feature = "parallel")]
    pub use crate::parallel::{reconstruct_cps_parallel, reconstruct_fft_phase_parallel};
    pub use crate::phase_unwrap::{phase_to_height, unwrap_phase_1d, wrap_phase};
    pub use crate::types::{
        CoherenceMap, HeightMap, IntensityStack, ReconError, ReconResult, WrappedPhaseMap,
    };
}

pub use crate::cps::reconstruct_cps;
pub use crate::fft_phase::{reconstruct_fft_phase, CarrierMode, FftPhaseConfig};
pub use crate::types::{
    CoherenceMap, HeightMap, IntensityStack, ReconError, ReconResult, WrappedPhaseMap,
};
