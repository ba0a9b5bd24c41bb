//! Axial FFT — planned transforms along the scan axis
//!
//! Wraps a forward/inverse `rustfft` plan pair of fixed length for the
//! per-pixel z lanes of an intensity stack, with one shared scratch buffer.
//! The inverse is normalized by 1/N so a forward/inverse round trip is the
//! identity.
//!
//! ## Example
//!
//! ```rust
//! use wsi_core::axial_fft::AxialFft;
//! use num_complex::Complex64;
//!
//! let mut fft = AxialFft::new(8);
//! let signal: Vec<Complex64> = (0..8).map(|i| Complex64::new(i as f64, 0.0)).collect();
//! let mut buffer = signal.clone();
//! fft.forward(&mut buffer);
//! fft.inverse(&mut buffer);
//! for (a, b) in signal.iter().zip(buffer.iter()) {
//!     assert!((a - b).norm() < 1e-12);
//! }
//! ```

use num_complex::Complex64;
use rustfft::{Fft, FftPlanner};
use std::fmt;
use std::sync::Arc;

/// Forward/inverse FFT pair for lanes of a fixed length.
#[derive(Clone)]
pub struct AxialFft {
    len: usize,
    forward: Arc<dyn Fft<f64>>,
    inverse: Arc<dyn Fft<f64>>,
    scratch: Vec<Complex64>,
}

impl fmt::Debug for AxialFft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AxialFft").field("len", &self.len).finish()
    }
}

impl AxialFft {
    /// Plan both transform directions for lanes of `len` samples.
    pub fn new(len: usize) -> Self {
        let mut planner = FftPlanner::new();
        let forward = planner.plan_fft_forward(len);
        let inverse = planner.plan_fft_inverse(len);
        let scratch_len = forward
            .get_inplace_scratch_len()
            .max(inverse.get_inplace_scratch_len());
        Self {
            len,
            forward,
            inverse,
            scratch: vec![Complex64::new(0.0, 0.0); scratch_len],
        }
    }

    /// Lane length this instance was planned for.
    pub fn len(&self) -> usize {
        self.len
    }

    /// True when planned for zero-length lanes.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// In-place forward transform of one lane.
    pub fn forward(&mut self, buffer: &mut [Complex64]) {
        assert_eq!(buffer.len(), self.len);
        self.forward.process_with_scratch(buffer, &mut self.scratch);
    }

    /// In-place inverse transform of one lane, normalized by 1/N.
    pub fn inverse(&mut self, buffer: &mut [Complex64]) {
        assert_eq!(buffer.len(), self.len);
        self.inverse.process_with_scratch(buffer, &mut self.scratch);
        let scale = 1.0 / self.len as f64;
        for sample in buffer.iter_mut() {
            *sample *= scale;
        }
    }
}

/// Two-sided frequency grid for an `n`-point transform with sample spacing
/// `dz`: non-negative frequencies first, then the negative half.
///
/// `dz` is taken on faith from the caller (the first axis step); a zero or
/// non-finite spacing produces a grid without usable finite frequencies
/// rather than an error here.
pub fn fft_frequencies(n: usize, dz: f64) -> Vec<f64> {
    let span = n as f64 * dz;
    (0..n)
        .map(|i| {
            let k = if i < n.div_ceil(2) {
                i as f64
            } else {
                i as f64 - n as f64
            };
            k / span
        })
        .collect()
}
