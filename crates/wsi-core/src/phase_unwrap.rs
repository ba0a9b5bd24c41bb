//! Phase Unwrap — 1D phase utilities and phase/height conversion
//!
//! Wraps phases into the principal interval, removes 2π jumps from 1D
//! sequences, and converts unwrapped interference phase to surface height.
//! 2D unwrapping of whole phase maps is a downstream collaborator concern
//! and deliberately not part of this crate.
//!
//! ## Example
//!
//! ```rust
//! use wsi_core::phase_unwrap::{unwrap_phase_1d, wrap_phase};
//!
//! let wrapped: Vec<f64> = (0..20).map(|i| wrap_phase(0.8 * i as f64)).collect();
//! let unwrapped = unwrap_phase_1d(&wrapped);
//! for (i, v) in unwrapped.iter().enumerate() {
//!     assert!((v - 0.8 * i as f64).abs() < 1e-9);
//! }
//! ```

use std::f64::consts::PI;

/// Wrap a phase into (−π, π].
pub fn wrap_phase(phase: f64) -> f64 {
    let mut p = phase % (2.0 * PI);
    if p > PI {
        p -= 2.0 * PI;
    } else if p <= -PI {
        p += 2.0 * PI;
    }
    p
}

/// Remove 2π discontinuities from a sampled phase sequence.
///
/// A jump larger than π between consecutive samples is treated as a wrap
/// and corrected by the accumulated multiple of 2π.
pub fn unwrap_phase_1d(phase: &[f64]) -> Vec<f64> {
    let mut output = Vec::with_capacity(phase.len());
    let mut correction = 0.0;
    let mut prev = match phase.first() {
        Some(&p) => {
            output.push(p);
            p
        }
        None => return output,
    };
    for &p in &phase[1..] {
        let diff = p - prev;
        if diff > PI {
            correction -= 2.0 * PI;
        } else if diff < -PI {
            correction += 2.0 * PI;
        }
        prev = p;
        output.push(p + correction);
    }
    output
}

/// Convert unwrapped interference phase to height: `φ·λ / 4π`.
///
/// The factor 4π (not 2π) accounts for the round trip of the measurement
/// beam.
pub fn phase_to_height(phase: f64, wavelength: f64) -> f64 {
    phase * wavelength / (4.0 * PI)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_identity_in_interval() {
        for &p in &[0.0, 1.0, -1.0, 3.0, -3.0, PI] {
            assert!((wrap_phase(p) - p).abs() < 1e-12);
        }
    }

    #[test]
    fn test_wrap_reduces_large_angles() {
        assert!((wrap_phase(2.0 * PI)).abs() < 1e-12);
        assert!((wrap_phase(3.0 * PI) - PI).abs() < 1e-12);
        assert!((wrap_phase(-2.5 * PI) - (-0.5 * PI)).abs() < 1e-12);
    }

    #[test]
    fn test_wrap_interval_open_at_minus_pi() {
        let w = wrap_phase(-PI);
        assert!(w > -PI && (w - PI).abs() < 1e-12);
    }

    #[test]
    fn test_unwrap_no_jumps() {
        let p = vec![0.0, 0.5, 1.0, 1.5];
        assert_eq!(unwrap_phase_1d(&p), p);
    }

    #[test]
    fn test_unwrap_positive_ramp() {
        let step = 0.4;
        let wrapped: Vec<f64> = (0..50).map(|i| wrap_phase(step * i as f64)).collect();
        let unwrapped = unwrap_phase_1d(&wrapped);
        for (i, v) in unwrapped.iter().enumerate() {
            assert!((v - step * i as f64).abs() < 1e-9, "sample {i}");
        }
    }

    #[test]
    fn test_unwrap_negative_ramp() {
        let step = -0.7;
        let wrapped: Vec<f64> = (0..50).map(|i| wrap_phase(step * i as f64)).collect();
        let unwrapped = unwrap_phase_1d(&wrapped);
        for (i, v) in unwrapped.iter().enumerate() {
            assert!((v - step * i as f64).abs() < 1e-9, "sample {i}");
        }
    }

    #[test]
    fn test_unwrap_empty_and_single() {
        assert!(unwrap_phase_1d(&[]).is_empty());
        assert_eq!(unwrap_phase_1d(&[1.2]), vec![1.2]);
    }

    #[test]
    fn test_phase_to_height() {
        // One full fringe (2π) corresponds to λ/2 of height: 300 nm at 600 nm.
        let h = phase_to_height(2.0 * PI, 600e-9);
        assert!((h - 300e-9).abs() < 1e-15);
    }
}
