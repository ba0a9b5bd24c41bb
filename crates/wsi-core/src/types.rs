//! Core types for WSI reconstruction
//!
//! This module defines the array types and the error taxonomy shared by the
//! reconstruction algorithms.
//!
//! ## Conventions
//!
//! Intensity stacks are indexed `(z, y, x)`: the first axis is the scan axis,
//! the remaining two are the lateral pixel grid. The scan axis itself is a
//! plain `&[f64]` of strictly increasing positions in meters; every output map
//! is a `(y, x)` array with one scalar per pixel.

use ndarray::{Array2, Array3};
use thiserror::Error;

/// 3D intensity stack, indexed `(scan position, row, column)`.
pub type IntensityStack = Array3<f64>;

/// Reconstructed surface heights in meters, one per pixel.
pub type HeightMap = Array2<f64>;

/// Wrapped interference phase in (−π, π], one per pixel.
pub type WrappedPhaseMap = Array2<f64>;

/// Non-negative confidence values derived from envelope or spectral
/// magnitude at the detected peak, one per pixel.
pub type CoherenceMap = Array2<f64>;

/// Minimum number of scan-axis samples any algorithm accepts.
pub const MIN_SCAN_SAMPLES: usize = 3;

/// Result type for reconstruction operations.
pub type ReconResult<T> = Result<T, ReconError>;

/// Errors that can occur during reconstruction.
///
/// All failures are fatal and deterministic: the algorithms are pure
/// functions of their inputs, so retrying an identical call fails
/// identically. Callers recover by fixing the input (e.g. a longer scan).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReconError {
    /// Scan axis shorter than the minimum the frequency-domain machinery
    /// needs. Raised before any computation.
    #[error("scan axis too short: need at least {required} samples, got {actual}")]
    InsufficientSamples { required: usize, actual: usize },

    /// No strictly positive finite frequency bin exists, so no carrier can
    /// be identified (direct-bin readout only).
    #[error("no strictly positive frequency bin available for carrier detection")]
    CarrierNotFound,

    /// Stack first-axis length disagrees with the scan axis.
    #[error("stack z length {stack_len} does not match scan axis length {axis_len}")]
    StackMismatch { axis_len: usize, stack_len: usize },
}

/// Validate the scan axis length and the stack/axis agreement.
pub(crate) fn check_inputs(stack: &IntensityStack, z_scan: &[f64]) -> ReconResult<()> {
    if z_scan.len() < MIN_SCAN_SAMPLES {
        return Err(ReconError::InsufficientSamples {
            required: MIN_SCAN_SAMPLES,
            actual: z_scan.len(),
        });
    }
    let stack_len = stack.dim().0;
    if stack_len != z_scan.len() {
        return Err(ReconError::StackMismatch {
            axis_len: z_scan.len(),
            stack_len,
        });
    }
    Ok(())
}
