//! Compute backend trait and device abstraction.
//!
//! The [`ComputeBackend`] trait abstracts over execution environments so the
//! physics code in `bicsim-core` remains device-agnostic. The one hot-path
//! operation is [`ComputeBackend::parallel_collect`]: an order-preserving
//! parallel map over sweep sample indices.

use thiserror::Error;

/// Errors originating from compute backends.
#[derive(Debug, Error)]
pub enum ComputeError {
    #[error("Backend not available: {0}")]
    Unavailable(String),

    #[error("Device error: {0}")]
    DeviceError(String),
}

/// Describes the capabilities of a compute backend.
#[derive(Debug, Clone)]
pub struct DeviceInfo {
    pub name: String,
    pub backend_type: BackendType,
    pub compute_units: Option<usize>,
}

/// The type of compute backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendType {
    Cpu,
}

/// Abstraction over compute backends.
///
/// Each sweep sample is independent: the task owns its matrix and emits a
/// private list of `(frequency_THz, Q)` pairs. Backends run tasks over
/// contiguous index chunks with no shared mutable state and merge the
/// partial lists by concatenation, so the output order equals the order a
/// sequential loop would produce.
pub trait ComputeBackend: Send + Sync {
    /// Return information about the device.
    fn device_info(&self) -> DeviceInfo;

    /// Map every index in `0..n_items` through `task`, in parallel chunks of
    /// `chunk` indices, and concatenate the outputs in index order.
    fn parallel_collect(
        &self,
        n_items: usize,
        chunk: usize,
        task: &(dyn Fn(usize) -> Vec<(f64, f64)> + Send + Sync),
    ) -> Result<Vec<(f64, f64)>, ComputeError>;
}
