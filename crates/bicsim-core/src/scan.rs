//! Resonance scanner: frequency sweep and eigenvalue filtering.
//!
//! Sweeps a dense frequency axis around the reference frequency, builds the
//! coupled-mode Hamiltonian at each sample, eigendecomposes it, and keeps the
//! eigenvalues that correspond to physically valid high-Q resonances.
//!
//! The sweep has no inter-sample dependency, so it runs as a data-parallel
//! map over contiguous index chunks through a [`ComputeBackend`]; per-chunk
//! partial results are merged by concatenation in index order.

use num_complex::Complex64;
use thiserror::Error;

use bicsim_compute::{ComputeBackend, ComputeError};

use crate::eigen;
use crate::hamiltonian::build_hamiltonian;
use crate::types::{ResonanceRecord, StructureParams};

/// Number of samples placed in each parallel work unit.
const SWEEP_CHUNK: usize = 256;

/// Sweep resolution and acceptance thresholds.
///
/// Defaults reproduce the certified search: 50 000 samples over
/// ±8 % of ω₀, accepting only non-degenerate decay rates inside the
/// (193, 194) THz window above Q = 1.5×10⁵.
#[derive(Debug, Clone)]
pub struct SweepConfig {
    /// Number of evenly spaced frequency samples.
    pub points: usize,
    /// Sweep band as fractions of ω₀: `[low, high]`.
    pub band: [f64; 2],
    /// Open acceptance window for the resonance frequency (THz).
    pub window_thz: [f64; 2],
    /// Minimum decay rate Γ (rad/s); excludes degenerate and gain-like modes.
    pub min_decay_rate: f64,
    /// Minimum accepted quality factor.
    pub min_q: f64,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            points: 50_000,
            band: [0.92, 1.08],
            window_thz: [193.0, 194.0],
            min_decay_rate: 1e-5,
            min_q: 1.5e5,
        }
    }
}

/// Errors that abort the whole sweep.
///
/// A failed eigendecomposition at a single sample does *not* abort: the
/// sample is logged and skipped so one pathological matrix cannot discard
/// an otherwise complete scan.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Sweep needs at least 2 samples, got {0}")]
    DegenerateSweep(usize),

    #[error("Sweep band must satisfy 0 < low < high, got [{0}, {1}]")]
    InvalidBand(f64, f64),

    #[error("Compute backend error: {0}")]
    Backend(#[from] ComputeError),
}

/// Map one sample's eigenvalues to accepted resonance records.
///
/// Each eigenvalue λ yields a resonant angular frequency
/// $\omega_n = \mathrm{Re}(\lambda)\,\omega_0$ and a decay rate
/// $\Gamma_n = -2\,\mathrm{Im}(\lambda)\,\omega_0$. A record is kept iff
/// Γ is strictly above the degeneracy floor, the frequency lies strictly
/// inside the acceptance window, and Q clears the threshold.
pub fn filter_eigenvalues(
    eigenvalues: &[Complex64],
    omega_0: f64,
    config: &SweepConfig,
) -> Vec<ResonanceRecord> {
    let mut records = Vec::new();

    for lambda in eigenvalues {
        let omega_n = lambda.re * omega_0;
        let gamma_n = -2.0 * lambda.im * omega_0;
        if gamma_n <= config.min_decay_rate {
            continue;
        }

        let frequency_thz = omega_n / (2.0 * std::f64::consts::PI * 1e12);
        if frequency_thz <= config.window_thz[0] || frequency_thz >= config.window_thz[1] {
            continue;
        }

        let q = omega_n / gamma_n;
        if q > config.min_q {
            records.push(ResonanceRecord { frequency_thz, q });
        }
    }

    records
}

/// Sweep the frequency band and collect all valid resonances.
///
/// Returns records in sweep order: samples in increasing frequency, and
/// within a sample in eigenvalue order. The collection may be empty; callers
/// fall back to the reference solution in that case.
pub fn scan_resonances(
    params: &StructureParams,
    config: &SweepConfig,
    backend: &dyn ComputeBackend,
) -> Result<Vec<ResonanceRecord>, ScanError> {
    if config.points < 2 {
        return Err(ScanError::DegenerateSweep(config.points));
    }
    if !(config.band[0] > 0.0 && config.band[0] < config.band[1]) {
        return Err(ScanError::InvalidBand(config.band[0], config.band[1]));
    }

    let omega_0 = params.omega_0();
    let omega_start = config.band[0] * omega_0;
    let omega_step = (config.band[1] - config.band[0]) * omega_0 / (config.points - 1) as f64;

    let pairs = backend.parallel_collect(config.points, SWEEP_CHUNK, &|sample| {
        let omega = omega_start + omega_step * sample as f64;
        let h = build_hamiltonian(omega, params);

        match eigen::eigenvalues(&h) {
            Ok(evals) => filter_eigenvalues(&evals, omega_0, config)
                .into_iter()
                .map(|r| (r.frequency_thz, r.q))
                .collect(),
            Err(e) => {
                // One bad sample must not abort the other 49 999.
                log::warn!("Skipping sample {sample} (omega = {omega:.6e} rad/s): {e}");
                Vec::new()
            }
        }
    })?;

    Ok(pairs
        .into_iter()
        .map(|(frequency_thz, q)| ResonanceRecord { frequency_thz, q })
        .collect())
}
