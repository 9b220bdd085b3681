//! Core types shared across the BicSim toolchain.
//!
//! This module defines the fundamental data structures used throughout the
//! pipeline: the validated structure parameters, the reference benchmark
//! solution, and the resonance records produced by the frequency sweep.

use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Speed of light in vacuum (m/s).
pub const SPEED_OF_LIGHT: f64 = 299_792_458.0;

/// Errors from structure parameter validation.
#[derive(Debug, Error)]
pub enum ParamError {
    #[error("{name} must be positive, got {value:.3e} m")]
    NonPositiveLength { name: &'static str, value: f64 },

    #[error("Unit-cell count must be at least 1, got {0}")]
    EmptyArray(usize),

    #[error("Real part of the permittivity must be positive, got {0:.3e}")]
    NonPositivePermittivity(f64),
}

/// Physical and geometric parameters of the scatterer array.
///
/// Immutable once constructed; [`StructureParams::new`] rejects unphysical
/// values so the numerical pipeline never has to re-validate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructureParams {
    /// Complex relative permittivity of the scatterer material. The imaginary
    /// part is the material loss.
    pub epsilon: Complex64,
    /// Lattice pitch: centre-to-centre spacing of adjacent scatterers (m).
    pub pitch: f64,
    /// Scatterer disk radius (m).
    pub radius: f64,
    /// Design wavelength λ₀ (m).
    pub wavelength: f64,
    /// Number of unit cells in the array.
    pub cells: usize,
}

impl StructureParams {
    /// Construct a validated parameter set.
    pub fn new(
        epsilon: Complex64,
        pitch: f64,
        radius: f64,
        wavelength: f64,
        cells: usize,
    ) -> Result<Self, ParamError> {
        for (name, value) in [
            ("Lattice pitch", pitch),
            ("Scatterer radius", radius),
            ("Design wavelength", wavelength),
        ] {
            if !(value > 0.0) {
                return Err(ParamError::NonPositiveLength { name, value });
            }
        }
        if cells < 1 {
            return Err(ParamError::EmptyArray(cells));
        }
        if !(epsilon.re > 0.0) {
            return Err(ParamError::NonPositivePermittivity(epsilon.re));
        }

        Ok(Self {
            epsilon,
            pitch,
            radius,
            wavelength,
            cells,
        })
    }

    /// The certified optimal design: a 20-cell silicon array pitched at
    /// 600 nm with 202 nm disks, designed for λ₀ = 1550 nm.
    pub fn certified() -> Self {
        Self {
            epsilon: Complex64::new(12.1, 6.0e-7),
            pitch: 600e-9,
            radius: 202e-9,
            wavelength: 1550e-9,
            cells: 20,
        }
    }

    /// Angular reference frequency $\omega_0 = 2\pi c / \lambda_0$ (rad/s).
    pub fn omega_0(&self) -> f64 {
        2.0 * std::f64::consts::PI * SPEED_OF_LIGHT / self.wavelength
    }
}

/// The expected resonance of the certified design, used as a plotted and
/// reported benchmark. Never computed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceSolution {
    /// Resonance frequency (THz).
    pub frequency_thz: f64,
    /// Quality factor.
    pub q: f64,
    /// Linewidth (MHz).
    pub linewidth_mhz: f64,
}

impl Default for ReferenceSolution {
    fn default() -> Self {
        Self {
            frequency_thz: 193.4145,
            q: 3.2e5,
            linewidth_mhz: 0.60,
        }
    }
}

/// A physically valid resonance extracted from one eigenvalue.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResonanceRecord {
    /// Resonant frequency (THz).
    pub frequency_thz: f64,
    /// Quality factor $Q = \omega_n / \Gamma_n$.
    pub q: f64,
}

impl ResonanceRecord {
    /// Linewidth $f/Q$ expressed in MHz.
    pub fn linewidth_mhz(&self) -> f64 {
        self.frequency_thz / self.q * 1e3
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_certified_params_validate() {
        let p = StructureParams::certified();
        StructureParams::new(p.epsilon, p.pitch, p.radius, p.wavelength, p.cells)
            .expect("certified parameters must validate");
    }

    #[test]
    fn test_omega_0_matches_design_wavelength() {
        let p = StructureParams::certified();
        // 2*pi*c/1550nm ~ 1.2153e15 rad/s
        assert_relative_eq!(p.omega_0(), 1.215e15, max_relative = 1e-3);
    }

    #[test]
    fn test_rejects_non_positive_lengths() {
        let eps = Complex64::new(12.1, 0.0);
        assert!(StructureParams::new(eps, 0.0, 202e-9, 1550e-9, 20).is_err());
        assert!(StructureParams::new(eps, 600e-9, -1e-9, 1550e-9, 20).is_err());
        assert!(StructureParams::new(eps, 600e-9, 202e-9, 0.0, 20).is_err());
    }

    #[test]
    fn test_rejects_empty_array() {
        let eps = Complex64::new(12.1, 0.0);
        let err = StructureParams::new(eps, 600e-9, 202e-9, 1550e-9, 0).unwrap_err();
        assert!(matches!(err, ParamError::EmptyArray(0)));
    }

    #[test]
    fn test_rejects_non_positive_permittivity() {
        let eps = Complex64::new(-2.0, 0.5);
        let err = StructureParams::new(eps, 600e-9, 202e-9, 1550e-9, 20).unwrap_err();
        assert!(matches!(err, ParamError::NonPositivePermittivity(_)));
    }

    #[test]
    fn test_linewidth_formula() {
        let rec = ResonanceRecord {
            frequency_thz: 193.4145,
            q: 3.2e5,
        };
        // 193.4145 THz / 3.2e5 * 1e3 ~ 0.6044 MHz
        assert_relative_eq!(rec.linewidth_mhz(), 0.6044, max_relative = 1e-3);
    }
}
