//! # BicSim Core
//!
//! The numerical backbone of the BicSim toolchain. This crate implements the
//! coupled-mode model of a linear array of dielectric scatterers and the
//! frequency sweep that extracts its bound-in-continuum resonances.
//!
//! ## Pipeline
//!
//! A [`types::StructureParams`] describes the array. For each sampled angular
//! frequency, [`hamiltonian::build_hamiltonian`] constructs the N×N complex
//! coupled-mode matrix, [`eigen::eigenvalues`] decomposes it, and
//! [`scan::scan_resonances`] filters the eigenvalues down to physically valid
//! high-Q resonances. The sweep is data-parallel across frequency samples via
//! the `bicsim-compute` backend.
//!
//! ## Modules
//!
//! - [`types`] — Core data structures (parameters, resonance records).
//! - [`hamiltonian`] — Frequency-dependent coupled-mode matrix assembly.
//! - [`eigen`] — Dense eigendecomposition and SVD via `faer`.
//! - [`scan`] — Frequency sweep, eigenvalue filtering, result collection.
//! - [`diagnostics`] — Post-hoc matrix diagnostics at the reference frequency.

pub mod diagnostics;
pub mod eigen;
pub mod hamiltonian;
pub mod scan;
pub mod types;
