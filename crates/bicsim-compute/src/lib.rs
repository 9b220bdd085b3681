//! # BicSim Compute
//!
//! Compute backend abstraction for the BicSim toolchain. This crate provides
//! a [`ComputeBackend`](backend::ComputeBackend) trait that isolates the
//! physics code from execution details of the frequency sweep, which is
//! embarrassingly parallel across samples.

pub mod backend;
pub mod cpu;

pub use backend::{BackendType, ComputeBackend, ComputeError, DeviceInfo};
pub use cpu::CpuBackend;
