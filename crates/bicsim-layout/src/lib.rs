//! # BicSim Layout
//!
//! Fabrication-layout export for the BicSim toolchain. This crate turns a
//! [`StructureParams`](bicsim_core::types::StructureParams) into a GDSII
//! library — a disk cell, an N×1 array reference of it, and alignment marks —
//! and serialises it to the binary GDSII stream format.
//!
//! - [`model`] — Plain-data GDSII library, cells, and elements.
//! - [`layout`] — Scatterer-array layout construction.
//! - [`writer`] — Binary GDSII record serialisation.

pub mod layout;
pub mod model;
pub mod writer;

pub use layout::build_layout;
pub use model::{GdsCell, GdsElement, GdsLibrary};
pub use writer::{write_file, ExportError};
