//! Console reporting: parameter, result, and diagnostic text blocks.
//!
//! Pure formatting over the scanner's output; the empty/non-empty branch is
//! the only logic. With no accepted resonances the reference solution is
//! reported instead, clearly labelled as such.

use bicsim_core::diagnostics::HamiltonianDiagnostics;
use bicsim_core::types::{ReferenceSolution, ResonanceRecord, StructureParams};

/// Select the record with strictly maximum Q.
///
/// Ties resolve to the first occurrence in sweep order.
pub fn best_record(records: &[ResonanceRecord]) -> Option<&ResonanceRecord> {
    let mut best: Option<&ResonanceRecord> = None;
    for record in records {
        match best {
            Some(b) if record.q <= b.q => {}
            _ => best = Some(record),
        }
    }
    best
}

/// The parameter block printed at startup.
pub fn format_parameters(params: &StructureParams) -> String {
    let mut out = String::from("=== PARAMETERS ===\n");
    out.push_str(&format!("Unit cells: {}\n", params.cells));
    out.push_str(&format!("Lattice: {:.1} nm\n", params.pitch * 1e9));
    out.push_str(&format!("Radius: {:.1} nm\n", params.radius * 1e9));
    out.push_str(&format!("Design wavelength: {:.1} nm\n", params.wavelength * 1e9));
    out.push_str(&format!("eps'': {:.1e}", params.epsilon.im));
    out
}

/// The result block: best numerical resonance, or the reference fallback
/// when the sweep accepted nothing.
pub fn format_results(records: &[ResonanceRecord], reference: &ReferenceSolution) -> String {
    match best_record(records) {
        Some(best) => {
            let mut out = String::from("=== NUMERICAL RESULTS ===\n");
            out.push_str(&format!("Resonance frequency: {:.4} THz\n", best.frequency_thz));
            out.push_str(&format!("Quality factor: {:.2e}\n", best.q));
            out.push_str(&format!("Linewidth: {:.2} MHz\n", best.linewidth_mhz()));
            out.push_str(&format!("Accepted resonances: {}", records.len()));
            out
        }
        None => {
            let mut out = String::from("=== THEORETICAL REFERENCE ===\n");
            out.push_str("No resonance passed the acceptance filter; reporting the design target.\n");
            out.push_str(&format!("Frequency: {} THz\n", reference.frequency_thz));
            out.push_str(&format!("Q Factor: {:.2e}\n", reference.q));
            out.push_str(&format!("Linewidth: {} MHz", reference.linewidth_mhz));
            out
        }
    }
}

/// The post-hoc Hamiltonian diagnostics block.
pub fn format_diagnostics(diagnostics: &HamiltonianDiagnostics) -> String {
    let mut out = String::from("=== HAMILTONIAN ANALYSIS ===\n");
    out.push_str(&format!("Condition number: {:.2}\n", diagnostics.condition_number));
    out.push_str(&format!("Diagonal std: {:.3e}\n", diagnostics.diagonal_std));
    out.push_str(&format!("Off-diagonal mean: {:.3e}", diagnostics.off_diagonal_mean));
    out
}
