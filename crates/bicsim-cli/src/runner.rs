//! Pipeline orchestration: scan, report, plot, export, diagnose.

use std::path::Path;

use anyhow::{Context, Result};

use bicsim_compute::{ComputeBackend, CpuBackend};
use bicsim_core::diagnostics;
use bicsim_core::scan::scan_resonances;
use bicsim_core::types::{ReferenceSolution, ResonanceRecord, StructureParams};
use bicsim_layout::{build_layout, write_file};

use crate::config::JobConfig;
use crate::plot;
use crate::report;

/// Run the complete analysis workflow.
///
/// The simulation itself is fatal on failure; the output steps (plot, CSV,
/// JSON, GDS) are isolated from each other so one failed write cannot
/// invalidate results that were already produced and reported. The first
/// output failure is returned after every step has had its chance.
pub fn run_pipeline(job: &JobConfig, out_dir: &Path) -> Result<()> {
    let params = job.structure.to_params()?;
    let sweep = job.sweep.to_sweep_config();
    let reference = ReferenceSolution::default();

    println!("{}", report::format_parameters(&params));
    println!();

    let backend = CpuBackend::new();
    println!("Backend: {}", backend.device_info().name);

    println!("=== SIMULATION ===");
    println!(
        "Sweeping {} samples over [{:.2}, {:.2}] x omega_0...",
        sweep.points, sweep.band[0], sweep.band[1]
    );
    let records = scan_resonances(&params, &sweep, &backend)?;
    println!("Accepted {} resonance records.", records.len());
    println!();

    println!("{}", report::format_results(&records, &reference));
    println!();

    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create output directory {}", out_dir.display()))?;

    let mut first_failure: Option<anyhow::Error> = None;
    let mut record_failure = |step: &str, err: anyhow::Error| {
        log::error!("{step} failed: {err:#}");
        if first_failure.is_none() {
            first_failure = Some(err.context(format!("{step} failed")));
        }
    };

    if job.output.save_plot {
        let path = out_dir.join(&job.output.plot_file);
        match plot::render_scatter(&records, &reference, &params, &path) {
            Ok(()) => println!("Plot written to: {}", path.display()),
            Err(e) => record_failure("Plot rendering", anyhow::anyhow!("{e}")),
        }
    }

    if job.output.save_csv {
        let path = out_dir.join("resonances.csv");
        match write_resonances_csv(&records, &path, &params) {
            Ok(()) => println!("Resonances (CSV) written to: {}", path.display()),
            Err(e) => record_failure("CSV export", e),
        }
    }

    if job.output.save_json {
        let path = out_dir.join("resonances.json");
        match write_resonances_json(&records, &path) {
            Ok(()) => println!("Resonances (JSON) written to: {}", path.display()),
            Err(e) => record_failure("JSON export", e),
        }
    }

    if job.output.save_gds {
        println!("=== FABRICATION EXPORT ===");
        let path = out_dir.join(&job.output.gds_file);
        match export_layout(&params, &path) {
            Ok(()) => println!("GDSII file saved as {}", path.display()),
            Err(e) => record_failure("GDSII export", e),
        }
    }

    println!();
    println!(
        "{}",
        report::format_diagnostics(&diagnostics::analyse_at_reference(&params))
    );

    match first_failure {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

/// Export only the fabrication layout.
pub fn export_layout(params: &StructureParams, path: &Path) -> Result<()> {
    let library = build_layout(params);
    write_file(&library, path)?;
    Ok(())
}

/// Write accepted resonances to a CSV file with a metadata header.
pub fn write_resonances_csv(
    records: &[ResonanceRecord],
    path: &Path,
    params: &StructureParams,
) -> Result<()> {
    use std::io::Write;

    let mut file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;

    writeln!(file, "# BicSim — Accepted resonances")?;
    writeln!(file, "# Version: {}", env!("CARGO_PKG_VERSION"))?;
    writeln!(
        file,
        "# structure: cells={}, pitch={:.1} nm, radius={:.1} nm, eps''={:.1e}",
        params.cells,
        params.pitch * 1e9,
        params.radius * 1e9,
        params.epsilon.im
    )?;
    writeln!(file, "#")?;
    writeln!(file, "frequency_thz,q,linewidth_mhz")?;

    for r in records {
        writeln!(
            file,
            "{:.6},{:.6e},{:.6e}",
            r.frequency_thz,
            r.q,
            r.linewidth_mhz()
        )?;
    }

    Ok(())
}

/// Write accepted resonances to a JSON file.
pub fn write_resonances_json(records: &[ResonanceRecord], path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(records)
        .map_err(|e| anyhow::anyhow!("JSON serialisation error: {e}"))?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extreme_loss_reports_reference_fallback() {
        // A structure lossy enough that every mode decays below the Q
        // threshold: the scan comes back empty and the report must fall
        // back to the design target.
        let params = StructureParams::new(
            num_complex::Complex64::new(12.1, 5.0),
            600e-9,
            202e-9,
            1550e-9,
            3,
        )
        .unwrap();
        let sweep = bicsim_core::scan::SweepConfig {
            points: 150,
            ..Default::default()
        };
        let backend = CpuBackend::new();

        let records = scan_resonances(&params, &sweep, &backend).unwrap();
        assert!(records.is_empty());

        let text = report::format_results(&records, &ReferenceSolution::default());
        assert!(text.contains("THEORETICAL REFERENCE"));
        assert!(text.contains("193.4145"));
    }

    #[test]
    fn test_csv_lists_all_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resonances.csv");
        let records = vec![
            ResonanceRecord { frequency_thz: 193.41, q: 3.0e5 },
            ResonanceRecord { frequency_thz: 193.42, q: 2.5e5 },
        ];

        write_resonances_csv(&records, &path, &StructureParams::certified()).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();

        assert!(text.contains("frequency_thz,q,linewidth_mhz"));
        assert_eq!(text.lines().filter(|l| !l.starts_with('#')).count(), 3);
        assert!(text.contains("193.410000"));
    }

    #[test]
    fn test_json_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resonances.json");
        let records = vec![ResonanceRecord { frequency_thz: 193.5, q: 4.0e5 }];

        write_resonances_json(&records, &path).unwrap();
        let back: Vec<ResonanceRecord> =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(back, records);
    }

    #[test]
    fn test_export_layout_writes_gds() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bic_array.gds");

        export_layout(&StructureParams::certified(), &path).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        // GDSII streams open with the 6-byte HEADER record.
        assert_eq!(&bytes[..4], &[0x00, 0x06, 0x00, 0x02]);
    }

    #[test]
    fn test_export_layout_surfaces_write_failure() {
        let missing = Path::new("/nonexistent-dir/bic_array.gds");
        assert!(export_layout(&StructureParams::certified(), missing).is_err());
    }
}
