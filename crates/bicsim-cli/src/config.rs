//! TOML configuration deserialisation for simulation jobs.
//!
//! Every field defaults to the certified design, so `bicsim run` without a
//! configuration file reproduces the reference analysis exactly. Geometric
//! lengths are given in nanometres in the file and converted to metres at
//! this boundary.

use num_complex::Complex64;
use serde::Deserialize;

use bicsim_core::scan::SweepConfig;
use bicsim_core::types::{ParamError, StructureParams};

/// Top-level job configuration.
#[derive(Debug, Default, Deserialize)]
pub struct JobConfig {
    #[serde(default)]
    pub structure: StructureConfig,
    #[serde(default)]
    pub sweep: SweepSection,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Structure parameters from TOML (lengths in nm).
#[derive(Debug, Deserialize)]
pub struct StructureConfig {
    #[serde(default = "default_epsilon_real")]
    pub epsilon_real: f64,
    #[serde(default = "default_epsilon_imag")]
    pub epsilon_imag: f64,
    #[serde(default = "default_pitch_nm")]
    pub pitch_nm: f64,
    #[serde(default = "default_radius_nm")]
    pub radius_nm: f64,
    #[serde(default = "default_wavelength_nm")]
    pub wavelength_nm: f64,
    #[serde(default = "default_cells")]
    pub cells: usize,
}

fn default_epsilon_real() -> f64 {
    12.1
}
fn default_epsilon_imag() -> f64 {
    6.0e-7
}
fn default_pitch_nm() -> f64 {
    600.0
}
fn default_radius_nm() -> f64 {
    202.0
}
fn default_wavelength_nm() -> f64 {
    1550.0
}
fn default_cells() -> usize {
    20
}

impl Default for StructureConfig {
    fn default() -> Self {
        Self {
            epsilon_real: default_epsilon_real(),
            epsilon_imag: default_epsilon_imag(),
            pitch_nm: default_pitch_nm(),
            radius_nm: default_radius_nm(),
            wavelength_nm: default_wavelength_nm(),
            cells: default_cells(),
        }
    }
}

impl StructureConfig {
    /// Convert to validated structure parameters (nm → m).
    pub fn to_params(&self) -> Result<StructureParams, ParamError> {
        StructureParams::new(
            Complex64::new(self.epsilon_real, self.epsilon_imag),
            self.pitch_nm * 1e-9,
            self.radius_nm * 1e-9,
            self.wavelength_nm * 1e-9,
            self.cells,
        )
    }
}

/// Sweep parameters from TOML.
#[derive(Debug, Deserialize)]
pub struct SweepSection {
    #[serde(default = "default_points")]
    pub points: usize,
    #[serde(default = "default_band")]
    pub band: [f64; 2],
    #[serde(default = "default_window_thz")]
    pub window_thz: [f64; 2],
    #[serde(default = "default_min_decay_rate")]
    pub min_decay_rate: f64,
    #[serde(default = "default_min_q")]
    pub min_q: f64,
}

fn default_points() -> usize {
    SweepConfig::default().points
}
fn default_band() -> [f64; 2] {
    SweepConfig::default().band
}
fn default_window_thz() -> [f64; 2] {
    SweepConfig::default().window_thz
}
fn default_min_decay_rate() -> f64 {
    SweepConfig::default().min_decay_rate
}
fn default_min_q() -> f64 {
    SweepConfig::default().min_q
}

impl Default for SweepSection {
    fn default() -> Self {
        let d = SweepConfig::default();
        Self {
            points: d.points,
            band: d.band,
            window_thz: d.window_thz,
            min_decay_rate: d.min_decay_rate,
            min_q: d.min_q,
        }
    }
}

impl SweepSection {
    pub fn to_sweep_config(&self) -> SweepConfig {
        SweepConfig {
            points: self.points,
            band: self.band,
            window_thz: self.window_thz,
            min_decay_rate: self.min_decay_rate,
            min_q: self.min_q,
        }
    }
}

/// Output configuration.
#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    /// Output directory (default: "./output").
    #[serde(default = "default_output_dir")]
    pub directory: String,
    /// Scatter-plot file name (default: "bic_resonances.png").
    #[serde(default = "default_plot_file")]
    pub plot_file: String,
    /// Fabrication-layout file name (default: "bic_array.gds").
    #[serde(default = "default_gds_file")]
    pub gds_file: String,
    /// Whether to render the scatter plot (default: true).
    #[serde(default = "default_true")]
    pub save_plot: bool,
    /// Whether to export the GDSII layout (default: true).
    #[serde(default = "default_true")]
    pub save_gds: bool,
    /// Whether to dump accepted resonances as CSV (default: false).
    #[serde(default)]
    pub save_csv: bool,
    /// Whether to also dump accepted resonances as JSON (default: false).
    #[serde(default)]
    pub save_json: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_dir(),
            plot_file: default_plot_file(),
            gds_file: default_gds_file(),
            save_plot: true,
            save_gds: true,
            save_csv: false,
            save_json: false,
        }
    }
}

fn default_output_dir() -> String {
    "./output".into()
}
fn default_plot_file() -> String {
    "bic_resonances.png".into()
}
fn default_gds_file() -> String {
    "bic_array.gds".into()
}
fn default_true() -> bool {
    true
}

/// Load and parse a TOML job configuration file.
pub fn load_config(path: &std::path::Path) -> anyhow::Result<JobConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: JobConfig = toml::from_str(&content)?;
    Ok(config)
}
