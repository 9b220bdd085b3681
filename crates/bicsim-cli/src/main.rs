//! BicSim command-line interface.
//!
//! Run the full resonance analysis, validate a job file, or export the
//! fabrication layout on its own:
//! ```sh
//! bicsim run
//! bicsim run --config job.toml --output results/
//! bicsim validate job.toml
//! bicsim export --output fab/
//! ```
//! With no configuration file, the certified design parameters are used.

mod config;
mod plot;
mod report;
mod runner;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "bicsim")]
#[command(about = "BicSim: high-Q resonance search for BIC scatterer arrays")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full pipeline: sweep, report, plot, GDSII export, diagnostics.
    Run {
        /// Path to a TOML job configuration (defaults: certified design).
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Output directory (overrides config file setting).
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate a configuration file without running the simulation.
    Validate {
        /// Path to the job configuration file.
        config: PathBuf,
    },
    /// Export the fabrication layout only.
    Export {
        /// Path to a TOML job configuration (defaults: certified design).
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Output directory (overrides config file setting).
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn load_job(path: Option<&PathBuf>) -> anyhow::Result<config::JobConfig> {
    match path {
        Some(p) => {
            let job = config::load_config(p)?;
            println!("Configuration: {}", p.display());
            Ok(job)
        }
        None => {
            println!("Configuration: certified defaults");
            Ok(config::JobConfig::default())
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run { config, output } => {
            println!("BicSim Resonance Search");
            println!("=======================");
            let job = load_job(config.as_ref())?;
            let out_dir = output.unwrap_or_else(|| PathBuf::from(&job.output.directory));

            runner::run_pipeline(&job, &out_dir)?;

            println!("Analysis complete.");
            Ok(())
        }
        Commands::Validate { config } => {
            let job = config::load_config(&config)?;
            // Structure validation happens at conversion, not parse.
            job.structure.to_params()?;
            println!("Configuration is valid: {}", config.display());
            Ok(())
        }
        Commands::Export { config, output } => {
            let job = load_job(config.as_ref())?;
            let params = job.structure.to_params()?;
            let out_dir = output.unwrap_or_else(|| PathBuf::from(&job.output.directory));
            std::fs::create_dir_all(&out_dir)?;

            let path = out_dir.join(&job.output.gds_file);
            runner::export_layout(&params, &path)?;
            println!("GDSII file saved as {}", path.display());
            Ok(())
        }
    }
}
