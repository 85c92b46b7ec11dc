//! atlas-fd command line
//!
//! ```text
//! atlas-fd --atlas atlas.nii.gz --labels-json labels.json --out fd_aal90.csv
//! ```
//!
//! Logging is controlled by `RUST_LOG` (default `atlas_fd=info`).

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use atlas_fd::labels::DEFAULT_MAX_LABEL_ID;
use atlas_fd::{run, FdParams, RunConfig, DEFAULT_SCALES};

/// Box-counting fractal dimension of atlas region surfaces
#[derive(Parser)]
#[command(name = "atlas-fd")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Labeled atlas volume (.nii or .nii.gz)
    #[arg(long)]
    atlas: PathBuf,

    /// Label dictionary: JSON array of {"id", "name"} records
    #[arg(long = "labels-json", alias = "labels_json")]
    labels_json: PathBuf,

    /// Output CSV path
    #[arg(long)]
    out: PathBuf,

    /// Box sizes in voxels, comma separated
    #[arg(long, value_delimiter = ',', default_values_t = DEFAULT_SCALES.to_vec())]
    scales: Vec<f64>,

    /// Only labels with id below this value are processed
    #[arg(long, default_value_t = DEFAULT_MAX_LABEL_ID)]
    max_label_id: i64,

    /// Worker threads (0 = one per core)
    #[arg(long, default_value_t = 0)]
    jobs: usize,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("atlas_fd=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    rayon::ThreadPoolBuilder::new()
        .num_threads(cli.jobs)
        .build_global()
        .context("failed to start worker pool")?;

    let config = RunConfig {
        atlas: cli.atlas,
        labels_json: cli.labels_json,
        out: cli.out,
        params: FdParams {
            scales: cli.scales,
            max_label_id: cli.max_label_id,
        },
    };

    run(&config).with_context(|| format!("fractal dimension run failed for '{}'", config.atlas.display()))?;
    Ok(())
}
