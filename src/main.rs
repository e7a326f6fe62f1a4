// src/main.rs
use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};
use std::path::PathBuf;
use std::time::Instant;

use doc_lib::analysis::{print_group_diagnostics, run_analysis, RunReport};
use doc_lib::data::{Dataset, HEMISPHERE_GROUPS};
use doc_lib::render::render_svg;
use doc_lib::utils::config::{AnalysisConfig, EvaluationSelection};
use doc_lib::utils::env::load_env;
use doc_lib::utils::logging::init_logger;
use doc_lib::utils::progress_config::ProgressConfig;

#[derive(Parser)]
#[command(author, version, about = "Per-hemisphere DOC classification and boundary figure", long_about = None)]
struct ClassifyArgs {
    /// Headerless table: code, LH_Occ, LH_Temp, RH_Occ, RH_Temp
    #[arg(long)]
    input: PathBuf,

    /// SVG figure destination
    #[arg(long, default_value = "fig_clf.svg")]
    output: PathBuf,

    /// Optional JSON run report destination
    #[arg(long)]
    report: Option<PathBuf>,

    /// 0-based position of the evaluation record whose probability is reported
    #[arg(long)]
    evaluation_index: Option<usize>,

    /// Seed for calibration fold assignment
    #[arg(long)]
    seed: Option<u64>,

    /// Soft-margin penalty
    #[arg(long)]
    c: Option<f64>,

    /// Lattice points per axis for the boundary grid
    #[arg(long)]
    grid_resolution: Option<usize>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl ClassifyArgs {
    fn apply(&self, config: &mut AnalysisConfig) {
        if let Some(index) = self.evaluation_index {
            config.evaluation = EvaluationSelection::Index(index);
        }
        if let Some(seed) = self.seed {
            config.margin.seed = seed;
        }
        if let Some(c) = self.c {
            config.margin.c = c;
        }
        if let Some(resolution) = self.grid_resolution {
            config.grid_resolution = resolution;
        }
    }
}

fn main() -> Result<()> {
    let args = ClassifyArgs::parse();
    init_logger(args.verbose);
    load_env();

    let start_time = Instant::now();
    info!("🚀 Starting hemisphere classification");

    let mut config = AnalysisConfig::from_env();
    args.apply(&mut config);
    config.log_config();
    let progress = ProgressConfig::from_env();

    let dataset = Dataset::load(&args.input)
        .with_context(|| format!("Failed to load dataset from {}", args.input.display()))?;
    if dataset.is_empty() {
        warn!("⚠️ {} contains no records", args.input.display());
    }

    let outcome = run_analysis(&dataset, &HEMISPHERE_GROUPS, &config, &progress)
        .context("Feature group analysis failed")?;

    for analysis in &outcome.groups {
        print_group_diagnostics(analysis);
    }

    render_svg(&outcome.figure, &args.output)?;

    if let Some(report_path) = &args.report {
        RunReport::new(
            &args.input,
            dataset.len(),
            outcome.training_records,
            outcome.evaluation_records,
            &config,
            &outcome.groups,
        )
        .write_json(report_path)?;
    }

    info!(
        "✅ Classification complete in {:.2?}; figure written to {}",
        start_time.elapsed(),
        args.output.display()
    );
    Ok(())
}
