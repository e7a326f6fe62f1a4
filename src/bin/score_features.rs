// src/bin/score_features.rs
use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use std::path::PathBuf;

use doc_lib::data::{Dataset, HEMISPHERE_GROUPS, TRAINING_LABELS};
use doc_lib::model::roc_auc;
use doc_lib::utils::env::load_env;
use doc_lib::utils::logging::init_logger;

#[derive(Parser)]
#[command(author, version, about = "Univariate AUC of every hemisphere feature", long_about = None)]
struct ScoreArgs {
    /// Headerless table: code, LH_Occ, LH_Temp, RH_Occ, RH_Temp
    #[arg(long)]
    input: PathBuf,
}

fn main() -> Result<()> {
    let args = ScoreArgs::parse();
    init_logger(false);
    load_env();

    let dataset = Dataset::load(&args.input)
        .with_context(|| format!("Failed to load dataset from {}", args.input.display()))?;
    let split = dataset.split(TRAINING_LABELS);
    let targets = split.binary_targets();
    info!(
        "📊 Scoring features on {} training records ({} vs {})",
        split.training.len(),
        split.negative_label(),
        split.positive_label()
    );

    println!("\n=== Feature AUC ===");
    for group in HEMISPHERE_GROUPS.iter() {
        println!("{}", group.name);
        for feature in group.features {
            let auc = roc_auc(&targets, &split.training.column(feature))
                .with_context(|| format!("Failed to score {} in {}", feature, group.name))?;
            println!("AUC for {} = {}", feature, auc);
        }
    }
    Ok(())
}
