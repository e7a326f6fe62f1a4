// src/analysis/mod.rs
pub mod group;
pub mod report;

pub use group::{analyze_group, EvaluationProbability, FeatureAuc, GroupAnalysis};
pub use report::{GroupReport, RunReport};

use log::info;

use crate::data::{Dataset, FeatureGroup, TRAINING_LABELS};
use crate::error::ClassifyResult;
use crate::render::Figure;
use crate::utils::config::AnalysisConfig;
use crate::utils::progress_config::ProgressConfig;

/// Results of a complete run: one analysis and one panel per feature group.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub groups: Vec<GroupAnalysis>,
    pub figure: Figure,
    pub training_records: usize,
    pub evaluation_records: usize,
}

/// Splits the dataset once, then analyses every group independently. The
/// first failing group aborts the run.
pub fn run_analysis(
    dataset: &Dataset,
    groups: &[FeatureGroup],
    config: &AnalysisConfig,
    progress: &ProgressConfig,
) -> ClassifyResult<RunOutcome> {
    let split = dataset.split(TRAINING_LABELS);
    info!(
        "Split {} records into {} training ({} / {}) and {} evaluation records",
        dataset.len(),
        split.training.len(),
        split.negative_label(),
        split.positive_label(),
        split.evaluation.len()
    );

    let pb = progress.create_bar(groups.len() as u64);
    let mut figure = Figure::default();
    let mut analyses = Vec::with_capacity(groups.len());

    for (idx, group) in groups.iter().enumerate() {
        if let Some(pb) = &pb {
            if progress.should_show_detailed() {
                pb.set_message(format!("Analysing {}", group.name));
            }
        }

        let analysis = analyze_group(&split, group, config)?;
        let show_legend = idx + 1 == groups.len();
        figure.push(analysis.to_panel(&split, show_legend));
        analyses.push(analysis);

        if let Some(pb) = &pb {
            pb.inc(1);
        }
    }

    if let Some(pb) = &pb {
        pb.finish_with_message("All feature groups analysed");
    }

    Ok(RunOutcome {
        groups: analyses,
        figure,
        training_records: split.training.len(),
        evaluation_records: split.evaluation.len(),
    })
}

/// Human-readable diagnostics for one group, printed to stdout.
pub fn print_group_diagnostics(analysis: &GroupAnalysis) {
    println!("Using only {}", analysis.group.name);
    for entry in &analysis.feature_aucs {
        println!("AUC for {} = {}", entry.feature, entry.auc);
    }
    if let Some(evaluation) = &analysis.evaluation {
        println!(
            "Prob {} {} Pat {}: {}",
            analysis.group.name,
            evaluation.positive_label,
            evaluation.position + 1,
            evaluation.probability
        );
    }
}
