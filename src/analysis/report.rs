// src/analysis/report.rs
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use log::info;
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use uuid::Uuid;

use super::group::{EvaluationProbability, FeatureAuc, GroupAnalysis};
use crate::model::LinearModel;
use crate::utils::config::AnalysisConfig;

/// Per-group entry of the run report. Model parameters are in standardized
/// feature space.
#[derive(Debug, Clone, Serialize)]
pub struct GroupReport {
    pub name: String,
    pub features: Vec<String>,
    pub feature_aucs: Vec<FeatureAuc>,
    pub model: LinearModel,
    pub evaluation: Option<EvaluationProbability>,
    pub boundary_segments: usize,
}

impl From<&GroupAnalysis> for GroupReport {
    fn from(analysis: &GroupAnalysis) -> Self {
        Self {
            name: analysis.group.name.to_string(),
            features: analysis
                .group
                .features
                .iter()
                .map(|f| f.to_string())
                .collect(),
            feature_aucs: analysis.feature_aucs.clone(),
            model: analysis.model.clone(),
            evaluation: analysis.evaluation,
            boundary_segments: analysis.boundary.len(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub input: String,
    pub records: usize,
    pub training_records: usize,
    pub evaluation_records: usize,
    pub config: AnalysisConfig,
    pub groups: Vec<GroupReport>,
}

impl RunReport {
    pub fn new(
        input: &Path,
        records: usize,
        training_records: usize,
        evaluation_records: usize,
        config: &AnalysisConfig,
        groups: &[GroupAnalysis],
    ) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            input: input.display().to_string(),
            records,
            training_records,
            evaluation_records,
            config: *config,
            groups: groups.iter().map(GroupReport::from).collect(),
        }
    }

    pub fn write_json(&self, path: &Path) -> Result<()> {
        let file = File::create(path)
            .with_context(|| format!("Failed to create report file {}", path.display()))?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)
            .context("Failed to serialize run report")?;
        info!("Run report {} written to {}", self.run_id, path.display());
        Ok(())
    }
}
