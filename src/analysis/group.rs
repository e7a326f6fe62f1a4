// src/analysis/group.rs
use ndarray::{ArrayView2, Axis};
use serde::Serialize;

use crate::boundary::{contour_segments, BoundaryGrid, Point, Segment};
use crate::data::{DocLabel, Feature, FeatureGroup, Split};
use crate::error::{ClassifyError, ClassifyResult};
use crate::model::{roc_auc, LinearModel, Pipeline};
use crate::render::{Panel, ScatterSeries, SeriesKind};
use crate::utils::config::AnalysisConfig;
use crate::utils::logging::GroupLogger;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeatureAuc {
    pub feature: Feature,
    pub auc: f64,
}

/// Calibrated probability of the second training class for the designated
/// evaluation record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EvaluationProbability {
    /// Position within the evaluation partition.
    pub position: usize,
    /// Position within the dataset.
    pub dataset_index: usize,
    pub label: DocLabel,
    pub positive_label: DocLabel,
    pub probability: f64,
}

/// Everything produced for one feature group. The fitted pipeline is dropped
/// once these results are extracted.
#[derive(Debug, Clone)]
pub struct GroupAnalysis {
    pub group: FeatureGroup,
    pub feature_aucs: Vec<FeatureAuc>,
    pub model: LinearModel,
    pub evaluation: Option<EvaluationProbability>,
    pub grid: BoundaryGrid,
    pub boundary: Vec<Segment>,
}

/// Scores, fits, predicts and evaluates the boundary for one group. Any
/// failure aborts the whole group.
pub fn analyze_group(
    split: &Split<'_>,
    group: &FeatureGroup,
    config: &AnalysisConfig,
) -> ClassifyResult<GroupAnalysis> {
    let logger = GroupLogger::new(group.name);
    logger.log_start(split.training.len(), split.evaluation.len());

    let targets = split.binary_targets();

    logger.log_phase("Feature scoring", None);
    let mut feature_aucs = Vec::with_capacity(group.features.len());
    for feature in group.features {
        let scores = split.training.column(feature);
        let auc = roc_auc(&targets, &scores)?;
        logger.log_feature_auc(feature.as_str(), auc);
        feature_aucs.push(FeatureAuc { feature, auc });
    }

    logger.log_phase("Fitting pipeline", None);
    let x_train = split.training.project(group);
    let mut pipeline = Pipeline::new(config.margin);
    pipeline.fit(x_train.view(), &targets)?;
    let model = pipeline
        .model()
        .cloned()
        .ok_or(ClassifyError::NotFitted)?;

    logger.log_phase("Predicting evaluation records", None);
    let x_eval = split.evaluation.project(group);
    let evaluation = designated_probability(split, &pipeline, x_eval.view(), config, &logger)?;

    logger.log_phase(
        "Evaluating boundary",
        Some(&format!("{0}x{0} grid", config.grid_resolution)),
    );
    let grid = BoundaryGrid::evaluate(
        &pipeline,
        x_train.view(),
        config.grid_resolution,
        config.grid_padding,
    )?;
    let boundary = contour_segments(&grid, 0.0);
    logger.log_complete(boundary.len());

    Ok(GroupAnalysis {
        group: *group,
        feature_aucs,
        model,
        evaluation,
        grid,
        boundary,
    })
}

fn designated_probability(
    split: &Split<'_>,
    pipeline: &Pipeline,
    x_eval: ArrayView2<f64>,
    config: &AnalysisConfig,
    logger: &GroupLogger,
) -> ClassifyResult<Option<EvaluationProbability>> {
    if x_eval.nrows() == 0 {
        logger.log_missing_evaluation(config.evaluation.position(), 0);
        return Ok(None);
    }
    let proba = pipeline.predict_proba(x_eval)?;
    let position = config.evaluation.position();
    let (Some(record), Some(&dataset_index)) = (
        split.evaluation.get(position),
        split.evaluation.indices().get(position),
    ) else {
        logger.log_missing_evaluation(position, x_eval.nrows());
        return Ok(None);
    };
    let row = proba.index_axis(Axis(0), position);
    Ok(Some(EvaluationProbability {
        position,
        dataset_index,
        label: record.label(),
        positive_label: split.positive_label(),
        probability: row[1],
    }))
}

fn series_label(label: DocLabel) -> &'static str {
    match label {
        DocLabel::Uws => "Patients in VS/UWS",
        DocLabel::Mcs => "Patients in MCS",
        DocLabel::Ma => "Patient MA",
    }
}

impl GroupAnalysis {
    /// Scatter of both training classes and the evaluation records in raw
    /// coordinates, plus the zero-level boundary.
    pub fn to_panel(&self, split: &Split<'_>, show_legend: bool) -> Panel {
        let (x, y) = (self.group.x(), self.group.y());
        let points_for = |label: DocLabel, training: bool| -> Vec<Point> {
            let partition = if training {
                &split.training
            } else {
                &split.evaluation
            };
            partition
                .records()
                .filter(|r| r.label() == label)
                .map(|r| (r.value(x), r.value(y)))
                .collect()
        };

        let mut series = vec![
            ScatterSeries {
                label: series_label(split.negative_label()).to_string(),
                kind: SeriesKind::Negative,
                points: points_for(split.negative_label(), true),
            },
            ScatterSeries {
                label: series_label(split.positive_label()).to_string(),
                kind: SeriesKind::Positive,
                points: points_for(split.positive_label(), true),
            },
        ];
        let mut seen = Vec::new();
        for label in split.evaluation.labels() {
            if seen.contains(&label) {
                continue;
            }
            seen.push(label);
            series.push(ScatterSeries {
                label: series_label(label).to_string(),
                kind: SeriesKind::Evaluation,
                points: points_for(label, false),
            });
        }

        Panel {
            title: self.group.name.to_string(),
            x_label: x.to_string(),
            y_label: y.to_string(),
            series,
            boundary: self.boundary.clone(),
            show_legend,
        }
    }
}
