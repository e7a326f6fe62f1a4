// src/utils/config.rs
use log::info;
use serde::Serialize;

use super::env::env_or;
use crate::model::MarginParams;

pub const DEFAULT_GRID_RESOLUTION: usize = 30;

/// Which evaluation-partition record gets its probability reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EvaluationSelection {
    /// The first evaluation record in dataset order.
    First,
    /// The n-th (0-based) evaluation record in dataset order.
    Index(usize),
}

impl EvaluationSelection {
    pub fn position(&self) -> usize {
        match self {
            EvaluationSelection::First => 0,
            EvaluationSelection::Index(n) => *n,
        }
    }
}

impl Default for EvaluationSelection {
    fn default() -> Self {
        EvaluationSelection::First
    }
}

/// Settings shared by every feature group in a run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AnalysisConfig {
    pub margin: MarginParams,
    /// Lattice points per axis for boundary evaluation.
    pub grid_resolution: usize,
    /// Fractional padding around the training bounding box.
    pub grid_padding: f64,
    pub evaluation: EvaluationSelection,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            margin: MarginParams::default(),
            grid_resolution: DEFAULT_GRID_RESOLUTION,
            grid_padding: 0.0,
            evaluation: EvaluationSelection::First,
        }
    }
}

impl AnalysisConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let margin = MarginParams {
            c: env_or("DOC_SVM_C", defaults.margin.c),
            tolerance: env_or("DOC_SVM_TOLERANCE", defaults.margin.tolerance),
            calibration_folds: env_or("DOC_CALIBRATION_FOLDS", defaults.margin.calibration_folds),
            seed: env_or("DOC_RANDOM_SEED", defaults.margin.seed),
        };
        Self {
            margin,
            grid_resolution: env_or("DOC_GRID_RESOLUTION", defaults.grid_resolution),
            grid_padding: env_or("DOC_GRID_PADDING", defaults.grid_padding),
            evaluation: defaults.evaluation,
        }
    }

    pub fn log_config(&self) {
        info!(
            "Margin classifier: C={}, tolerance={}",
            self.margin.c, self.margin.tolerance
        );
        info!(
            "Calibration: {} folds, seed {}",
            self.margin.calibration_folds, self.margin.seed
        );
        info!(
            "Boundary grid: {}x{} points, padding {}",
            self.grid_resolution, self.grid_resolution, self.grid_padding
        );
        info!("Evaluation record selection: {:?}", self.evaluation);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn test_default_config() {
        let config = AnalysisConfig::default();
        assert_eq!(config.margin.c, 1.0);
        assert_eq!(config.margin.calibration_folds, 5);
        assert_eq!(config.grid_resolution, 30);
        assert_eq!(config.grid_padding, 0.0);
        assert_eq!(config.evaluation, EvaluationSelection::First);
    }

    #[test]
    fn test_env_config() {
        env::set_var("DOC_SVM_C", "0.5");
        env::set_var("DOC_CALIBRATION_FOLDS", "3");
        env::set_var("DOC_GRID_RESOLUTION", "not-a-number");

        let config = AnalysisConfig::from_env();
        assert_eq!(config.margin.c, 0.5);
        assert_eq!(config.margin.calibration_folds, 3);
        assert_eq!(config.grid_resolution, DEFAULT_GRID_RESOLUTION);

        env::remove_var("DOC_SVM_C");
        env::remove_var("DOC_CALIBRATION_FOLDS");
        env::remove_var("DOC_GRID_RESOLUTION");
    }

    #[test]
    fn test_selection_position() {
        assert_eq!(EvaluationSelection::First.position(), 0);
        assert_eq!(EvaluationSelection::Index(4).position(), 4);
    }
}
