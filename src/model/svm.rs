// src/model/svm.rs
use linfa::prelude::*;
use linfa_svm::Svm;
use log::{debug, info, warn};
use ndarray::{Array1, Array2, ArrayView2, Axis};
use serde::Serialize;

use super::calibration::{stratified_folds, PlattScaling};
use crate::error::{ClassifyError, ClassifyResult};

/// Hyper-parameters for the linear soft-margin classifier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MarginParams {
    /// Soft-margin trade-off constant.
    pub c: f64,
    /// Solver stopping tolerance.
    pub tolerance: f64,
    /// Folds used to produce out-of-sample scores for calibration.
    pub calibration_folds: usize,
    /// Seed for the calibration fold shuffle.
    pub seed: u64,
}

impl Default for MarginParams {
    fn default() -> Self {
        Self {
            c: 1.0,
            tolerance: 1e-3,
            calibration_folds: 5,
            seed: 0,
        }
    }
}

/// Fitted state: `w·x + b` plus the probability mapping.
#[derive(Debug, Clone, Serialize)]
pub struct LinearModel {
    pub weights: Vec<f64>,
    pub bias: f64,
    pub support_vectors: usize,
    pub calibration: PlattScaling,
}

/// Linear, class-balanced, probability-calibrated binary classifier.
///
/// Targets are 0/1. Positive decision values favour target 1.
#[derive(Debug, Clone)]
pub struct MarginClassifier {
    params: MarginParams,
    model: Option<LinearModel>,
}

impl MarginClassifier {
    pub fn new(params: MarginParams) -> Self {
        Self {
            params,
            model: None,
        }
    }

    pub fn params(&self) -> &MarginParams {
        &self.params
    }

    pub fn model(&self) -> Option<&LinearModel> {
        self.model.as_ref()
    }

    pub fn fit(&mut self, x: ArrayView2<f64>, targets: &[usize]) -> ClassifyResult<()> {
        self.model = Some(train(x, targets, &self.params)?);
        Ok(())
    }

    /// Signed distance-like margin score `w·x + b` per row.
    pub fn decision_function(&self, x: ArrayView2<f64>) -> ClassifyResult<Array1<f64>> {
        let model = self.model.as_ref().ok_or(ClassifyError::NotFitted)?;
        if x.ncols() != model.weights.len() {
            return Err(ClassifyError::DimensionMismatch {
                expected: model.weights.len(),
                found: x.ncols(),
            });
        }
        let w = Array1::from(model.weights.clone());
        Ok(x.dot(&w) + model.bias)
    }

    /// Rows x 2 matrix of calibrated `[P(target 0), P(target 1)]`.
    pub fn predict_proba(&self, x: ArrayView2<f64>) -> ClassifyResult<Array2<f64>> {
        let decisions = self.decision_function(x)?;
        let model = self.model.as_ref().ok_or(ClassifyError::NotFitted)?;
        let mut proba = Array2::zeros((decisions.len(), 2));
        for (mut row, &f) in proba.outer_iter_mut().zip(decisions.iter()) {
            let p = model.calibration.probability(f);
            row[0] = 1.0 - p;
            row[1] = p;
        }
        Ok(proba)
    }

    pub fn predict(&self, x: ArrayView2<f64>) -> ClassifyResult<Vec<usize>> {
        Ok(self
            .decision_function(x)?
            .iter()
            .map(|&f| usize::from(f > 0.0))
            .collect())
    }
}

fn validate(x: &ArrayView2<f64>, targets: &[usize]) -> ClassifyResult<[usize; 2]> {
    if x.nrows() != targets.len() {
        return Err(ClassifyError::DimensionMismatch {
            expected: x.nrows(),
            found: targets.len(),
        });
    }
    if targets.is_empty() {
        return Err(ClassifyError::EmptyInput);
    }
    let mut counts = [0usize; 2];
    for &t in targets {
        *counts.get_mut(t).ok_or(ClassifyError::InvalidLabel(t))? += 1;
    }
    let distinct = counts.iter().filter(|&&c| c > 0).count();
    if distinct < 2 {
        return Err(ClassifyError::DegenerateTrainingSet { distinct });
    }
    Ok(counts)
}

fn train(x: ArrayView2<f64>, targets: &[usize], params: &MarginParams) -> ClassifyResult<LinearModel> {
    let counts = validate(&x, targets)?;
    let n = targets.len() as f64;
    // balanced weighting: n / (n_classes * n_c)
    let class_bounds = [
        params.c * n / (2.0 * counts[0] as f64),
        params.c * n / (2.0 * counts[1] as f64),
    ];
    debug!(
        "Class counts {:?}, per-class soft-margin bounds {:?}",
        counts, class_bounds
    );

    let hyperplane = fit_hyperplane(x, targets, class_bounds, params)?;
    let decisions = calibration_scores(x, targets, counts, class_bounds, params, &hyperplane)?;
    let calibration = PlattScaling::fit(&decisions, targets);

    info!(
        "Margin classifier fitted: {} support vectors, bias {:.4}, calibration slope {:.4}",
        hyperplane.support_vectors, hyperplane.bias, calibration.slope
    );
    Ok(LinearModel {
        weights: hyperplane.weights.to_vec(),
        bias: hyperplane.bias,
        support_vectors: hyperplane.support_vectors,
        calibration,
    })
}

/// Decision values used to fit calibration: out-of-fold when every class has
/// at least two members, in-sample otherwise.
fn calibration_scores(
    x: ArrayView2<f64>,
    targets: &[usize],
    counts: [usize; 2],
    class_bounds: [f64; 2],
    params: &MarginParams,
    full: &Hyperplane,
) -> ClassifyResult<Vec<f64>> {
    let folds = params.calibration_folds.min(counts[0]).min(counts[1]);
    if folds < 2 {
        warn!(
            "Too few samples per class ({:?}) for cross-validated calibration; using in-sample scores",
            counts
        );
        return Ok(full.decide(x).to_vec());
    }

    let assignment = stratified_folds(targets, folds, params.seed);
    let mut decisions = vec![0.0; targets.len()];
    for fold in 0..folds {
        let (held_out, kept): (Vec<usize>, Vec<usize>) =
            (0..targets.len()).partition(|&i| assignment[i] == fold);
        let kept_targets: Vec<usize> = kept.iter().map(|&i| targets[i]).collect();
        let held_x = x.select(Axis(0), &held_out);

        let has_negative = kept_targets.contains(&0);
        let has_positive = kept_targets.contains(&1);
        let scores = if has_negative && has_positive {
            let kept_x = x.select(Axis(0), &kept);
            fit_hyperplane(kept_x.view(), &kept_targets, class_bounds, params)?
                .decide(held_x.view())
        } else {
            Array1::from_elem(held_out.len(), if has_positive { 1.0 } else { -1.0 })
        };
        for (&idx, &score) in held_out.iter().zip(scores.iter()) {
            decisions[idx] = score;
        }
    }
    Ok(decisions)
}

struct Hyperplane {
    weights: Array1<f64>,
    bias: f64,
    support_vectors: usize,
}

impl Hyperplane {
    fn decide(&self, x: ArrayView2<f64>) -> Array1<f64> {
        x.dot(&self.weights) + self.bias
    }
}

/// Trains a linear-kernel SVM with per-class penalties and recovers the
/// primal hyperplane `w = sum(alpha_i x_i)`, `b = -rho`. The solver's
/// multipliers already carry the sign of their class.
fn fit_hyperplane(
    x: ArrayView2<f64>,
    targets: &[usize],
    class_bounds: [f64; 2],
    params: &MarginParams,
) -> ClassifyResult<Hyperplane> {
    let labels: Array1<bool> = targets.iter().map(|&t| t == 1).collect();
    let dataset = Dataset::new(x.to_owned(), labels);

    let svm = Svm::<f64, bool>::params()
        .pos_neg_weights(class_bounds[1], class_bounds[0])
        .eps(params.tolerance)
        .linear_kernel()
        .fit(&dataset)
        .map_err(|e| ClassifyError::Solver(e.to_string()))?;

    let mut weights = Array1::zeros(x.ncols());
    let mut support_vectors = 0;
    for (row, &alpha) in x.outer_iter().zip(svm.alpha.iter()) {
        if alpha != 0.0 {
            weights.scaled_add(alpha, &row);
            support_vectors += 1;
        }
    }
    debug!(
        "Linear SVM trained on {} rows: {} support vectors, rho {:.6}",
        targets.len(),
        support_vectors,
        svm.rho
    );

    Ok(Hyperplane {
        weights,
        bias: -svm.rho,
        support_vectors,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use proptest::prelude::*;

    fn separable() -> (Array2<f64>, Vec<usize>) {
        let x = array![
            [-2.0, -1.0],
            [-1.5, -2.0],
            [-2.5, -1.5],
            [-1.0, -1.2],
            [1.0, 1.2],
            [2.0, 1.0],
            [1.5, 2.0],
            [2.5, 1.5]
        ];
        (x, vec![0, 0, 0, 0, 1, 1, 1, 1])
    }

    fn fitted() -> MarginClassifier {
        let (x, y) = separable();
        let mut clf = MarginClassifier::new(MarginParams::default());
        clf.fit(x.view(), &y).unwrap();
        clf
    }

    #[test]
    fn test_separable_data_is_classified() {
        let (x, y) = separable();
        let clf = fitted();
        assert_eq!(clf.predict(x.view()).unwrap(), y);
        let model = clf.model().unwrap();
        assert!(model.weights.iter().all(|&w| w > 0.0));
        assert!(model.support_vectors >= 2);
    }

    #[test]
    fn test_symmetric_data_has_near_zero_bias() {
        let clf = fitted();
        assert!(clf.model().unwrap().bias.abs() < 0.05);
    }

    #[test]
    fn test_margin_constraints_hold_for_hard_margin() {
        let (x, y) = separable();
        let mut clf = MarginClassifier::new(MarginParams {
            c: 1000.0,
            ..MarginParams::default()
        });
        clf.fit(x.view(), &y).unwrap();
        let decisions = clf.decision_function(x.view()).unwrap();
        for (&f, &t) in decisions.iter().zip(&y) {
            let signed = if t == 1 { f } else { -f };
            assert!(signed > 0.95, "margin violated: {}", signed);
        }
    }

    #[test]
    fn test_imbalanced_classes_are_both_recovered() {
        let mut rows = Vec::new();
        let mut y = Vec::new();
        for i in 0..12 {
            rows.push([-1.0 - 0.1 * i as f64, -1.0 + 0.05 * i as f64]);
            y.push(0);
        }
        for i in 0..3 {
            rows.push([1.0 + 0.2 * i as f64, 1.0]);
            y.push(1);
        }
        let x = Array2::from_shape_fn((rows.len(), 2), |(i, j)| rows[i][j]);
        let mut clf = MarginClassifier::new(MarginParams::default());
        clf.fit(x.view(), &y).unwrap();
        assert_eq!(clf.predict(x.view()).unwrap(), y);
    }

    #[test]
    fn test_degenerate_and_unfitted() {
        let x = array![[1.0, 2.0], [2.0, 3.0]];
        let mut clf = MarginClassifier::new(MarginParams::default());
        assert!(matches!(
            clf.decision_function(x.view()),
            Err(ClassifyError::NotFitted)
        ));
        assert!(matches!(
            clf.predict_proba(x.view()),
            Err(ClassifyError::NotFitted)
        ));
        assert!(matches!(
            clf.fit(x.view(), &[1, 1]),
            Err(ClassifyError::DegenerateTrainingSet { distinct: 1 })
        ));
        assert!(matches!(
            clf.fit(x.view(), &[0, 2]),
            Err(ClassifyError::InvalidLabel(2))
        ));
        assert!(matches!(
            clf.fit(x.view(), &[0]),
            Err(ClassifyError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_fit_is_deterministic() {
        let (x, y) = separable();
        let probe = array![[0.3, -0.7], [5.0, 4.0], [-0.1, 0.05]];
        let mut a = MarginClassifier::new(MarginParams::default());
        let mut b = MarginClassifier::new(MarginParams::default());
        a.fit(x.view(), &y).unwrap();
        b.fit(x.view(), &y).unwrap();
        assert_eq!(
            a.decision_function(probe.view()).unwrap(),
            b.decision_function(probe.view()).unwrap()
        );
        assert_eq!(
            a.predict_proba(probe.view()).unwrap(),
            b.predict_proba(probe.view()).unwrap()
        );
    }

    proptest! {
        #[test]
        fn prop_probabilities_are_valid_and_agree_with_margin(
            points in prop::collection::vec((-10.0f64..10.0, -10.0f64..10.0), 1..30)
        ) {
            let clf = fitted();
            let x = Array2::from_shape_fn((points.len(), 2), |(i, j)| {
                if j == 0 { points[i].0 } else { points[i].1 }
            });
            let decisions = clf.decision_function(x.view()).unwrap();
            let proba = clf.predict_proba(x.view()).unwrap();
            for (row, &f) in proba.outer_iter().zip(decisions.iter()) {
                prop_assert!((0.0..=1.0).contains(&row[0]));
                prop_assert!((0.0..=1.0).contains(&row[1]));
                prop_assert!((row[0] + row[1] - 1.0).abs() < 1e-12);
                if f > 0.0 {
                    prop_assert!(row[1] > row[0]);
                } else if f < 0.0 {
                    prop_assert!(row[0] > row[1]);
                }
            }
        }
    }
}
