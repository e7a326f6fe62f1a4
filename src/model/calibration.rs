// src/model/calibration.rs
//! Probability calibration of margin scores.
//!
//! Decision values are mapped to probabilities with a one-parameter logistic
//! curve `P(positive | f) = 1 / (1 + exp(-slope * f))`. The intercept is held
//! at zero and the slope is kept positive, so a positive margin always maps
//! to a positive-class probability above one half.

use log::{debug, warn};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::Serialize;

const MAX_NEWTON_ITER: usize = 100;
const MIN_STEP: f64 = 1e-10;
const GRADIENT_EPS: f64 = 1e-5;
const HESSIAN_RIDGE: f64 = 1e-12;
/// Floor for the fitted slope.
pub const MIN_SLOPE: f64 = 1e-6;
/// Closest probabilities to one half that still name a side; both are exact
/// in f64 and sum to 1 with their complements.
const ABOVE_HALF: f64 = 0.5 + f64::EPSILON;
const BELOW_HALF: f64 = 0.5 - f64::EPSILON;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlattScaling {
    pub slope: f64,
}

impl PlattScaling {
    /// Fits the slope by Newton's method with backtracking on the negative
    /// log-likelihood, using Platt's smoothed targets instead of hard 0/1.
    pub fn fit(decisions: &[f64], targets: &[usize]) -> Self {
        let positives = targets.iter().filter(|&&t| t == 1).count() as f64;
        let negatives = targets.len() as f64 - positives;
        let hi_target = (positives + 1.0) / (positives + 2.0);
        let lo_target = 1.0 / (negatives + 2.0);
        let soft: Vec<f64> = targets
            .iter()
            .map(|&t| if t == 1 { hi_target } else { lo_target })
            .collect();

        let mut slope = 0.0;
        let mut loss = neg_log_likelihood(decisions, &soft, slope);
        let mut iterations = 0;
        while iterations < MAX_NEWTON_ITER {
            let (gradient, hessian) = derivatives(decisions, &soft, slope);
            if gradient.abs() < GRADIENT_EPS {
                break;
            }
            let direction = -gradient / (hessian + HESSIAN_RIDGE);

            let mut step = 1.0;
            let mut accepted = false;
            while step >= MIN_STEP {
                let candidate = slope + step * direction;
                let candidate_loss = neg_log_likelihood(decisions, &soft, candidate);
                if candidate_loss < loss + 1e-4 * step * gradient * direction {
                    slope = candidate;
                    loss = candidate_loss;
                    accepted = true;
                    break;
                }
                step /= 2.0;
            }
            iterations += 1;
            if !accepted {
                warn!("Calibration line search failed after {} iterations", iterations);
                break;
            }
        }

        if slope < MIN_SLOPE {
            warn!(
                "Calibration slope {:.3e} is not positive; clamping to {:.0e}",
                slope, MIN_SLOPE
            );
            slope = MIN_SLOPE;
        }
        debug!(
            "Calibration fitted: slope={:.6}, loss={:.6}, iterations={}",
            slope, loss, iterations
        );
        Self { slope }
    }

    /// Probability of the positive class for one decision value.
    ///
    /// The result is strictly above one half for positive decisions and
    /// strictly below for negative ones, even when the logistic curve rounds
    /// to exactly 0.5.
    pub fn probability(&self, decision: f64) -> f64 {
        let p = sigmoid(self.slope * decision);
        if decision > 0.0 && p <= 0.5 {
            ABOVE_HALF
        } else if decision < 0.0 && p >= 0.5 {
            BELOW_HALF
        } else {
            p
        }
    }
}

fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

/// log(1 + exp(z)) without overflow.
fn softplus(z: f64) -> f64 {
    z.max(0.0) + (-z.abs()).exp().ln_1p()
}

fn neg_log_likelihood(decisions: &[f64], targets: &[f64], slope: f64) -> f64 {
    decisions
        .iter()
        .zip(targets)
        .map(|(&f, &t)| {
            let z = slope * f;
            softplus(z) - t * z
        })
        .sum()
}

fn derivatives(decisions: &[f64], targets: &[f64], slope: f64) -> (f64, f64) {
    decisions
        .iter()
        .zip(targets)
        .fold((0.0, 0.0), |(g, h), (&f, &t)| {
            let p = sigmoid(slope * f);
            (g + (p - t) * f, h + p * (1.0 - p) * f * f)
        })
}

/// Assigns every sample to one of `folds` folds, spreading each class evenly
/// across folds after a seeded shuffle.
pub fn stratified_folds(targets: &[usize], folds: usize, seed: u64) -> Vec<usize> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut assignment = vec![0; targets.len()];
    for class in 0..2 {
        let mut members: Vec<usize> = (0..targets.len())
            .filter(|&i| targets[i] == class)
            .collect();
        members.shuffle(&mut rng);
        for (position, &idx) in members.iter().enumerate() {
            assignment[idx] = position % folds;
        }
    }
    assignment
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_slope_is_positive_for_informative_scores() {
        let decisions = [-3.0, -2.0, -1.5, -0.5, 0.4, 1.0, 2.0, 2.5];
        let targets = [0, 0, 0, 1, 0, 1, 1, 1];
        let platt = PlattScaling::fit(&decisions, &targets);
        assert!(platt.slope > MIN_SLOPE);
        assert!(platt.probability(2.0) > 0.5);
        assert!(platt.probability(-2.0) < 0.5);
    }

    #[test]
    fn test_separable_scores_stay_finite() {
        let decisions = [-5.0, -4.0, -3.0, 3.0, 4.0, 5.0];
        let targets = [0, 0, 0, 1, 1, 1];
        let platt = PlattScaling::fit(&decisions, &targets);
        assert!(platt.slope.is_finite());
        let p = platt.probability(4.0);
        assert!(p > 0.5 && p < 1.0);
    }

    #[test]
    fn test_inverted_scores_are_clamped() {
        let decisions = [3.0, 2.0, -2.0, -3.0];
        let targets = [0, 0, 1, 1];
        let platt = PlattScaling::fit(&decisions, &targets);
        assert_eq!(platt.slope, MIN_SLOPE);
        assert!(platt.probability(1.0) > 0.5);
    }

    #[test]
    fn test_tiny_margins_keep_their_side() {
        let platt = PlattScaling { slope: 2.0 };
        let p = platt.probability(1e-17);
        assert!(p > 1.0 - p);
        let p = platt.probability(-1e-17);
        assert!(p < 1.0 - p);

        let clamped = PlattScaling { slope: MIN_SLOPE };
        let p = clamped.probability(1e-12);
        assert!(p > 0.5 && p > 1.0 - p);
        let p = clamped.probability(-1e-12);
        assert!(p < 0.5 && p < 1.0 - p);

        assert_eq!(platt.probability(0.0), 0.5);
    }

    #[test]
    fn test_stratified_folds_balance_classes() {
        let targets = [0, 0, 0, 0, 0, 0, 1, 1, 1];
        let folds = stratified_folds(&targets, 3, 7);
        for fold in 0..3 {
            let negatives = (0..targets.len())
                .filter(|&i| folds[i] == fold && targets[i] == 0)
                .count();
            let positives = (0..targets.len())
                .filter(|&i| folds[i] == fold && targets[i] == 1)
                .count();
            assert_eq!(negatives, 2);
            assert_eq!(positives, 1);
        }
        assert_eq!(folds, stratified_folds(&targets, 3, 7));
    }

    proptest! {
        #[test]
        fn prop_probability_side_matches_decision_sign(
            slope in MIN_SLOPE..10.0,
            decision in -1e-9f64..1e-9,
        ) {
            let p = PlattScaling { slope }.probability(decision);
            if decision > 0.0 {
                prop_assert!(p > 1.0 - p);
            } else if decision < 0.0 {
                prop_assert!(p < 1.0 - p);
            }
        }
    }
}
