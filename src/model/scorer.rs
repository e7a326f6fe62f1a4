// src/model/scorer.rs
//! Single-feature discriminative power.
//!
//! The AUC here is exploratory output: each raw feature is scored on its own
//! against the binary training targets, with no resampling and no correction
//! for the number of features scored.

use crate::error::{ClassifyError, ClassifyResult};

/// Area under the ROC curve, treating `scores` as the ranking for target 1.
///
/// Computed through the Mann-Whitney rank statistic with tied scores given
/// their average rank, so it depends only on the ordering of the scores.
pub fn roc_auc(targets: &[usize], scores: &[f64]) -> ClassifyResult<f64> {
    if targets.len() != scores.len() {
        return Err(ClassifyError::DimensionMismatch {
            expected: targets.len(),
            found: scores.len(),
        });
    }
    if let Some(&bad) = targets.iter().find(|&&t| t > 1) {
        return Err(ClassifyError::InvalidLabel(bad));
    }

    let positives = targets.iter().filter(|&&t| t == 1).count();
    let negatives = targets.len() - positives;
    if positives == 0 || negatives == 0 {
        return Err(ClassifyError::InsufficientClassDiversity {
            context: "ROC AUC".to_string(),
        });
    }

    let ranks = average_ranks(scores);
    let positive_rank_sum: f64 = targets
        .iter()
        .zip(&ranks)
        .filter(|(&t, _)| t == 1)
        .map(|(_, &r)| r)
        .sum();

    let p = positives as f64;
    let n = negatives as f64;
    Ok((positive_rank_sum - p * (p + 1.0) / 2.0) / (p * n))
}

/// 1-based ranks, ties sharing the mean of the ranks they span.
fn average_ranks(values: &[f64]) -> Vec<f64> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

    let mut ranks = vec![0.0; values.len()];
    let mut start = 0;
    while start < order.len() {
        let mut end = start + 1;
        while end < order.len() && values[order[end]] == values[order[start]] {
            end += 1;
        }
        // positions start..end hold ranks start+1 ..= end
        let rank = (start + 1 + end) as f64 / 2.0;
        for &idx in &order[start..end] {
            ranks[idx] = rank;
        }
        start = end;
    }
    ranks
}
