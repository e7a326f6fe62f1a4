// src/model/standardizer.rs
use log::warn;
use ndarray::{Array1, Array2, ArrayView2, Axis};

use crate::error::{ClassifyError, ClassifyResult};

/// Per-column centering and scaling.
///
/// Statistics come from the matrix passed to `fit` only. A column whose
/// training standard deviation is zero is given a scale of 1, so it ends up
/// centered but not scaled.
#[derive(Debug, Clone, Default)]
pub struct Standardizer {
    stats: Option<ColumnStats>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnStats {
    pub mean: Array1<f64>,
    pub scale: Array1<f64>,
}

impl Standardizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fit(&mut self, x: ArrayView2<f64>) -> ClassifyResult<()> {
        self.stats = Some(Self::compute(x)?);
        Ok(())
    }

    pub fn is_fitted(&self) -> bool {
        self.stats.is_some()
    }

    pub fn stats(&self) -> Option<&ColumnStats> {
        self.stats.as_ref()
    }

    pub fn transform(&self, x: ArrayView2<f64>) -> ClassifyResult<Array2<f64>> {
        let stats = self.stats.as_ref().ok_or(ClassifyError::NotFitted)?;
        if x.ncols() != stats.mean.len() {
            return Err(ClassifyError::DimensionMismatch {
                expected: stats.mean.len(),
                found: x.ncols(),
            });
        }
        Ok((&x - &stats.mean) / &stats.scale)
    }

    /// Maps standardized values back to raw coordinates.
    pub fn inverse_transform(&self, z: ArrayView2<f64>) -> ClassifyResult<Array2<f64>> {
        let stats = self.stats.as_ref().ok_or(ClassifyError::NotFitted)?;
        if z.ncols() != stats.mean.len() {
            return Err(ClassifyError::DimensionMismatch {
                expected: stats.mean.len(),
                found: z.ncols(),
            });
        }
        Ok(&z * &stats.scale + &stats.mean)
    }

    fn compute(x: ArrayView2<f64>) -> ClassifyResult<ColumnStats> {
        let mean = x.mean_axis(Axis(0)).ok_or(ClassifyError::EmptyInput)?;
        let std = x.std_axis(Axis(0), 0.0);
        let scale = std.mapv(|s| if s > 0.0 && s.is_finite() { s } else { 1.0 });
        for (col, s) in std.iter().enumerate() {
            if *s <= 0.0 || !s.is_finite() {
                warn!(
                    "Column {} has zero variance in training data; leaving it unscaled",
                    col
                );
            }
        }
        Ok(ColumnStats { mean, scale })
    }
}
