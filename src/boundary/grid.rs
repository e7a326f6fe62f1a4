// src/boundary/grid.rs
use log::debug;
use ndarray::{Array1, Array2, ArrayView2, Axis};

use crate::error::{ClassifyError, ClassifyResult};
use crate::model::Pipeline;

/// Half-width used when an axis has no spread.
const DEGENERATE_HALF_WIDTH: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisRange {
    pub min: f64,
    pub max: f64,
}

impl AxisRange {
    /// Widens the range by `padding` times its span on each side. A zero
    /// span is opened to a fixed width around the single value.
    pub fn padded(self, padding: f64) -> Self {
        let span = self.max - self.min;
        if span <= 0.0 {
            return Self {
                min: self.min - DEGENERATE_HALF_WIDTH,
                max: self.max + DEGENERATE_HALF_WIDTH,
            };
        }
        Self {
            min: self.min - padding * span,
            max: self.max + padding * span,
        }
    }

    pub fn midpoint(&self) -> f64 {
        (self.min + self.max) / 2.0
    }
}

/// Observed min/max of each of the two columns.
pub fn bounding_box(points: ArrayView2<f64>) -> ClassifyResult<[AxisRange; 2]> {
    if points.ncols() != 2 {
        return Err(ClassifyError::DimensionMismatch {
            expected: 2,
            found: points.ncols(),
        });
    }
    if points.nrows() == 0 {
        return Err(ClassifyError::EmptyInput);
    }
    let range = |col: usize| {
        points
            .column(col)
            .iter()
            .fold(AxisRange { min: f64::INFINITY, max: f64::NEG_INFINITY }, |r, &v| AxisRange {
                min: r.min.min(v),
                max: r.max.max(v),
            })
    };
    Ok([range(0), range(1)])
}

/// Decision-function samples over an evenly spaced 2-D lattice, in raw
/// feature coordinates. `values[[i, j]]` is the score at `(xs[i], ys[j])`.
#[derive(Debug, Clone)]
pub struct BoundaryGrid {
    pub xs: Array1<f64>,
    pub ys: Array1<f64>,
    pub values: Array2<f64>,
}

impl BoundaryGrid {
    /// Evaluates `pipeline` on a `resolution` x `resolution` lattice spanning
    /// the bounding box of `training` (optionally padded).
    pub fn evaluate(
        pipeline: &Pipeline,
        training: ArrayView2<f64>,
        resolution: usize,
        padding: f64,
    ) -> ClassifyResult<Self> {
        let resolution = resolution.max(2);
        let [x_range, y_range] = bounding_box(training)?;
        let widen = |r: AxisRange| {
            if padding > 0.0 || r.max <= r.min {
                r.padded(padding)
            } else {
                r
            }
        };
        let (x_range, y_range) = (widen(x_range), widen(y_range));

        let xs = Array1::linspace(x_range.min, x_range.max, resolution);
        let ys = Array1::linspace(y_range.min, y_range.max, resolution);

        let mut lattice = Array2::zeros((resolution * resolution, 2));
        for (k, mut point) in lattice.axis_iter_mut(Axis(0)).enumerate() {
            point[0] = xs[k / resolution];
            point[1] = ys[k % resolution];
        }
        let decisions = pipeline.decision_function(lattice.view())?;
        let values =
            Array2::from_shape_fn((resolution, resolution), |(i, j)| decisions[i * resolution + j]);

        debug!(
            "Evaluated boundary grid {}x{} over x=[{:.3}, {:.3}], y=[{:.3}, {:.3}]",
            resolution, resolution, x_range.min, x_range.max, y_range.min, y_range.max
        );
        Ok(Self { xs, ys, values })
    }

    pub fn resolution(&self) -> (usize, usize) {
        (self.xs.len(), self.ys.len())
    }

    /// Lattice index closest to `(x, y)`.
    pub fn nearest_index(&self, x: f64, y: f64) -> (usize, usize) {
        (nearest(&self.xs, x), nearest(&self.ys, y))
    }

    pub fn value_near(&self, x: f64, y: f64) -> f64 {
        let (i, j) = self.nearest_index(x, y);
        self.values[[i, j]]
    }
}

fn nearest(axis: &Array1<f64>, target: f64) -> usize {
    axis.iter()
        .enumerate()
        .min_by(|a, b| (a.1 - target).abs().total_cmp(&(b.1 - target).abs()))
        .map(|(i, _)| i)
        .unwrap_or(0)
}
