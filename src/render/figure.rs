// src/render/figure.rs
use crate::boundary::{AxisRange, Point, Segment};

/// Fraction of the data span added around each panel's axes.
const AXIS_MARGIN: f64 = 0.05;

/// Role of a scatter series; the renderer picks its colour from this.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesKind {
    /// First training class.
    Negative,
    /// Second training class.
    Positive,
    /// Records outside the training classes.
    Evaluation,
}

#[derive(Debug, Clone)]
pub struct ScatterSeries {
    pub label: String,
    pub kind: SeriesKind,
    pub points: Vec<Point>,
}

/// Everything drawn in one panel, in raw feature coordinates.
#[derive(Debug, Clone)]
pub struct Panel {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub series: Vec<ScatterSeries>,
    pub boundary: Vec<Segment>,
    pub show_legend: bool,
}

impl Panel {
    /// Extent of all scatter points, widened by a small margin.
    pub fn axis_ranges(&self) -> (AxisRange, AxisRange) {
        let mut points: Vec<Point> = self
            .series
            .iter()
            .flat_map(|s| s.points.iter().copied())
            .collect();
        if points.is_empty() {
            points = self
                .boundary
                .iter()
                .flat_map(|s| [s.start, s.end])
                .collect();
        }
        if points.is_empty() {
            let unit = AxisRange { min: 0.0, max: 1.0 };
            return (unit, unit);
        }

        let extent = |pick: fn(&Point) -> f64| {
            let range = points.iter().map(pick).fold(
                AxisRange {
                    min: f64::INFINITY,
                    max: f64::NEG_INFINITY,
                },
                |r, v| AxisRange {
                    min: r.min.min(v),
                    max: r.max.max(v),
                },
            );
            range.padded(AXIS_MARGIN)
        };
        (extent(|p| p.0), extent(|p| p.1))
    }
}

/// Panels collected across feature groups, rendered in insertion order.
#[derive(Debug, Clone)]
pub struct Figure {
    size: (u32, u32),
    panels: Vec<Panel>,
}

impl Figure {
    pub fn new(size: (u32, u32)) -> Self {
        Self {
            size,
            panels: Vec::new(),
        }
    }

    pub fn push(&mut self, panel: Panel) {
        self.panels.push(panel);
    }

    pub fn panels(&self) -> &[Panel] {
        &self.panels
    }

    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }
}

impl Default for Figure {
    fn default() -> Self {
        Self::new((1400, 600))
    }
}
