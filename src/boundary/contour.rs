// src/boundary/contour.rs
//! Zero-level contour extraction by marching squares.

use super::grid::BoundaryGrid;

pub type Point = (f64, f64);

/// A straight piece of the contour between two cell edges.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: Point,
    pub end: Point,
}

/// Traces the `level` iso-line of the grid. Crossings are placed on cell
/// edges by linear interpolation; saddle cells are resolved using the mean
/// of their four corners.
pub fn contour_segments(grid: &BoundaryGrid, level: f64) -> Vec<Segment> {
    let (nx, ny) = grid.resolution();
    let mut segments = Vec::new();
    if nx < 2 || ny < 2 {
        return segments;
    }

    for i in 0..nx - 1 {
        for j in 0..ny - 1 {
            // corners counter-clockwise from (xs[i], ys[j])
            let corners = [
                (grid.xs[i], grid.ys[j], grid.values[[i, j]] - level),
                (grid.xs[i + 1], grid.ys[j], grid.values[[i + 1, j]] - level),
                (grid.xs[i + 1], grid.ys[j + 1], grid.values[[i + 1, j + 1]] - level),
                (grid.xs[i], grid.ys[j + 1], grid.values[[i, j + 1]] - level),
            ];
            segments.extend(cell_segments(&corners));
        }
    }
    segments
}

fn cell_segments(corners: &[(f64, f64, f64); 4]) -> Vec<Segment> {
    // edge k joins corner k and corner k+1
    let crossings: Vec<(usize, Point)> = (0..4)
        .filter_map(|k| {
            let a = corners[k];
            let b = corners[(k + 1) % 4];
            edge_crossing(a, b).map(|p| (k, p))
        })
        .collect();

    match crossings.len() {
        2 => vec![Segment {
            start: crossings[0].1,
            end: crossings[1].1,
        }],
        4 => {
            let center = corners.iter().map(|c| c.2).sum::<f64>() / 4.0;
            let first_positive = corners[0].2 >= 0.0;
            // pair the crossings so the centre's side stays connected
            if (center >= 0.0) == first_positive {
                vec![
                    Segment { start: crossings[0].1, end: crossings[1].1 },
                    Segment { start: crossings[2].1, end: crossings[3].1 },
                ]
            } else {
                vec![
                    Segment { start: crossings[3].1, end: crossings[0].1 },
                    Segment { start: crossings[1].1, end: crossings[2].1 },
                ]
            }
        }
        _ => Vec::new(),
    }
}

/// Point on the edge where the interpolated value crosses zero. Corners at
/// exactly zero count as non-negative so each crossing is reported once.
fn edge_crossing(a: (f64, f64, f64), b: (f64, f64, f64)) -> Option<Point> {
    if (a.2 >= 0.0) == (b.2 >= 0.0) {
        return None;
    }
    let t = a.2 / (a.2 - b.2);
    Some((a.0 + t * (b.0 - a.0), a.1 + t * (b.1 - a.1)))
}
