// src/boundary/mod.rs
pub mod contour;
pub mod grid;

pub use contour::{contour_segments, Point, Segment};
pub use grid::{bounding_box, AxisRange, BoundaryGrid};
