// src/render/mod.rs
pub mod figure;
pub mod svg;

pub use figure::{Figure, Panel, ScatterSeries, SeriesKind};
pub use svg::render_svg;
