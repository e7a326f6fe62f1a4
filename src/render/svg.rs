// src/render/svg.rs
use anyhow::{bail, Context, Result};
use log::info;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::Path;

use super::figure::{Figure, Panel, SeriesKind};

fn series_color(kind: SeriesKind) -> RGBColor {
    match kind {
        SeriesKind::Negative => RED,
        SeriesKind::Positive => BLUE,
        SeriesKind::Evaluation => GREEN,
    }
}

/// Writes the figure as a single SVG file, panels side by side.
pub fn render_svg(figure: &Figure, path: &Path) -> Result<()> {
    if figure.is_empty() {
        bail!("Figure has no panels to render");
    }

    let root = SVGBackend::new(path, figure.size()).into_drawing_area();
    root.fill(&WHITE)?;
    let areas = root.split_evenly((1, figure.panels().len()));
    for (area, panel) in areas.iter().zip(figure.panels()) {
        draw_panel(area, panel).with_context(|| format!("Failed to draw panel '{}'", panel.title))?;
    }
    root.present()
        .with_context(|| format!("Failed to write figure to {}", path.display()))?;

    info!(
        "Saved {}-panel figure to {}",
        figure.panels().len(),
        path.display()
    );
    Ok(())
}

fn draw_panel(area: &DrawingArea<SVGBackend<'_>, Shift>, panel: &Panel) -> Result<()> {
    let (x_range, y_range) = panel.axis_ranges();
    let mut chart = ChartBuilder::on(area)
        .caption(&panel.title, ("sans-serif", 20))
        .margin(15)
        .x_label_area_size(35)
        .y_label_area_size(45)
        .build_cartesian_2d(x_range.min..x_range.max, y_range.min..y_range.max)?;

    chart
        .configure_mesh()
        .x_desc(panel.x_label.as_str())
        .y_desc(panel.y_label.as_str())
        .draw()?;

    for series in &panel.series {
        let color = series_color(series.kind);
        chart
            .draw_series(
                series
                    .points
                    .iter()
                    .map(move |&p| Circle::new(p, 4, color.mix(0.8).filled())),
            )?
            .label(series.label.clone())
            .legend(move |(x, y)| Circle::new((x, y), 4, color.filled()));
    }

    chart.draw_series(
        panel
            .boundary
            .iter()
            .map(|s| PathElement::new(vec![s.start, s.end], BLACK.mix(0.5).stroke_width(1))),
    )?;

    if panel.show_legend {
        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;
    }
    Ok(())
}
