use crate::analyzer::frequency::FrequencyTable;
use crate::model::{ChartError, MAX_NUMBER, MIN_NUMBER};
use plotters::prelude::*;
use std::fmt::Display;
use std::path::Path;

fn render_error<E: Display>(e: E) -> ChartError {
    ChartError::Render(e.to_string())
}

/// Writes an SVG bar chart with one bar per number, 1..=45 left to right.
pub fn write_bar_chart(table: &FrequencyTable, path: &Path) -> Result<(), ChartError> {
    let root = SVGBackend::new(path, (1280, 640)).into_drawing_area();
    root.fill(&WHITE).map_err(render_error)?;

    let max = table.max_count();
    let y_max = max + max / 10 + 1;

    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!("Number frequency ({} draws)", table.draw_count()),
            ("sans-serif", 24),
        )
        .margin(12)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(
            ((MIN_NUMBER as u32)..(MAX_NUMBER as u32 + 1)).into_segmented(),
            0u32..y_max,
        )
        .map_err(render_error)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(MAX_NUMBER as usize)
        .x_desc("Number")
        .y_desc("Occurrences")
        .draw()
        .map_err(render_error)?;

    chart
        .draw_series(
            Histogram::vertical(&chart)
                .style(BLUE.mix(0.7).filled())
                .margin(2)
                .data(table.iter().map(|(n, c)| (n as u32, c))),
        )
        .map_err(render_error)?;

    root.present().map_err(render_error)?;
    Ok(())
}
