// Presenter module: text output and the SVG bar chart.

pub mod chart;
pub mod text;

pub use chart::write_bar_chart;
pub use text::{render_frequency, render_predictions};
