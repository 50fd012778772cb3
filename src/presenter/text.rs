use crate::analyzer::frequency::FrequencyTable;
use crate::model::{NumberSource, PredictedSet};

const BAR_WIDTH: usize = 40;

fn source_label(source: NumberSource) -> &'static str {
    match source {
        NumberSource::Main => "main numbers",
        NumberSource::Bonus => "bonus number",
        NumberSource::Combined => "main + bonus",
    }
}

/// Ranked table, most frequent first, one bar per number.
pub fn render_frequency(table: &FrequencyTable) -> String {
    let mut lines = vec![format!(
        "📊 Frequency of {} over {} draws",
        source_label(table.source()),
        table.draw_count()
    )];

    if table.draw_count() == 0 {
        lines.push("📭 No draws in the selected range.".to_string());
    }

    let max = table.max_count() as usize;
    for (number, count) in table.ranked() {
        let width = if max == 0 {
            0
        } else {
            count as usize * BAR_WIDTH / max
        };
        lines.push(format!("{:>2} | {:>5} | {}", number, count, "█".repeat(width)));
    }
    lines.join("\n")
}

pub fn render_predictions(sets: &[PredictedSet]) -> String {
    let mut lines = vec![format!("🎯 {} predicted sets:", sets.len())];
    for (i, set) in sets.iter().enumerate() {
        lines.push(format!("{:>2}. {}", i + 1, set));
    }
    lines.join("\n")
}
