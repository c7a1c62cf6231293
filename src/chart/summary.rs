//! Terminal rendering of a chart.
//!
//! Prints per-series totals with a proportional bar, the grand total and an
//! explicit "no data" line when nothing survived the filters.

use super::builder::ChartData;
use colored::*;

const BAR_WIDTH: usize = 40;

/// Render a human-readable summary of a chart for the terminal
pub fn render_summary(chart: &ChartData, title: &str) -> String {
    let mut out = String::new();

    out.push_str(&render_header(chart, title));
    if chart.is_empty() {
        out.push_str(&format!("  {}\n", "No data for the selected filters".yellow()));
        return out;
    }
    out.push_str(&render_series(chart));
    out.push_str(&render_total(chart));

    out
}

fn render_header(chart: &ChartData, title: &str) -> String {
    let mut out = String::new();
    out.push_str("\n📊 ");
    out.push_str(&title.bold().to_string());
    out.push_str("\n---------------------------------------------------\n");
    if let (Some(first), Some(last)) = (chart.axis_labels.first(), chart.axis_labels.last()) {
        out.push_str(&format!(
            "Axis: {} value(s), {} .. {}\n",
            chart.axis_labels.len(),
            first,
            last
        ));
    }
    out
}

fn render_series(chart: &ChartData) -> String {
    let mut out = String::new();
    let total = chart.total().max(1);
    let name_width = chart
        .series
        .iter()
        .map(|s| s.name.chars().count())
        .max()
        .unwrap_or(0);

    for series in &chart.series {
        let count = series.total();
        let percentage = (count as f64 / total as f64) * 100.0;
        let bar = "█".repeat(((percentage / 100.0) * BAR_WIDTH as f64).round() as usize);

        out.push_str(&format!(
            "  {:<width$} {:>6} {:>6.1}% {}\n",
            series.name,
            count,
            percentage,
            bar.cyan(),
            width = name_width
        ));
    }
    out
}

fn render_total(chart: &ChartData) -> String {
    format!(
        "---------------------------------------------------\n{} {}\n",
        "Total:".bold(),
        chart.total().to_string().green().bold()
    )
}
