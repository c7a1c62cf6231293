//! Export command implementation.
//!
//! Runs the same load and aggregation as `chart`, then writes one CSV row per
//! counted unit. The number of rows equals the chart total for the same
//! arguments. A cross-tab export without `--month` covers the latest month,
//! like the category-axis charts.

use super::models::ExportArgs;
use super::view::{load_batch, resolve_view, validate_view_args};
use crate::aggregator::{Aggregator, Dimensions};
use crate::chart::{build_series, layout_filters, ChartLayout};
use crate::export::{export_rows, ExportRow};
use crate::output::write_csv;
use crate::session::ViewSession;
use anyhow::{Context, Result};
use log::{info, warn};

/// Execute the export command
///
/// **Public** - main entry point called from main.rs
///
/// # Returns
/// The exported rows
pub fn execute_export(args: ExportArgs) -> Result<Vec<ExportRow>> {
    validate_args(&args)?;
    let view = resolve_view(&args.view)?;

    let session = ViewSession::new();
    let batch = load_batch(&args.view, &session)?;

    let aggregator = Aggregator::new(&view.catalog, view.scope);
    let counts = aggregator.aggregate(&batch.events, view.dimensions);
    let filters = match view.dimensions {
        Dimensions::Two(..) => layout_filters(&counts, ChartLayout::PrimaryOnAxis, &view.filters),
        Dimensions::One(_) => view.filters.clone(),
    };
    if filters.month != view.filters.month {
        if let Some(month) = &filters.month {
            info!("No --month given; exporting latest month {}", month);
        }
    }
    let rows = export_rows(&batch.events, &aggregator, view.dimensions, &filters);

    let chart_total = build_series(&counts, ChartLayout::Timeline, &filters)?.total();
    if chart_total != rows.len() as u64 {
        warn!(
            "Export has {} rows but the chart total is {}",
            rows.len(),
            chart_total
        );
    }

    write_csv(&rows, args.delimiter, &args.output).context("Failed to write CSV export")?;
    info!(
        "✓ Exported {} rows to: {}",
        rows.len(),
        args.output.display()
    );

    Ok(rows)
}

/// Validate export arguments
///
/// **Public** - can be called before execute_export for early validation
pub fn validate_args(args: &ExportArgs) -> Result<()> {
    validate_view_args(&args.view)?;

    if matches!(args.delimiter, '"' | '\n' | '\r') {
        anyhow::bail!("Delimiter cannot be a quote or line break");
    }
    if args.output.as_os_str().is_empty() {
        anyhow::bail!("Output path cannot be empty");
    }

    Ok(())
}
