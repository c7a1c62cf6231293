//! Chart command implementation.
//!
//! The chart command:
//! 1. Loads the event batch (file or HTTP)
//! 2. Normalizes, dedupes and aggregates it
//! 3. Builds the dense series for the requested layout
//! 4. Writes the JSON chart and optional summary

use super::models::ChartArgs;
use super::view::{load_batch, resolve_view, validate_view_args};
use crate::aggregator::Aggregator;
use crate::chart::{build_series, layout_filters, render_summary, to_report, ChartData, ChartLayout};
use crate::output::{chart_to_string, write_chart};
use crate::session::ViewSession;
use anyhow::{Context, Result};
use log::info;
use std::time::Instant;

/// Execute the chart command
///
/// **Public** - main entry point called from main.rs
///
/// # Arguments
/// * `args` - Chart command arguments
///
/// # Returns
/// The chart that was written
///
/// # Errors
/// * Source read/fetch failures
/// * Rule override errors
/// * Category-axis layout without `--cross`
/// * File write errors
pub fn execute_chart(args: ChartArgs) -> Result<ChartData> {
    let start_time = Instant::now();
    validate_args(&args)?;

    let view = resolve_view(&args.view)?;
    let layout: ChartLayout = args.layout.parse()?;

    info!("Step 1/4: Loading events...");
    let session = ViewSession::new();
    let batch = load_batch(&args.view, &session)?;

    info!("Step 2/4: Aggregating (scope {})...", view.scope);
    let aggregator = Aggregator::new(&view.catalog, view.scope);
    let counts = aggregator.aggregate(&batch.events, view.dimensions);

    info!("Step 3/4: Building {} series...", layout);
    let filters = layout_filters(&counts, layout, &view.filters);
    if filters.month != view.filters.month {
        if let Some(month) = &filters.month {
            info!("No --month given; charting latest month {}", month);
        }
    }
    let chart = build_series(&counts, layout, &filters).context("Failed to build chart series")?;

    info!("Step 4/4: Writing output...");
    let report = to_report(chart, view.scope.as_str(), view.dimensions, layout, &filters);
    match &args.output {
        Some(path) => {
            write_chart(&report, path).context("Failed to write chart JSON")?;
            info!("✓ Chart written to: {}", path.display());
        }
        None if !args.print_summary => println!("{}", chart_to_string(&report)?),
        None => {}
    }

    if args.print_summary {
        let title = format!("{} ({}, {})", report.dimensions, report.scope, report.layout);
        println!("{}", render_summary(&report.chart, &title));
    }

    info!("Chart completed in {:.2}s", start_time.elapsed().as_secs_f64());
    Ok(report.chart)
}

/// Validate chart arguments
///
/// **Public** - can be called before execute_chart for early validation
pub fn validate_args(args: &ChartArgs) -> Result<()> {
    validate_view_args(&args.view)?;

    let layout: ChartLayout = args.layout.parse()?;
    if layout != ChartLayout::Timeline && !args.view.cross {
        anyhow::bail!("Layout '{}' requires --cross", layout);
    }

    Ok(())
}
