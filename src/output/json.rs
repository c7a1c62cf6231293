//! JSON chart output writer.
//!
//! Writes chart reports to JSON files with proper formatting.

use super::{prepare_output_path, validate_path};
use crate::chart::builder::ChartReport;
use crate::utils::error::OutputError;
use log::{debug, info};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Write a chart report to a JSON file
///
/// **Public** - main entry point for JSON output
///
/// # Arguments
/// * `report` - Chart report to write
/// * `output_path` - Path to output JSON file
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::SerializationFailed` - JSON serialization error
/// * `OutputError::InvalidPath` - Path cannot be created or is invalid
///
/// # Example
/// ```ignore
/// let report = to_report(chart, "eips", dimensions, layout, &filters);
/// write_chart(&report, "chart.json")?;
/// ```
pub fn write_chart(report: &ChartReport, output_path: impl AsRef<Path>) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing chart to: {}", output_path.display());

    validate_path(output_path)?;
    prepare_output_path(output_path)?;

    let file = File::create(output_path).map_err(OutputError::WriteFailed)?;
    let writer = BufWriter::new(file);

    serde_json::to_writer_pretty(writer, report).map_err(OutputError::SerializationFailed)?;

    info!(
        "Chart written successfully ({} series, total {})",
        report.chart.series.len(),
        report.total
    );

    Ok(())
}

/// Serialize a chart report to a string
///
/// **Public** - used to print the chart to stdout
pub fn chart_to_string(report: &ChartReport) -> Result<String, OutputError> {
    serde_json::to_string_pretty(report).map_err(OutputError::SerializationFailed)
}

/// Read a chart report from a JSON file
///
/// **Public** - useful for validation and testing
///
/// # Errors
/// * `OutputError::WriteFailed` - File read error (reusing WriteFailed for I/O)
/// * `OutputError::SerializationFailed` - JSON parse error
pub fn read_chart(input_path: impl AsRef<Path>) -> Result<ChartReport, OutputError> {
    let input_path = input_path.as_ref();

    debug!("Reading chart from: {}", input_path.display());

    let file = File::open(input_path).map_err(OutputError::WriteFailed)?;
    let report: ChartReport =
        serde_json::from_reader(file).map_err(OutputError::SerializationFailed)?;

    debug!(
        "Chart loaded: version {}, scope {}, {} series",
        report.version,
        report.scope,
        report.chart.series.len()
    );

    Ok(report)
}
