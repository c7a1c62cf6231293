//! CSV export writer.
//!
//! The header comes from the first row's field names; every later row is
//! written in that column order.

use super::{prepare_output_path, validate_path};
use crate::export::rows::ExportRow;
use crate::utils::error::OutputError;
use log::info;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Render rows as CSV text
///
/// **Public** - pure serialization step, independent of where the bytes go
///
/// An empty row list renders as an empty string (no header is known).
pub fn to_csv(rows: &[ExportRow], delimiter: char) -> String {
    let Some(first) = rows.first() else {
        return String::new();
    };

    let header: Vec<&'static str> = first.fields().into_iter().map(|(name, _)| name).collect();
    let separator = delimiter.to_string();

    let mut output = String::new();
    output.push_str(
        &header
            .iter()
            .map(|name| escape_field(name, delimiter))
            .collect::<Vec<_>>()
            .join(&separator),
    );
    output.push('\n');

    for row in rows {
        let fields = row.fields();
        let line = header
            .iter()
            .map(|column| {
                fields
                    .iter()
                    .find(|(name, _)| name == column)
                    .map(|(_, value)| escape_field(value, delimiter))
                    .unwrap_or_default()
            })
            .collect::<Vec<_>>()
            .join(&separator);
        output.push_str(&line);
        output.push('\n');
    }

    output
}

/// Quote a field containing the delimiter, a quote or a line break
///
/// **Private** - inner quotes are doubled
fn escape_field(field: &str, delimiter: char) -> String {
    if field.contains(delimiter) || field.contains('"') || field.contains('\n') || field.contains('\r') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Write rows to a CSV file
///
/// **Public** - main entry point for CSV output
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::InvalidPath` - Path cannot be created or is invalid
pub fn write_csv(
    rows: &[ExportRow],
    delimiter: char,
    output_path: impl AsRef<Path>,
) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing {} rows to: {}", rows.len(), output_path.display());

    validate_path(output_path)?;
    prepare_output_path(output_path)?;

    let content = to_csv(rows, delimiter);
    let file = File::create(output_path).map_err(OutputError::WriteFailed)?;
    let mut writer = BufWriter::new(file);
    writer
        .write_all(content.as_bytes())
        .map_err(OutputError::WriteFailed)?;
    writer.flush().map_err(OutputError::WriteFailed)?;

    info!("CSV written successfully ({} bytes)", content.len());
    Ok(())
}
