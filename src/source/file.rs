//! Raw event batches stored on disk.

use crate::utils::error::SourceError;
use log::debug;
use serde_json::Value;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Read a raw batch from a JSON file
///
/// # Errors
/// * `SourceError::ReadFailed` - File cannot be opened
/// * `SourceError::JsonError` - File is not valid JSON
pub fn read_events_file(path: impl AsRef<Path>) -> Result<Value, SourceError> {
    let path = path.as_ref();
    debug!("Reading events from: {}", path.display());

    let file = File::open(path)?;
    let value: Value = serde_json::from_reader(BufReader::new(file))?;
    Ok(value)
}
