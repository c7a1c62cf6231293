//! Tabular export of the charted data.

pub mod rows;

pub use rows::{export_rows, ExportRow};
