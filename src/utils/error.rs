//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.
//!
//! Normalization, dedup, aggregation and export have no error type: every
//! input resolves to a category and malformed records are dropped, not reported.

use thiserror::Error;

/// Errors that can occur while fetching or loading an event batch
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Failed to read batch file: {0}")]
    ReadFailed(#[from] std::io::Error),

    #[error("Batch is not valid JSON: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Errors that can occur during batch parsing
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Invalid batch format: {0}")]
    InvalidFormat(String),

    #[error("Invalid month key: {0}")]
    InvalidMonth(String),

    #[error("Unknown scope: {0}")]
    UnknownScope(String),

    #[error("Unknown dimension: {0}")]
    UnknownDimension(String),
}

/// Errors that can occur while building or overriding rule sets
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid pattern `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Category `{category}` is not in the {dimension} vocabulary")]
    UnknownCategory { dimension: String, category: String },

    #[error("Category `{category}` of scope {scope} does not coarsen into the unified {dimension} vocabulary")]
    BrokenCoarsening {
        dimension: String,
        scope: String,
        category: String,
    },

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("Rules TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Errors that can occur while laying out a chart
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ChartError {
    #[error("Layout `{0}` needs two-dimensional counts")]
    NeedsTwoDimensions(String),
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}
