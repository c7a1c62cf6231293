//! Parsing of raw activity batches into typed events.
//!
//! The parser is lenient: malformed records are skipped or marked undated,
//! never reported as batch failures.

pub mod events;
pub mod schema;

// Re-export main types
pub use events::{parse_events, split_combined_label, ParseOptions, ParsedBatch};
pub use schema::{parse_timestamp, ItemId, MonthKey, RawEvent, Scope};
