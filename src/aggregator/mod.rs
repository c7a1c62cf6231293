//! Aggregation of normalized events into month-bucketed counts.
//!
//! This module transforms a batch of raw events into:
//! - Per-bucket sets of distinct item ids (dedup)
//! - Integer counts for one or two classification dimensions
//! - Marginals used to check the two views agree

pub mod counts;
pub mod dedup;

// Re-export main types and functions
pub use counts::{AggregatedCounts, Aggregator, Dimensions};
pub use dedup::{dedupe, resolve_secondary, BucketKey, BucketSets, UnitId};
