//! Chart series construction.
//!
//! This module turns aggregated counts into chart-ready data:
//! - View filters (month, enabled categories)
//! - Dense stacked series for each axis layout
//! - Terminal summaries

pub mod builder;
pub mod filters;
pub mod summary;

// Re-export main types and functions
pub use builder::{build_series, layout_filters, to_report, ChartData, ChartLayout, ChartReport, Series};
pub use filters::{CategorySelection, Filters};
pub use summary::render_summary;
