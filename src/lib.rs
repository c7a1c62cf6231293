//! PR Label Analytics
//!
//! Turns raw pull-request label activity into canonical, month-bucketed
//! counts for stacked charts and CSV export.
//!
//! Pipeline: `parser` → `normalizer` → `aggregator` (dedup + counts) →
//! `chart` (series) and `export` (rows) → `output`.
//!
//! This crate provides the core implementation for the
//! `pr-label-analytics` CLI tool.

pub mod aggregator;
pub mod chart;
pub mod commands;
pub mod export;
pub mod normalizer;
pub mod output;
pub mod parser;
pub mod session;
pub mod source;
pub mod utils;
