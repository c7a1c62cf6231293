//! Where raw event batches come from.
//!
//! Fetching is the only blocking boundary ahead of the pipeline; the core is
//! only ever handed a fully loaded batch.

pub mod client;
pub mod file;

pub use client::EventClient;
pub use file::read_events_file;
