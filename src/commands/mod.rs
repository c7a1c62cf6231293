//! CLI command implementations.
//!
//! Each command is implemented in its own module.
//! Commands orchestrate the various library components to perform user tasks.

pub mod chart;
pub mod export;
pub mod models;
pub mod utils;
pub mod view;

// Re-export main command functions
pub use chart::execute_chart;
pub use export::execute_export;
pub use models::{ChartArgs, ExportArgs, ViewArgs};
pub use utils::{display_rules, display_version};
pub use view::{load_batch, resolve_view, validate_view_args, ResolvedView};
