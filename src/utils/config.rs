//! Configuration and constants for the CLI.

use std::time::Duration;

/// Default timeout for batch fetch requests
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Current chart output schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Default CSV field delimiter
pub const DEFAULT_DELIMITER: char = ',';

/// Label attached to items whose author looks like a bot account
pub const BOT_LABEL: &str = "Created By Bot";

// Field names for record parsing (upstream collections disagree on naming)
pub const ID_FIELD_NAMES: &[&str] = &["id", "number", "prNumber", "pr_number", "itemId", "item_id"];
pub const TIMESTAMP_FIELD_NAMES: &[&str] = &[
    "timestamp",
    "createdAt",
    "created_at",
    "monthYear",
    "month",
    "date",
];
pub const PRIMARY_LABEL_FIELD_NAMES: &[&str] = &[
    "label",
    "rawLabelPrimary",
    "raw_label_primary",
    "category",
    "process",
    "type",
];
pub const SECONDARY_LABEL_FIELD_NAMES: &[&str] = &[
    "subcategory",
    "rawLabelSecondary",
    "raw_label_secondary",
    "participants",
];
pub const LABEL_LIST_FIELD_NAMES: &[&str] = &["labels", "customLabels", "githubLabels"];
pub const REPO_FIELD_NAMES: &[&str] = &["repo", "repoScope", "repo_scope", "specType", "repository"];
pub const AUTHOR_FIELD_NAMES: &[&str] = &["author", "user", "login"];
pub const TITLE_FIELD_NAMES: &[&str] = &["title"];
pub const URL_FIELD_NAMES: &[&str] = &["url", "prUrl", "PRLink", "html_url"];
