//! Batch parser for raw activity records.
//!
//! Turns the JSON handed over by the fetch collaborator into `RawEvent`s.
//! Upstream collections disagree on field names, so every logical field is
//! looked up through an ordered list of accepted names (see `utils::config`).
//!
//! A single bad record never fails the batch: records without an id are
//! dropped here, records with an unparseable timestamp are kept with
//! `timestamp: None` and excluded later by the deduplicator.

use super::schema::{parse_timestamp, ItemId, RawEvent};
use crate::utils::config::{
    AUTHOR_FIELD_NAMES, BOT_LABEL, ID_FIELD_NAMES, LABEL_LIST_FIELD_NAMES,
    PRIMARY_LABEL_FIELD_NAMES, REPO_FIELD_NAMES, SECONDARY_LABEL_FIELD_NAMES,
    TIMESTAMP_FIELD_NAMES, TITLE_FIELD_NAMES, URL_FIELD_NAMES,
};
use crate::utils::error::ParseError;
use log::{debug, warn};
use serde_json::{Map, Value};

/// Options controlling record expansion
#[derive(Debug, Clone, Copy, Default)]
pub struct ParseOptions {
    /// Add a `Created By Bot` label to items whose author contains "bot"
    pub tag_bot_authors: bool,
}

/// Parsed batch plus bookkeeping about what was skipped
#[derive(Debug, Clone, Default)]
pub struct ParsedBatch {
    pub events: Vec<RawEvent>,

    /// Number of top-level records inspected
    pub records_seen: usize,

    /// Records dropped because they were not objects or had no id
    pub records_dropped: usize,

    /// Events kept with no usable timestamp (excluded from every bucket)
    pub undated_events: usize,
}

impl ParsedBatch {
    pub fn summary(&self) -> String {
        format!(
            "Records: {} | Events: {} | Dropped: {} | Undated: {}",
            self.records_seen,
            self.events.len(),
            self.records_dropped,
            self.undated_events
        )
    }
}

/// Parse a raw batch
///
/// **Public** - main entry point for parsing
///
/// # Arguments
/// * `raw` - JSON array of records, or an object wrapping one in `data`
/// * `options` - Expansion options
///
/// # Errors
/// * `ParseError::InvalidFormat` - Top-level value holds no record array
pub fn parse_events(raw: &Value, options: ParseOptions) -> Result<ParsedBatch, ParseError> {
    let records = extract_records(raw)?;
    let mut batch = ParsedBatch {
        records_seen: records.len(),
        ..Default::default()
    };

    for (index, record) in records.iter().enumerate() {
        let Some(obj) = record.as_object() else {
            warn!("Skipping record {}: not a JSON object", index);
            batch.records_dropped += 1;
            continue;
        };

        match parse_record(obj, options) {
            Some(events) => batch.events.extend(events),
            None => {
                warn!("Skipping record {}: missing item id", index);
                batch.records_dropped += 1;
            }
        }
    }

    batch.undated_events = batch.events.iter().filter(|e| e.timestamp.is_none()).count();
    if batch.undated_events > 0 {
        warn!(
            "{} events have no usable timestamp and will not be bucketed",
            batch.undated_events
        );
    }

    debug!("Parsed batch: {}", batch.summary());
    Ok(batch)
}

/// Locate the record array in the top-level value
///
/// **Private** - internal helper for parse_events
fn extract_records(raw: &Value) -> Result<&Vec<Value>, ParseError> {
    match raw {
        Value::Array(records) => Ok(records),
        Value::Object(obj) => match obj.get("data") {
            Some(Value::Array(records)) => Ok(records),
            _ => Err(ParseError::InvalidFormat(
                "expected an array of records or an object with a `data` array".to_string(),
            )),
        },
        other => Err(ParseError::InvalidFormat(format!(
            "expected an array of records, found {}",
            json_kind(other)
        ))),
    }
}

/// Expand one record into its events; `None` if the record has no id
fn parse_record(obj: &Map<String, Value>, options: ParseOptions) -> Option<Vec<RawEvent>> {
    let id = find_string(obj, ID_FIELD_NAMES).map(ItemId::new)?;
    if id.is_empty() {
        return None;
    }

    let timestamp = find_string(obj, TIMESTAMP_FIELD_NAMES).and_then(|s| parse_timestamp(&s));
    let repo_scope = find_string(obj, REPO_FIELD_NAMES).unwrap_or_default();
    let secondary = find_string(obj, SECONDARY_LABEL_FIELD_NAMES);
    let author = find_string(obj, AUTHOR_FIELD_NAMES);
    let title = find_string(obj, TITLE_FIELD_NAMES);
    let url = find_string(obj, URL_FIELD_NAMES);

    let mut labels: Vec<String> = Vec::new();
    if let Some(primary) = find_string(obj, PRIMARY_LABEL_FIELD_NAMES) {
        labels.push(primary);
    }
    labels.extend(find_label_list(obj));

    if options.tag_bot_authors {
        let is_bot = author
            .as_deref()
            .is_some_and(|a| a.to_lowercase().contains("bot"));
        if is_bot && !labels.iter().any(|l| l.eq_ignore_ascii_case(BOT_LABEL)) {
            labels.push(BOT_LABEL.to_string());
        }
    }

    // Unlabelled items still count, under the fallback category
    if labels.is_empty() {
        labels.push(String::new());
    }

    let events = labels
        .into_iter()
        .map(|label| {
            let (primary, secondary) = split_combined_label(label, secondary.clone());
            RawEvent {
                id: id.clone(),
                timestamp,
                raw_label_primary: primary,
                raw_label_secondary: secondary,
                repo_scope: repo_scope.clone(),
                title: title.clone(),
                author: author.clone(),
                url: url.clone(),
            }
        })
        .collect();

    Some(events)
}

/// Split `"Process|Participants"` labels when no explicit secondary is given
///
/// **Public** - also used by tests
pub fn split_combined_label(label: String, secondary: Option<String>) -> (String, Option<String>) {
    if secondary.is_some() {
        return (label, secondary);
    }

    match label.split_once('|') {
        Some((primary, rest)) => (primary.trim().to_string(), Some(rest.trim().to_string())),
        None => (label, None),
    }
}

/// First field from `names` holding a string or number, as a string
fn find_string(obj: &Map<String, Value>, names: &[&str]) -> Option<String> {
    names.iter().find_map(|name| match obj.get(*name)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// Label arrays hold either plain strings or GitHub label objects with a `name`
fn find_label_list(obj: &Map<String, Value>) -> Vec<String> {
    LABEL_LIST_FIELD_NAMES
        .iter()
        .find_map(|name| obj.get(*name)?.as_array())
        .map(|labels| {
            labels
                .iter()
                .filter_map(|label| match label {
                    Value::String(s) => Some(s.clone()),
                    Value::Object(o) => o.get("name").and_then(Value::as_str).map(str::to_string),
                    _ => None,
                })
                .collect()
        })
        .unwrap_or_default()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
