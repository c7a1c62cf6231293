//! Core record types shared by every pipeline stage.
//!
//! A `RawEvent` is one (item, raw label) observation. The same item id shows up
//! once per raw label it carries; the month bucket is derived from its timestamp.

use crate::utils::error::ParseError;
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// A `YYYY-MM` month bucket
///
/// Lexicographic order equals chronological order, so keys sort as strings.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MonthKey(String);

impl MonthKey {
    /// Truncate a timestamp to its UTC month
    pub fn from_datetime(ts: &DateTime<Utc>) -> Self {
        Self(format!("{:04}-{:02}", ts.year(), ts.month()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Human label, e.g. "Mar 2024"
    pub fn display_label(&self) -> String {
        match NaiveDate::parse_from_str(&format!("{}-01", self.0), "%Y-%m-%d") {
            Ok(date) => date.format("%b %Y").to_string(),
            Err(_) => self.0.clone(),
        }
    }
}

impl FromStr for MonthKey {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let valid = s.len() == 7
            && s.is_ascii()
            && s.as_bytes()[4] == b'-'
            && s[..4].chars().all(|c| c.is_ascii_digit())
            && s[5..].chars().all(|c| c.is_ascii_digit())
            && matches!(s[5..].parse::<u32>(), Ok(1..=12));

        if valid {
            Ok(Self(s.to_string()))
        } else {
            Err(ParseError::InvalidMonth(s.to_string()))
        }
    }
}

impl TryFrom<String> for MonthKey {
    type Error = ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MonthKey> for String {
    fn from(value: MonthKey) -> Self {
        value.0
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Parse an upstream timestamp string
///
/// Accepts RFC 3339, `YYYY-MM-DD`, `YYYY-MM-DD HH:MM:SS` and a bare `YYYY-MM`.
/// Returns `None` for anything else; callers drop such records.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }

    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(naive.and_utc());
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
    }

    let month: MonthKey = raw.parse().ok()?;
    NaiveDate::parse_from_str(&format!("{}-01", month.as_str()), "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Opaque identifier of the underlying item (usually a PR number)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Ord for ItemId {
    fn cmp(&self, other: &Self) -> Ordering {
        // Numeric ids first and by value, so #2 sorts before #10
        match (self.0.parse::<u64>(), other.0.parse::<u64>()) {
            (Ok(a), Ok(b)) => a.cmp(&b).then_with(|| self.0.cmp(&other.0)),
            (Ok(_), Err(_)) => Ordering::Less,
            (Err(_), Ok(_)) => Ordering::Greater,
            (Err(_), Err(_)) => self.0.cmp(&other.0),
        }
    }
}

impl PartialOrd for ItemId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<u64> for ItemId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

/// Source collection an item belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    Eips,
    Ercs,
    Rips,
    All,
}

impl Scope {
    /// Specific (non-unified) scopes
    pub const SPECIFIC: [Scope; 3] = [Scope::Eips, Scope::Ercs, Scope::Rips];

    /// Resolve a free-text repo string to a specific scope
    ///
    /// Matches on the proposal family token ("EIP", "ercs", "ethereum/RIPs",
    /// "ERC PRs", ...). Returns `None` when no specific family is named.
    pub fn from_repo(repo: &str) -> Option<Scope> {
        let lower = repo.trim().to_lowercase();
        let name = lower.rsplit('/').next().unwrap_or(&lower);

        match name.split_whitespace().next()? {
            "eip" | "eips" => Some(Scope::Eips),
            "erc" | "ercs" => Some(Scope::Ercs),
            "rip" | "rips" => Some(Scope::Rips),
            _ => None,
        }
    }

    /// Whether an event from `repo` is visible under this scope
    pub fn includes(&self, repo: &str) -> bool {
        match self {
            Scope::All => true,
            specific => Scope::from_repo(repo) == Some(*specific),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::Eips => "eips",
            Scope::Ercs => "ercs",
            Scope::Rips => "rips",
            Scope::All => "all",
        }
    }
}

impl FromStr for Scope {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(Scope::All);
        }
        Scope::from_repo(s).ok_or_else(|| ParseError::UnknownScope(s.to_string()))
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One observed (item, raw label) activity record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawEvent {
    /// Stable id of the underlying item
    pub id: ItemId,

    /// Attributed point in time; `None` when upstream value was missing or unparseable
    pub timestamp: Option<DateTime<Utc>>,

    /// Free-text label (may be empty or malformed)
    pub raw_label_primary: String,

    /// Optional free-text sub-label for the two-dimensional view
    #[serde(default)]
    pub raw_label_secondary: Option<String>,

    /// Source collection, free text (see `Scope::from_repo`)
    pub repo_scope: String,

    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub author: Option<String>,

    #[serde(default)]
    pub url: Option<String>,
}

impl RawEvent {
    /// Create an event with no export metadata
    pub fn new(
        id: impl Into<ItemId>,
        timestamp: Option<DateTime<Utc>>,
        raw_label_primary: impl Into<String>,
        repo_scope: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            timestamp,
            raw_label_primary: raw_label_primary.into(),
            raw_label_secondary: None,
            repo_scope: repo_scope.into(),
            title: None,
            author: None,
            url: None,
        }
    }

    pub fn with_secondary(mut self, label: impl Into<String>) -> Self {
        self.raw_label_secondary = Some(label.into());
        self
    }

    /// Month bucket, or `None` when the record has no usable timestamp
    pub fn month(&self) -> Option<MonthKey> {
        self.timestamp.as_ref().map(MonthKey::from_datetime)
    }

    /// Whether this record may take part in aggregation
    pub fn is_well_formed(&self) -> bool {
        !self.id.is_empty() && self.timestamp.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_key_from_datetime() {
        let ts = parse_timestamp("2024-03-31T23:59:59Z").unwrap();
        assert_eq!(MonthKey::from_datetime(&ts).as_str(), "2024-03");
    }

    #[test]
    fn test_month_key_validation() {
        assert!("2024-03".parse::<MonthKey>().is_ok());
        assert!("2024-13".parse::<MonthKey>().is_err());
        assert!("2024-3".parse::<MonthKey>().is_err());
        assert!("March".parse::<MonthKey>().is_err());
    }

    #[test]
    fn test_parse_timestamp_formats() {
        assert!(parse_timestamp("2024-03-05T10:00:00+02:00").is_some());
        assert!(parse_timestamp("2024-03-05").is_some());
        assert!(parse_timestamp("2024-03-05 10:00:00").is_some());
        assert!(parse_timestamp("2024-03").is_some());
        assert!(parse_timestamp("").is_none());
        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn test_offset_timestamp_bucketed_in_utc() {
        let ts = parse_timestamp("2024-04-01T01:00:00+02:00").unwrap();
        assert_eq!(MonthKey::from_datetime(&ts).as_str(), "2024-03");
    }

    #[test]
    fn test_item_id_numeric_order() {
        let mut ids = vec![ItemId::from("10"), ItemId::from("abc"), ItemId::from("2")];
        ids.sort();
        assert_eq!(ids, vec![ItemId::from("2"), ItemId::from("10"), ItemId::from("abc")]);
    }

    #[test]
    fn test_scope_from_repo() {
        assert_eq!(Scope::from_repo("ethereum/ERCs"), Some(Scope::Ercs));
        assert_eq!(Scope::from_repo("EIP PRs"), Some(Scope::Eips));
        assert_eq!(Scope::from_repo("RIP"), Some(Scope::Rips));
        assert_eq!(Scope::from_repo("website"), None);
        assert_eq!(Scope::from_repo("ripple"), None);
        assert_eq!(Scope::from_repo("erc20-tools"), None);
        assert_eq!(Scope::from_repo(""), None);
        assert!("eipfoo".parse::<Scope>().is_err());
        assert_eq!("ERCs".parse::<Scope>().unwrap(), Scope::Ercs);
        assert!(Scope::All.includes("website"));
        assert!(!Scope::Eips.includes("ercs"));
    }
}
