//! View filters shared by charting and export.
//!
//! Filters only suppress cells of an existing aggregation; they never
//! re-normalize labels.

use crate::aggregator::dedup::BucketKey;
use crate::parser::schema::MonthKey;
use std::collections::BTreeSet;

/// Set of enabled categories for one dimension
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategorySelection {
    #[default]
    All,
    Only(BTreeSet<String>),
}

impl CategorySelection {
    /// Enable only the given categories; an empty list means all
    pub fn only<I, S>(categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let selected: BTreeSet<String> = categories.into_iter().map(Into::into).collect();
        if selected.is_empty() {
            CategorySelection::All
        } else {
            CategorySelection::Only(selected)
        }
    }

    pub fn allows(&self, category: &str) -> bool {
        match self {
            CategorySelection::All => true,
            CategorySelection::Only(selected) => selected.contains(category),
        }
    }
}

/// Active filter state of one view
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Filters {
    /// Restrict to one month
    pub month: Option<MonthKey>,

    /// Enabled categories on the first dimension
    pub primary: CategorySelection,

    /// Enabled categories on the second dimension (ignored for 1-D data)
    pub secondary: CategorySelection,
}

impl Filters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_month(mut self, month: MonthKey) -> Self {
        self.month = Some(month);
        self
    }

    pub fn with_primary(mut self, selection: CategorySelection) -> Self {
        self.primary = selection;
        self
    }

    pub fn with_secondary(mut self, selection: CategorySelection) -> Self {
        self.secondary = selection;
        self
    }

    /// Select the latest of `months` when no month is selected yet
    pub fn or_latest_month(mut self, months: &BTreeSet<MonthKey>) -> Self {
        if self.month.is_none() {
            self.month = months.last().cloned();
        }
        self
    }

    /// Whether a bucket survives the filters
    pub fn allows(&self, key: &BucketKey) -> bool {
        let month_ok = self.month.as_ref().map_or(true, |m| *m == key.month);
        let secondary_ok = key
            .secondary
            .as_deref()
            .map_or(true, |s| self.secondary.allows(s));

        month_ok && self.primary.allows(&key.primary) && secondary_ok
    }
}
