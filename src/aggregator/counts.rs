//! Month-bucketed category counts.
//!
//! The aggregator runs normalization and dedup in one pass and reduces each
//! bucket's id set to its size. Counts are kept in ordered maps so repeated
//! runs over the same batch produce identical output.

use super::dedup::{dedupe, resolve_secondary, BucketKey, BucketSets};
use crate::normalizer::catalog::{Dimension, RuleCatalog};
use crate::normalizer::vocabulary::CanonicalVocabulary;
use crate::parser::schema::{MonthKey, RawEvent, Scope};
use log::debug;
use std::collections::{BTreeMap, BTreeSet};

/// Which classification axes to aggregate over
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimensions {
    /// Primary label only
    One(Dimension),

    /// Primary label on the first axis, secondary label on the second
    Two(Dimension, Dimension),
}

impl Dimensions {
    /// The process × participants cross-tab
    pub const CROSS: Dimensions = Dimensions::Two(Dimension::Process, Dimension::Participants);

    pub fn primary(&self) -> Dimension {
        match self {
            Dimensions::One(a) | Dimensions::Two(a, _) => *a,
        }
    }

    pub fn secondary(&self) -> Option<Dimension> {
        match self {
            Dimensions::One(_) => None,
            Dimensions::Two(_, b) => Some(*b),
        }
    }
}

/// Normalize, dedupe and count a batch of events for one scope
#[derive(Debug, Clone, Copy)]
pub struct Aggregator<'c> {
    catalog: &'c RuleCatalog,
    scope: Scope,
}

impl<'c> Aggregator<'c> {
    pub fn new(catalog: &'c RuleCatalog, scope: Scope) -> Self {
        Self { catalog, scope }
    }

    pub fn catalog(&self) -> &'c RuleCatalog {
        self.catalog
    }

    pub fn scope(&self) -> Scope {
        self.scope
    }

    /// Canonical category of one event's primary label
    pub fn primary_category(&self, dimension: Dimension, event: &RawEvent) -> &'c str {
        self.catalog
            .classify(dimension, self.scope, &event.repo_scope, &event.raw_label_primary)
    }

    /// Canonical category of one event's secondary label (fallback when absent)
    pub fn secondary_category(&self, dimension: Dimension, event: &RawEvent) -> &'c str {
        let raw = event.raw_label_secondary.as_deref().unwrap_or("");
        self.catalog
            .classify(dimension, self.scope, &event.repo_scope, raw)
    }

    /// Per-bucket id sets for the events visible in this scope
    ///
    /// **Public** - shared by `aggregate` and the exporter so both see the same units
    ///
    /// For two dimensions the sets are already resolved to one secondary
    /// category per (month, primary, item).
    pub fn bucket_sets(&self, events: &[RawEvent], dimensions: Dimensions) -> BucketSets {
        let visible = events
            .iter()
            .filter(|event| self.scope.includes(&event.repo_scope));

        match dimensions {
            Dimensions::One(a) => dedupe(visible, |month, event| {
                Some(BucketKey::one(month, self.primary_category(a, event)))
            }),
            Dimensions::Two(a, b) => {
                let sets = dedupe(visible, |month, event| {
                    Some(BucketKey::two(
                        month,
                        self.primary_category(a, event),
                        self.secondary_category(b, event),
                    ))
                });
                let secondary_rules = self.catalog.rule_set(b, self.scope);
                resolve_secondary(sets, |category| secondary_rules.priority(category))
            }
        }
    }

    /// Aggregate a batch into counts
    ///
    /// **Public** - main entry point for aggregation
    ///
    /// # Arguments
    /// * `events` - Immutable input batch
    /// * `dimensions` - One or two classification axes
    ///
    /// # Returns
    /// Counts keyed by bucket plus the vocabularies that order their legends
    pub fn aggregate(&self, events: &[RawEvent], dimensions: Dimensions) -> AggregatedCounts {
        let sets = self.bucket_sets(events, dimensions);
        let counts = AggregatedCounts::from_bucket_sets(
            &sets,
            dimensions,
            self.catalog.rule_set(dimensions.primary(), self.scope).vocabulary().clone(),
            dimensions
                .secondary()
                .map(|b| self.catalog.rule_set(b, self.scope).vocabulary().clone()),
        );

        debug!(
            "Aggregated {} events into {} buckets (scope {}, total {})",
            events.len(),
            counts.len(),
            self.scope,
            counts.total()
        );

        counts
    }
}

/// Result of one aggregation pass
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedCounts {
    dimensions: Dimensions,
    counts: BTreeMap<BucketKey, u64>,
    primary_vocabulary: CanonicalVocabulary,
    secondary_vocabulary: Option<CanonicalVocabulary>,
}

impl AggregatedCounts {
    /// Reduce id sets to their sizes; empty sets are dropped
    pub fn from_bucket_sets(
        sets: &BucketSets,
        dimensions: Dimensions,
        primary_vocabulary: CanonicalVocabulary,
        secondary_vocabulary: Option<CanonicalVocabulary>,
    ) -> Self {
        let counts = sets
            .iter()
            .filter(|(_, ids)| !ids.is_empty())
            .map(|(key, ids)| (key.clone(), ids.len() as u64))
            .collect();

        Self {
            dimensions,
            counts,
            primary_vocabulary,
            secondary_vocabulary,
        }
    }

    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    pub fn is_two_dimensional(&self) -> bool {
        matches!(self.dimensions, Dimensions::Two(..))
    }

    pub fn primary_vocabulary(&self) -> &CanonicalVocabulary {
        &self.primary_vocabulary
    }

    pub fn secondary_vocabulary(&self) -> Option<&CanonicalVocabulary> {
        self.secondary_vocabulary.as_ref()
    }

    /// Non-empty buckets in key order
    pub fn entries(&self) -> impl Iterator<Item = (&BucketKey, u64)> {
        self.counts.iter().map(|(key, count)| (key, *count))
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Count for (month, primary), summed over every secondary category
    pub fn count(&self, month: &MonthKey, primary: &str) -> u64 {
        self.entries()
            .filter(|(key, _)| &key.month == month && key.primary == primary)
            .map(|(_, count)| count)
            .sum()
    }

    /// Count for one exact cell
    pub fn count_cell(&self, month: &MonthKey, primary: &str, secondary: &str) -> u64 {
        self.counts
            .get(&BucketKey::two(month.clone(), primary, secondary))
            .copied()
            .unwrap_or(0)
    }

    /// (month, primary) counts summed over the secondary dimension
    pub fn marginal(&self) -> BTreeMap<(MonthKey, String), u64> {
        let mut marginal = BTreeMap::new();
        for (key, count) in self.entries() {
            *marginal
                .entry((key.month.clone(), key.primary.clone()))
                .or_insert(0) += count;
        }
        marginal
    }

    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Months present, ascending
    pub fn months(&self) -> BTreeSet<MonthKey> {
        self.counts.keys().map(|key| key.month.clone()).collect()
    }

    /// Primary categories present
    pub fn primary_categories(&self) -> BTreeSet<&str> {
        self.counts.keys().map(|key| key.primary.as_str()).collect()
    }

    /// Secondary categories present
    pub fn secondary_categories(&self) -> BTreeSet<&str> {
        self.counts
            .keys()
            .filter_map(|key| key.secondary.as_deref())
            .collect()
    }
}
