//! Per-bucket deduplication of item ids.
//!
//! Buckets hold the *set* of contributing item ids, not a running counter, so
//! an item seen under several raw spellings of the same category in the same
//! month counts once. Dedup is scoped per bucket: an item whose labels resolve
//! to two different categories lands in both buckets.
//!
//! Item numbers are only unique within one repository, so a counted unit is
//! identified by its repository family plus its id.

use crate::parser::schema::{ItemId, MonthKey, RawEvent, Scope};
use log::debug;
use std::collections::{BTreeMap, BTreeSet};

/// Aggregation key: month plus one or two category values
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BucketKey {
    pub month: MonthKey,
    pub primary: String,
    pub secondary: Option<String>,
}

impl BucketKey {
    pub fn one(month: MonthKey, primary: impl Into<String>) -> Self {
        Self {
            month,
            primary: primary.into(),
            secondary: None,
        }
    }

    pub fn two(month: MonthKey, primary: impl Into<String>, secondary: impl Into<String>) -> Self {
        Self {
            month,
            primary: primary.into(),
            secondary: Some(secondary.into()),
        }
    }
}

/// One counted item: repository family plus its id within that family
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UnitId {
    /// `None` when the repo string names no known family
    pub repo: Option<Scope>,
    pub id: ItemId,
}

impl UnitId {
    pub fn new(repo: Option<Scope>, id: impl Into<ItemId>) -> Self {
        Self {
            repo,
            id: id.into(),
        }
    }

    /// Identity of the item an event belongs to
    pub fn of(event: &RawEvent) -> Self {
        Self {
            repo: Scope::from_repo(&event.repo_scope),
            id: event.id.clone(),
        }
    }
}

/// Bucket key -> distinct contributing units
pub type BucketSets = BTreeMap<BucketKey, BTreeSet<UnitId>>;

/// Group events into per-bucket id sets
///
/// **Public** - the deduplication step, exposed so its intermediate result is testable
///
/// # Arguments
/// * `events` - Events to bucket
/// * `bucket_key` - Computes the bucket of a well-formed event from its month
///
/// Events with an empty id or no usable timestamp are skipped; they are never
/// assigned to a default month. A key function returning `None` skips the event.
pub fn dedupe<'e, I, F>(events: I, mut bucket_key: F) -> BucketSets
where
    I: IntoIterator<Item = &'e RawEvent>,
    F: FnMut(MonthKey, &RawEvent) -> Option<BucketKey>,
{
    let mut sets = BucketSets::new();
    let mut skipped = 0usize;

    for event in events {
        let month = match event.month() {
            Some(month) if !event.id.is_empty() => month,
            _ => {
                skipped += 1;
                continue;
            }
        };

        if let Some(key) = bucket_key(month, event) {
            sets.entry(key).or_default().insert(UnitId::of(event));
        }
    }

    if skipped > 0 {
        debug!("Skipped {} malformed events during dedup", skipped);
    }

    sets
}

/// Keep a single secondary category per (month, primary, item)
///
/// **Public** - used by the two-dimensional aggregation
///
/// When one item carries several secondary labels for the same month and
/// primary category, only the secondary with the lowest `priority` survives
/// (ties broken by name). Every item then contributes exactly once to each
/// (month, primary) pair, which keeps the secondary-summed counts equal to the
/// one-dimensional counts. Keys without a secondary pass through untouched.
pub fn resolve_secondary<P>(sets: BucketSets, priority: P) -> BucketSets
where
    P: Fn(&str) -> usize,
{
    let mut best: BTreeMap<(MonthKey, String, UnitId), (usize, String)> = BTreeMap::new();
    let mut resolved = BucketSets::new();

    for (key, ids) in sets {
        let Some(secondary) = key.secondary else {
            resolved.entry(key).or_default().extend(ids);
            continue;
        };

        let rank = priority(&secondary);
        for unit in ids {
            let candidate = (rank, secondary.clone());
            best.entry((key.month.clone(), key.primary.clone(), unit))
                .and_modify(|current| {
                    if candidate < *current {
                        *current = candidate.clone();
                    }
                })
                .or_insert(candidate);
        }
    }

    for ((month, primary, unit), (_, secondary)) in best {
        resolved
            .entry(BucketKey::two(month, primary, secondary))
            .or_default()
            .insert(unit);
    }

    resolved
}
