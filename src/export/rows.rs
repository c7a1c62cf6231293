//! Flat export rows.
//!
//! Rows are cut from the same per-bucket id sets the chart counts, so the
//! category text in a row always matches the chart legend and the row count
//! equals the chart total under the same filters. One row is one chart unit:
//! an item counted under two categories in one month yields two rows, one per
//! category context.

use crate::aggregator::counts::{Aggregator, Dimensions};
use crate::aggregator::dedup::UnitId;
use crate::chart::filters::Filters;
use crate::normalizer::catalog::Dimension;
use crate::parser::schema::{ItemId, MonthKey, RawEvent, Scope};
use log::debug;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// One exported record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportRow {
    pub month: MonthKey,
    pub repo: String,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub participants: Option<String>,
    pub item_id: ItemId,
    pub title: String,
    pub author: String,
    pub url: String,
    /// Raw labels seen for the item in this month, `; `-joined
    pub labels: String,
}

impl ExportRow {
    /// Ordered (column, value) pairs; the participants column only exists for cross-tab rows
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![
            ("month", self.month.to_string()),
            ("repo", self.repo.clone()),
            ("category", self.category.clone()),
        ];
        if let Some(participants) = &self.participants {
            fields.push(("participants", participants.clone()));
        }
        fields.extend([
            ("item_id", self.item_id.to_string()),
            ("title", self.title.clone()),
            ("author", self.author.clone()),
            ("url", self.url.clone()),
            ("labels", self.labels.clone()),
        ]);
        fields
    }
}

/// Metadata of one item within one month
#[derive(Debug, Default)]
struct ItemDetail {
    repo: String,
    title: Option<String>,
    author: Option<String>,
    url: Option<String>,
    labels: BTreeSet<String>,
}

/// Project a batch into export rows
///
/// **Public** - main entry point for export
///
/// # Arguments
/// * `events` - Same batch the chart was built from
/// * `aggregator` - Same catalog and scope the chart used
/// * `dimensions` - Same dimensions the chart used
/// * `filters` - Same filters the chart used
///
/// # Returns
/// Rows ordered by month, category legend order, participants legend order, item id
pub fn export_rows(
    events: &[RawEvent],
    aggregator: &Aggregator<'_>,
    dimensions: Dimensions,
    filters: &Filters,
) -> Vec<ExportRow> {
    let sets = aggregator.bucket_sets(events, dimensions);
    let details = index_details(events, aggregator.scope());

    let primary_rank = legend_rank(
        aggregator,
        dimensions.primary(),
        sets.keys().map(|key| key.primary.as_str()),
    );
    let secondary_rank = dimensions
        .secondary()
        .map(|b| legend_rank(aggregator, b, sets.keys().filter_map(|key| key.secondary.as_deref())))
        .unwrap_or_default();

    let mut rows = Vec::new();
    for (key, ids) in sets.iter().filter(|(key, _)| filters.allows(key)) {
        for unit in ids {
            let detail = details.get(&(key.month.clone(), unit.clone()));
            rows.push(ExportRow {
                month: key.month.clone(),
                repo: detail.map(|d| d.repo.clone()).unwrap_or_default(),
                category: key.primary.clone(),
                participants: key.secondary.clone(),
                item_id: unit.id.clone(),
                title: detail.and_then(|d| d.title.clone()).unwrap_or_default(),
                author: detail.and_then(|d| d.author.clone()).unwrap_or_default(),
                url: detail
                    .and_then(|d| d.url.clone().or_else(|| pull_request_link(unit)))
                    .unwrap_or_default(),
                labels: detail
                    .map(|d| d.labels.iter().cloned().collect::<Vec<_>>().join("; "))
                    .unwrap_or_default(),
            });
        }
    }

    rows.sort_by(|a, b| {
        let rank = |ranks: &HashMap<String, usize>, category: Option<&String>| {
            category.and_then(|c| ranks.get(c)).copied().unwrap_or(usize::MAX)
        };
        a.month
            .cmp(&b.month)
            .then_with(|| rank(&primary_rank, Some(&a.category)).cmp(&rank(&primary_rank, Some(&b.category))))
            .then_with(|| {
                rank(&secondary_rank, a.participants.as_ref())
                    .cmp(&rank(&secondary_rank, b.participants.as_ref()))
            })
            .then_with(|| a.item_id.cmp(&b.item_id))
            .then_with(|| a.repo.cmp(&b.repo))
    });

    debug!("Exported {} rows from {} buckets", rows.len(), sets.len());
    rows
}

/// Per-(month, unit) metadata of the events visible in a scope
///
/// **Private** - first non-empty value wins for each field
fn index_details(events: &[RawEvent], scope: Scope) -> BTreeMap<(MonthKey, UnitId), ItemDetail> {
    let mut details: BTreeMap<(MonthKey, UnitId), ItemDetail> = BTreeMap::new();

    for event in events.iter().filter(|e| scope.includes(&e.repo_scope)) {
        let Some(month) = event.month() else {
            continue;
        };
        let detail = details.entry((month, UnitId::of(event))).or_default();

        if detail.repo.is_empty() {
            detail.repo = event.repo_scope.clone();
        }
        fill(&mut detail.title, &event.title);
        fill(&mut detail.author, &event.author);
        fill(&mut detail.url, &event.url);

        for label in [Some(&event.raw_label_primary), event.raw_label_secondary.as_ref()]
            .into_iter()
            .flatten()
        {
            if !label.trim().is_empty() {
                detail.labels.insert(label.trim().to_string());
            }
        }
    }

    details
}

fn fill(slot: &mut Option<String>, value: &Option<String>) {
    if slot.is_none() {
        if let Some(v) = value.as_ref().filter(|v| !v.trim().is_empty()) {
            *slot = Some(v.clone());
        }
    }
}

/// Legend position of every category, using the same order as chart legends
fn legend_rank<'a>(
    aggregator: &Aggregator<'_>,
    dimension: Dimension,
    found: impl Iterator<Item = &'a str>,
) -> HashMap<String, usize> {
    aggregator
        .catalog()
        .rule_set(dimension, aggregator.scope())
        .vocabulary()
        .order(found)
        .into_iter()
        .enumerate()
        .map(|(rank, category)| (category, rank))
        .collect()
}

/// GitHub pull request link for numeric ids in a known repository
fn pull_request_link(unit: &UnitId) -> Option<String> {
    let repository = match unit.repo? {
        Scope::Eips => "EIPs",
        Scope::Ercs => "ERCs",
        Scope::Rips => "RIPs",
        Scope::All => return None,
    };
    unit.id
        .as_str()
        .parse::<u64>()
        .ok()
        .map(|number| format!("https://github.com/ethereum/{}/pull/{}", repository, number))
}
