//! Dense stacked series from aggregated counts.
//!
//! Every layout reads the same `AggregatedCounts`; switching which dimension
//! sits on the axis never re-aggregates, so all views agree on totals.
//! Category-axis layouts chart a single month, since summing months would
//! count an item once per month it was active.

use super::filters::Filters;
use crate::aggregator::counts::{AggregatedCounts, Dimensions};
use crate::aggregator::dedup::BucketKey;
use crate::normalizer::vocabulary::CanonicalVocabulary;
use crate::utils::config::SCHEMA_VERSION;
use crate::utils::error::{ChartError, ParseError};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

/// What goes on the category axis and what gets stacked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChartLayout {
    /// Axis = months, series = first-dimension categories (summed over the second)
    #[default]
    Timeline,

    /// Axis = first-dimension categories, series = second-dimension categories
    PrimaryOnAxis,

    /// Axis = second-dimension categories, series = first-dimension categories
    SecondaryOnAxis,
}

impl ChartLayout {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChartLayout::Timeline => "timeline",
            ChartLayout::PrimaryOnAxis => "primary-axis",
            ChartLayout::SecondaryOnAxis => "secondary-axis",
        }
    }

    /// The layout with the two category dimensions swapped
    pub fn swapped(&self) -> ChartLayout {
        match self {
            ChartLayout::Timeline => ChartLayout::Timeline,
            ChartLayout::PrimaryOnAxis => ChartLayout::SecondaryOnAxis,
            ChartLayout::SecondaryOnAxis => ChartLayout::PrimaryOnAxis,
        }
    }
}

impl FromStr for ChartLayout {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "timeline" | "month" | "months" => Ok(ChartLayout::Timeline),
            "primary-axis" | "primary" | "process-on-axis" => Ok(ChartLayout::PrimaryOnAxis),
            "secondary-axis" | "secondary" | "participants-on-axis" => {
                Ok(ChartLayout::SecondaryOnAxis)
            }
            other => Err(ParseError::InvalidFormat(format!(
                "unknown chart layout '{}' (expected timeline, primary-axis or secondary-axis)",
                other
            ))),
        }
    }
}

impl fmt::Display for ChartLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One stacked series
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Series {
    pub name: String,
    pub data: Vec<u64>,
}

impl Series {
    pub fn total(&self) -> u64 {
        self.data.iter().sum()
    }
}

/// Chart-ready grid: `data.len() == axis_labels.len()` for every series
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartData {
    pub axis_labels: Vec<String>,
    pub series: Vec<Series>,
}

impl ChartData {
    /// Sum of every cell
    pub fn total(&self) -> u64 {
        self.series.iter().map(Series::total).sum()
    }

    /// The "no data" state
    pub fn is_empty(&self) -> bool {
        self.axis_labels.is_empty() && self.series.is_empty()
    }

    /// Per-axis-label totals (height of each stacked bar)
    pub fn axis_totals(&self) -> Vec<u64> {
        (0..self.axis_labels.len())
            .map(|i| self.series.iter().map(|s| s.data.get(i).copied().unwrap_or(0)).sum())
            .collect()
    }
}

/// Build the dense series grid for one layout
///
/// **Public** - main entry point for charting
///
/// # Arguments
/// * `counts` - Result of one aggregation pass
/// * `layout` - Axis/stack arrangement
/// * `filters` - Month and category selections; see `layout_filters` for the
///   month a category-axis layout falls back to
///
/// # Returns
/// Axis labels plus one series per stacked category, zero-filled
///
/// # Errors
/// * `ChartError::NeedsTwoDimensions` - A category-axis layout over one-dimensional counts
pub fn build_series(
    counts: &AggregatedCounts,
    layout: ChartLayout,
    filters: &Filters,
) -> Result<ChartData, ChartError> {
    let secondary_vocabulary = counts.secondary_vocabulary();
    if layout != ChartLayout::Timeline && !counts.is_two_dimensional() {
        return Err(ChartError::NeedsTwoDimensions(layout.to_string()));
    }
    let filters = &layout_filters(counts, layout, filters);

    let mut cells: BTreeMap<(String, String), u64> = BTreeMap::new();
    for (key, count) in counts.entries().filter(|(key, _)| filters.allows(key)) {
        let Some((axis, stack)) = place(key, layout) else {
            continue;
        };
        *cells.entry((stack, axis)).or_insert(0) += count;
    }

    if cells.is_empty() {
        debug!("No cells survive the filters; returning empty chart");
        return Ok(ChartData::default());
    }

    let axis_found: BTreeSet<&str> = cells.keys().map(|(_, axis)| axis.as_str()).collect();
    let stack_found: BTreeSet<&str> = cells.keys().map(|(stack, _)| stack.as_str()).collect();

    let (axis_vocabulary, stack_vocabulary) = match layout {
        ChartLayout::Timeline => (None, Some(counts.primary_vocabulary())),
        ChartLayout::PrimaryOnAxis => (Some(counts.primary_vocabulary()), secondary_vocabulary),
        ChartLayout::SecondaryOnAxis => (secondary_vocabulary, Some(counts.primary_vocabulary())),
    };

    let axis_labels = legend_order(axis_vocabulary, axis_found);
    let series_names = legend_order(stack_vocabulary, stack_found);

    let series = series_names
        .into_iter()
        .map(|name| {
            let data = axis_labels
                .iter()
                .map(|axis| cells.get(&(name.clone(), axis.clone())).copied().unwrap_or(0))
                .collect();
            Series { name, data }
        })
        .collect::<Vec<_>>();

    debug!(
        "Built {} layout: {} axis labels x {} series",
        layout,
        axis_labels.len(),
        series.len()
    );

    Ok(ChartData {
        axis_labels,
        series,
    })
}

/// Filters a layout is actually built with
///
/// **Public** - shared with export so its rows cover the same month
///
/// The timeline keeps `filters` as given. A category-axis layout without a
/// month filter is pinned to the latest month present in `counts`.
pub fn layout_filters(counts: &AggregatedCounts, layout: ChartLayout, filters: &Filters) -> Filters {
    if layout == ChartLayout::Timeline || filters.month.is_some() {
        return filters.clone();
    }

    let pinned = filters.clone().or_latest_month(&counts.months());
    if let Some(month) = &pinned.month {
        debug!("{} layout defaults to latest month {}", layout, month);
    }
    pinned
}

/// (axis value, stack value) of one bucket under a layout
///
/// **Private** - internal helper
fn place(key: &BucketKey, layout: ChartLayout) -> Option<(String, String)> {
    match layout {
        ChartLayout::Timeline => Some((key.month.to_string(), key.primary.clone())),
        ChartLayout::PrimaryOnAxis => key
            .secondary
            .as_ref()
            .map(|secondary| (key.primary.clone(), secondary.clone())),
        ChartLayout::SecondaryOnAxis => key
            .secondary
            .as_ref()
            .map(|secondary| (secondary.clone(), key.primary.clone())),
    }
}

/// Vocabulary order when a vocabulary applies, plain sorted order otherwise (months)
///
/// **Private** - internal helper
fn legend_order(vocabulary: Option<&CanonicalVocabulary>, found: BTreeSet<&str>) -> Vec<String> {
    match vocabulary {
        Some(vocabulary) => vocabulary.order(found),
        None => found.into_iter().map(str::to_string).collect(),
    }
}

/// Chart plus the context it was built in, as written to disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartReport {
    pub version: String,
    pub generated_at: String,
    pub scope: String,
    pub dimensions: String,
    pub layout: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month: Option<String>,
    pub total: u64,
    #[serde(flatten)]
    pub chart: ChartData,
}

/// Wrap a chart with its build context
///
/// **Public** - what `chart --output` writes
pub fn to_report(
    chart: ChartData,
    scope: &str,
    dimensions: Dimensions,
    layout: ChartLayout,
    filters: &Filters,
) -> ChartReport {
    let dimensions = match dimensions {
        Dimensions::One(a) => a.to_string(),
        Dimensions::Two(a, b) => format!("{}|{}", a, b),
    };

    ChartReport {
        version: SCHEMA_VERSION.to_string(),
        generated_at: chrono::Utc::now().to_rfc3339(),
        scope: scope.to_string(),
        dimensions,
        layout: layout.to_string(),
        month: filters.month.as_ref().map(ToString::to_string),
        total: chart.total(),
        chart,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::dedup::{BucketSets, UnitId};
    use crate::parser::schema::{MonthKey, Scope};

    fn vocab(categories: &[&str], fallback: &str) -> CanonicalVocabulary {
        CanonicalVocabulary::new(categories.iter().copied(), fallback)
    }

    fn one_dimensional() -> AggregatedCounts {
        let mut sets = BucketSets::new();
        let add = |sets: &mut BucketSets, month: &str, category: &str, id: &str| {
            sets.entry(BucketKey::one(month.parse().unwrap(), category))
                .or_default()
                .insert(UnitId::new(Some(Scope::Eips), id));
        };
        add(&mut sets, "2024-04", "Typo Fix", "1");
        add(&mut sets, "2024-03", "Zebra", "2");
        add(&mut sets, "2024-03", "Status Change", "3");
        add(&mut sets, "2024-03", "Status Change", "4");

        AggregatedCounts::from_bucket_sets(
            &sets,
            Dimensions::One(crate::normalizer::catalog::Dimension::Label),
            vocab(&["Typo Fix", "Status Change"], "Misc"),
            None,
        )
    }

    #[test]
    fn test_timeline_is_dense_and_ordered() {
        let chart = build_series(&one_dimensional(), ChartLayout::Timeline, &Filters::new()).unwrap();

        assert_eq!(chart.axis_labels, vec!["2024-03", "2024-04"]);
        let names: Vec<_> = chart.series.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Typo Fix", "Status Change", "Zebra"]);
        assert_eq!(chart.series[0].data, vec![0, 1]);
        assert_eq!(chart.series[1].data, vec![2, 0]);
        assert_eq!(chart.total(), 4);
        assert_eq!(chart.axis_totals(), vec![3, 1]);
    }

    #[test]
    fn test_cross_layout_needs_two_dimensions() {
        let result = build_series(&one_dimensional(), ChartLayout::PrimaryOnAxis, &Filters::new());
        assert_eq!(
            result,
            Err(ChartError::NeedsTwoDimensions("primary-axis".to_string()))
        );
    }

    #[test]
    fn test_filtered_to_nothing_is_empty() {
        let filters = Filters::new().with_month("2023-01".parse::<MonthKey>().unwrap());
        let chart = build_series(&one_dimensional(), ChartLayout::Timeline, &filters).unwrap();
        assert!(chart.is_empty());
        assert_eq!(chart.total(), 0);
    }

    #[test]
    fn test_axis_totals_tolerate_short_series() {
        let chart = ChartData {
            axis_labels: vec!["a".to_string(), "b".to_string()],
            series: vec![
                Series { name: "x".to_string(), data: vec![1, 2] },
                Series { name: "y".to_string(), data: vec![3] },
            ],
        };
        assert_eq!(chart.axis_totals(), vec![4, 2]);
    }

    #[test]
    fn test_layout_parse() {
        assert_eq!("primary-axis".parse::<ChartLayout>().unwrap(), ChartLayout::PrimaryOnAxis);
        assert_eq!(ChartLayout::PrimaryOnAxis.swapped(), ChartLayout::SecondaryOnAxis);
        assert!("pie".parse::<ChartLayout>().is_err());
    }

    #[test]
    fn test_chart_data_serializes_camel_case() {
        let chart = ChartData {
            axis_labels: vec!["2024-03".to_string()],
            series: vec![Series {
                name: "Typo Fix".to_string(),
                data: vec![1],
            }],
        };
        let json = serde_json::to_value(&chart).unwrap();
        assert!(json.get("axisLabels").is_some());
    }
}
