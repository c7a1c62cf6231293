//! Property-based tests for the aggregation pipeline
//!
//! Properties covered:
//! 1. Every label normalizes into its vocabulary
//! 2. Aggregation and series building are deterministic
//! 3. Cross-tab marginals equal the one-dimensional counts
//! 4. Series grids are dense
//! 5. Export row count equals chart total

use pr_label_analytics::aggregator::{Aggregator, Dimensions};
use pr_label_analytics::chart::{build_series, ChartLayout, Filters};
use pr_label_analytics::export::export_rows;
use pr_label_analytics::normalizer::{Dimension, RuleCatalog};
use pr_label_analytics::parser::{parse_timestamp, RawEvent, Scope};
use proptest::prelude::*;

const LABELS: &[&str] = &[
    "Typo", "typo fix", "Status Change", "status-change", "STATUS_CHANGE", "EIP Update",
    "ERC update", "New EIP", "new-erc", "New RIP", "created by bot", "website", "EIP-1",
    "r-ci", "PR DRAFT", "", "   ", "xyzzy", "ünïcödé",
];
const PARTICIPANTS: &[&str] = &[
    "Waiting on Editor", "e-review", "a-review", "Stagnant", "Awaited", "draft", "()", "misc", "",
];
const REPOS: &[&str] = &["EIPs", "ethereum/ERCs", "RIPs", "", "other"];

fn arb_event() -> impl Strategy<Value = RawEvent> {
    (
        1u32..20,
        prop_oneof![
            (2023i32..2025, 1u32..13, 1u32..28)
                .prop_map(|(y, m, d)| format!("{:04}-{:02}-{:02}", y, m, d)),
            Just("not a date".to_string()),
        ],
        prop::sample::select(LABELS),
        prop::option::of(prop::sample::select(PARTICIPANTS)),
        prop::sample::select(REPOS),
    )
        .prop_map(|(id, ts, label, participants, repo)| {
            let event = RawEvent::new(id.to_string().as_str(), parse_timestamp(&ts), label, repo);
            match participants {
                Some(p) => event.with_secondary(p),
                None => event,
            }
        })
}

fn arb_scope() -> impl Strategy<Value = Scope> {
    prop::sample::select(vec![Scope::Eips, Scope::Ercs, Scope::Rips, Scope::All])
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_normalize_is_total(raw in ".*", scope in arb_scope()) {
        let catalog = RuleCatalog::builtin();
        for dimension in Dimension::ALL {
            let category = catalog.normalize(dimension, scope, &raw);
            prop_assert!(!category.is_empty());
            prop_assert!(catalog.rule_set(dimension, scope).vocabulary().contains(category));
        }
    }

    #[test]
    fn prop_classify_stays_in_view_vocabulary(raw in ".*", repo in ".*", scope in arb_scope()) {
        let catalog = RuleCatalog::builtin();
        for dimension in Dimension::ALL {
            let category = catalog.classify(dimension, scope, &repo, &raw);
            prop_assert!(catalog.rule_set(dimension, scope).vocabulary().contains(category));
        }
    }

    #[test]
    fn prop_cross_marginals_match(
        events in prop::collection::vec(arb_event(), 0..40),
        scope in arb_scope(),
    ) {
        let aggregator = Aggregator::new(RuleCatalog::builtin(), scope);
        let one = aggregator.aggregate(&events, Dimensions::One(Dimension::Process));
        let two = aggregator.aggregate(&events, Dimensions::CROSS);

        prop_assert_eq!(one.marginal(), two.marginal());
    }

    #[test]
    fn prop_pipeline_is_deterministic(
        events in prop::collection::vec(arb_event(), 0..40),
        scope in arb_scope(),
    ) {
        let aggregator = Aggregator::new(RuleCatalog::builtin(), scope);
        let mut shuffled = events.clone();
        shuffled.reverse();

        for layout in [ChartLayout::Timeline, ChartLayout::PrimaryOnAxis, ChartLayout::SecondaryOnAxis] {
            let a = build_series(&aggregator.aggregate(&events, Dimensions::CROSS), layout, &Filters::new()).unwrap();
            let b = build_series(&aggregator.aggregate(&shuffled, Dimensions::CROSS), layout, &Filters::new()).unwrap();
            prop_assert_eq!(
                serde_json::to_string(&a).unwrap(),
                serde_json::to_string(&b).unwrap()
            );
        }
    }

    #[test]
    fn prop_series_are_dense(
        events in prop::collection::vec(arb_event(), 0..40),
        scope in arb_scope(),
    ) {
        let counts = Aggregator::new(RuleCatalog::builtin(), scope).aggregate(&events, Dimensions::CROSS);
        for layout in [ChartLayout::Timeline, ChartLayout::PrimaryOnAxis, ChartLayout::SecondaryOnAxis] {
            let chart = build_series(&counts, layout, &Filters::new()).unwrap();
            for series in &chart.series {
                prop_assert_eq!(series.data.len(), chart.axis_labels.len());
            }

            // Category-axis layouts show only the latest month
            let expected: u64 = match (layout, counts.months().last()) {
                (ChartLayout::Timeline, _) => counts.total(),
                (_, Some(latest)) => counts
                    .entries()
                    .filter(|(key, _)| &key.month == latest)
                    .map(|(_, count)| count)
                    .sum(),
                (_, None) => 0,
            };
            prop_assert_eq!(chart.total(), expected);
        }
    }

    #[test]
    fn prop_export_matches_chart(
        events in prop::collection::vec(arb_event(), 0..40),
        scope in arb_scope(),
        cross in any::<bool>(),
    ) {
        let aggregator = Aggregator::new(RuleCatalog::builtin(), scope);
        let dimensions = if cross { Dimensions::CROSS } else { Dimensions::One(Dimension::Label) };
        let filters = Filters::new();

        let chart = build_series(&aggregator.aggregate(&events, dimensions), ChartLayout::Timeline, &filters).unwrap();
        let rows = export_rows(&events, &aggregator, dimensions, &filters);

        prop_assert_eq!(rows.len() as u64, chart.total());
    }
}
