use pr_label_analytics::parser::{parse_events, parse_timestamp, ItemId, MonthKey, ParseOptions, Scope};
use pretty_assertions::assert_eq;
use serde_json::json;

#[test]
fn test_parse_mixed_field_names() {
    let raw = json!({
        "data": [
            {"prNumber": 101, "createdAt": "2024-03-04T12:00:00Z", "label": "Typo", "repo": "EIPs",
             "title": "Fix typo", "author": "alice"},
            {"number": "102", "monthYear": "2024-03", "category": "Website|Stagnant", "specType": "ERCs"},
            {"id": 103, "timestamp": "2024-03-09", "process": "Typo", "participants": "a-review",
             "repository": "ethereum/RIPs"}
        ]
    });

    let batch = parse_events(&raw, ParseOptions::default()).unwrap();

    assert_eq!(batch.records_seen, 3);
    assert_eq!(batch.records_dropped, 0);
    assert_eq!(batch.events.len(), 3);

    let first = &batch.events[0];
    assert_eq!(first.id, ItemId::from(101));
    assert_eq!(first.title.as_deref(), Some("Fix typo"));
    assert_eq!(first.month(), Some("2024-03".parse::<MonthKey>().unwrap()));

    let second = &batch.events[1];
    assert_eq!(second.raw_label_primary, "Website");
    assert_eq!(second.raw_label_secondary.as_deref(), Some("Stagnant"));
    assert_eq!(Scope::from_repo(&second.repo_scope), Some(Scope::Ercs));

    let third = &batch.events[2];
    assert_eq!(third.raw_label_secondary.as_deref(), Some("a-review"));
    assert_eq!(Scope::from_repo(&third.repo_scope), Some(Scope::Rips));
}

#[test]
fn test_bad_timestamp_kept_but_undated() {
    let raw = json!([
        {"id": 1, "createdAt": "yesterday", "label": "Typo"},
        {"id": 2, "label": "Typo"}
    ]);

    let batch = parse_events(&raw, ParseOptions::default()).unwrap();

    assert_eq!(batch.events.len(), 2);
    assert_eq!(batch.undated_events, 2);
    assert!(batch.events.iter().all(|e| !e.is_well_formed()));
}

#[test]
fn test_unlabelled_record_yields_one_event() {
    let raw = json!([{"id": 5, "createdAt": "2024-01-01", "labels": []}]);

    let batch = parse_events(&raw, ParseOptions::default()).unwrap();

    assert_eq!(batch.events.len(), 1);
    assert_eq!(batch.events[0].raw_label_primary, "");
}

#[test]
fn test_bot_tagging() {
    let raw = json!([
        {"id": 7, "createdAt": "2024-01-01", "labels": ["e-review"], "author": "eth-bot"},
        {"id": 8, "createdAt": "2024-01-01", "labels": ["e-review"], "author": "robert"}
    ]);

    let untagged = parse_events(&raw, ParseOptions::default()).unwrap();
    let tagged = parse_events(&raw, ParseOptions { tag_bot_authors: true }).unwrap();

    assert_eq!(untagged.events.len(), 2);
    assert_eq!(tagged.events.len(), 3);
    assert!(tagged
        .events
        .iter()
        .any(|e| e.id == ItemId::from(7) && e.raw_label_primary == "Created By Bot"));
}

#[test]
fn test_timestamp_formats() {
    let expected: MonthKey = "2024-03".parse().unwrap();
    for raw in [
        "2024-03-31T23:00:00Z",
        "2024-03-15T10:00:00+02:00",
        "2024-03-15 10:00:00",
        "2024-03-15",
        "2024-03",
    ] {
        let ts = parse_timestamp(raw).unwrap_or_else(|| panic!("{} did not parse", raw));
        assert_eq!(MonthKey::from_datetime(&ts), expected, "{}", raw);
    }

    // Offset pushes the instant into the next UTC month
    let ts = parse_timestamp("2024-03-31T23:30:00-02:00").unwrap();
    assert_eq!(MonthKey::from_datetime(&ts).as_str(), "2024-04");

    assert!(parse_timestamp("2024-13").is_none());
    assert!(parse_timestamp("").is_none());
}

#[test]
fn test_numeric_ids_sort_numerically() {
    let mut ids = vec![ItemId::from("10"), ItemId::from("abc"), ItemId::from("2")];
    ids.sort();
    assert_eq!(ids, vec![ItemId::from("2"), ItemId::from("10"), ItemId::from("abc")]);
}
