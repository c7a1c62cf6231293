use pr_label_analytics::commands::chart::validate_args as validate_chart_args;
use pr_label_analytics::commands::export::validate_args as validate_export_args;
use pr_label_analytics::commands::{execute_chart, execute_export, ChartArgs, ExportArgs, ViewArgs};
use pr_label_analytics::output::read_chart;
use pretty_assertions::assert_eq;
use std::io::Write;
use std::path::PathBuf;
use tempfile::{tempdir, NamedTempFile};

const BATCH: &str = r#"[
  {"number": 10, "createdAt": "2024-03-01T09:00:00Z", "label": "Typo|Waiting on Editor", "repo": "EIPs", "title": "Fix typo"},
  {"number": 10, "createdAt": "2024-03-02T09:00:00Z", "label": "typo|stagnant", "repo": "EIPs"},
  {"number": 11, "createdAt": "2024-03-03T09:00:00Z", "label": "New EIP|a-review", "repo": "EIPs"},
  {"number": 12, "createdAt": "2024-04-01T09:00:00Z", "label": "Website", "repo": "EIPs"},
  {"number": 13, "createdAt": "2024-04-01T09:00:00Z", "label": "Typo", "repo": "ERCs"}
]"#;

fn batch_file() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(BATCH.as_bytes()).unwrap();
    file
}

fn view(input: PathBuf) -> ViewArgs {
    ViewArgs {
        input: Some(input),
        scope: "eips".to_string(),
        dimension: "process".to_string(),
        ..Default::default()
    }
}

#[test]
fn test_execute_chart_writes_json() {
    let input = batch_file();
    let dir = tempdir().unwrap();
    let output = dir.path().join("charts/process.json");

    let chart = execute_chart(ChartArgs {
        view: view(input.path().to_path_buf()),
        output: Some(output.clone()),
        ..Default::default()
    })
    .unwrap();

    assert_eq!(chart.axis_labels, vec!["2024-03", "2024-04"]);
    assert_eq!(chart.total(), 3);

    let report = read_chart(&output).unwrap();
    assert_eq!(report.chart, chart);
    assert_eq!(report.scope, "eips");
    assert_eq!(report.total, 3);
}

#[test]
fn test_execute_chart_cross_layout() {
    let input = batch_file();
    let dir = tempdir().unwrap();

    let output = dir.path().join("cross.json");

    let chart = execute_chart(ChartArgs {
        view: ViewArgs {
            cross: true,
            month: Some("2024-03".to_string()),
            ..view(input.path().to_path_buf())
        },
        layout: "primary-axis".to_string(),
        output: Some(output.clone()),
        ..Default::default()
    })
    .unwrap();

    assert_eq!(chart.axis_labels, vec!["Typo", "NEW EIP"]);
    assert_eq!(chart.total(), 2);
    assert_eq!(read_chart(&output).unwrap().month.as_deref(), Some("2024-03"));
}

#[test]
fn test_cross_layout_defaults_to_latest_month() {
    let input = batch_file();
    let dir = tempdir().unwrap();
    let output = dir.path().join("cross.json");

    let chart = execute_chart(ChartArgs {
        view: ViewArgs {
            cross: true,
            ..view(input.path().to_path_buf())
        },
        layout: "primary-axis".to_string(),
        output: Some(output.clone()),
        ..Default::default()
    })
    .unwrap();

    assert_eq!(chart.axis_labels, vec!["Website"]);
    assert_eq!(chart.total(), 1);
    assert_eq!(read_chart(&output).unwrap().month.as_deref(), Some("2024-04"));

    let rows = execute_export(ExportArgs {
        view: ViewArgs {
            cross: true,
            ..view(input.path().to_path_buf())
        },
        output: dir.path().join("cross.csv"),
        delimiter: ',',
    })
    .unwrap();

    assert_eq!(rows.len() as u64, chart.total());
    assert!(rows.iter().all(|r| r.month.as_str() == "2024-04"));
}

#[test]
fn test_execute_export_matches_chart() {
    let input = batch_file();
    let dir = tempdir().unwrap();
    let csv_path = dir.path().join("rows.csv");

    let rows = execute_export(ExportArgs {
        view: ViewArgs {
            cross: true,
            month: Some("2024-03".to_string()),
            ..view(input.path().to_path_buf())
        },
        output: csv_path.clone(),
        delimiter: ';',
    })
    .unwrap();

    assert_eq!(rows.len(), 2);
    let content = std::fs::read_to_string(&csv_path).unwrap();
    let lines: Vec<_> = content.lines().collect();
    assert_eq!(
        lines[0],
        "month;repo;category;participants;item_id;title;author;url;labels"
    );
    assert!(lines[1].starts_with("2024-03;EIPs;Typo;Waiting on Editor;10;Fix typo;"));
}

#[test]
fn test_execute_chart_missing_input_fails() {
    let result = execute_chart(ChartArgs {
        view: view(PathBuf::from("/nonexistent/batch.json")),
        ..Default::default()
    });
    assert!(result.is_err());
}

#[test]
fn test_validate_args() {
    let base = view(PathBuf::from("batch.json"));

    assert!(validate_chart_args(&ChartArgs {
        view: base.clone(),
        ..Default::default()
    })
    .is_ok());
    assert!(validate_chart_args(&ChartArgs {
        view: base.clone(),
        layout: "secondary-axis".to_string(),
        ..Default::default()
    })
    .is_err());
    assert!(validate_export_args(&ExportArgs {
        view: base.clone(),
        ..Default::default()
    })
    .is_ok());
    assert!(validate_export_args(&ExportArgs {
        view: ViewArgs {
            url: Some("localhost:3000".to_string()),
            input: None,
            ..base
        },
        ..Default::default()
    })
    .is_err());
}
