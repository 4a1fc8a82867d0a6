use pretty_assertions::assert_eq;
use serde_json::Value;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::{tempdir, NamedTempFile};

/// Maize prices under non-default column names, starting in late 2019
fn write_maize_csv() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "day,maize").unwrap();
    writeln!(file, "2019-12-30,90").unwrap();
    writeln!(file, "2019-12-31,95").unwrap();
    for day in 1..=10 {
        writeln!(file, "2020-01-{:02},{}", day, 100 + day).unwrap();
    }
    file.flush().unwrap();
    file
}

fn nshima(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_nshima"))
        .args(args)
        .env("RUST_LOG", "off")
        .output()
        .unwrap()
}

fn path_arg(path: &Path) -> &str {
    path.to_str().unwrap()
}

#[test]
fn test_report_applies_flag_overrides() {
    let input = write_maize_csv();
    let dir = tempdir().unwrap();

    // Config file asks for a 30-day window; the flag must win
    let config_path = dir.path().join("config.json");
    std::fs::write(&config_path, r#"{ "windows": [30], "prepare": { "cutoff_year": 2013 } }"#)
        .unwrap();
    let trends_path = dir.path().join("trends.csv");

    let output = nshima(&[
        "report",
        "--input",
        path_arg(input.path()),
        "--config",
        path_arg(&config_path),
        "--timestamp-column",
        "day",
        "--value-column",
        "maize",
        "--cutoff-year",
        "2020",
        "--windows",
        "2,4",
        "--skip-forecast",
        "--export-trends",
        path_arg(&trends_path),
    ]);
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let report: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["forecast"], Value::Null);
    assert_eq!(report["statistics"]["count"], 10);
    assert_eq!(report["statistics"]["mean"], 105.5);

    let windows: Vec<&str> = report["trends"]
        .as_object()
        .unwrap()
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(windows, vec!["2", "4"]);

    let trends = std::fs::read_to_string(&trends_path).unwrap();
    let lines: Vec<&str> = trends.lines().collect();
    assert_eq!(lines[0], "date,ma_2,ma_4");
    assert_eq!(lines[1], "2020-01-01,,");
    assert_eq!(lines[2], "2020-01-02,101.5,");
    assert_eq!(lines.len(), 11);
}

#[test]
fn test_report_fails_on_missing_column() {
    let input = write_maize_csv();

    let output = nshima(&["report", "--input", path_arg(input.path()), "--skip-forecast"]);

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.starts_with("Error:"), "stderr: {}", stderr);
}

#[test]
fn test_config_prints_defaults() {
    let output = nshima(&["config"]);
    assert!(output.status.success());

    let config: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(config["forecast"]["horizon"], 180);
    assert_eq!(config["forecast"]["fit"]["max_iterations"], Value::Null);
    assert_eq!(config["prepare"]["cutoff_year"], 2013);
}
