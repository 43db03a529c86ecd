//! End-to-end tests for the `tree-stats` binary.
//!
//! Each test writes a status log into a temp directory and points `HOME`
//! there, so no user configuration leaks in.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

const LOG: &str = r#"[
    {"date": "2025-03-10 14:00:00.000000", "username": "bob", "message": "Tree is closed (compile failure)"},
    {"date": "2025-03-10 20:00:00.000000", "username": "alice", "message": "Tree is open"},
    {"date": "2025-03-10 16:00:00.000000", "username": "carol", "message": "Tree is closed for maintenance"}
]"#;

fn tree_stats_binary() -> String {
    env!("CARGO_BIN_EXE_tree-stats").to_string()
}

fn write_log(temp: &Path) -> PathBuf {
    let path = temp.join("status.json");
    std::fs::write(&path, LOG).unwrap();
    path
}

fn run(temp: &Path, args: &[&str]) -> Output {
    Command::new(tree_stats_binary())
        .env("HOME", temp)
        .env("XDG_CONFIG_HOME", temp.join(".config"))
        .env_remove("TREE_STATS_LOG_PATH")
        .env_remove("TREE_STATS_TOP_N")
        .env_remove("TREE_STATS_DEFAULT_DAYS")
        .args(args)
        .output()
        .expect("failed to run tree-stats")
}

fn window_args<'a>(log: &'a str) -> Vec<&'a str> {
    vec![
        "--log",
        log,
        "--since",
        "2025-03-10T12:00:00Z",
        "--until",
        "2025-03-10T23:00:00Z",
    ]
}

fn stdout_json(output: &Output) -> serde_json::Value {
    assert!(
        output.status.success(),
        "tree-stats should succeed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}

#[test]
fn test_stats_json_from_exported_log() {
    let temp = TempDir::new().unwrap();
    let log = write_log(temp.path());
    let log = log.to_str().unwrap();

    let mut args = vec!["stats", "--json"];
    args.extend(window_args(log));
    let value = stdout_json(&run(temp.path(), &args));

    assert_eq!(value["percent_open_text"], "33.3%");
    assert_eq!(value["open_text"], "3.0 hours");
    assert_eq!(value["closed_text"], "6.0 hours");
    assert_eq!(value["longest_closure"]["author"], "carol");
    assert_eq!(value["top_contributors"].as_array().unwrap().len(), 3);
}

#[test]
fn test_runs_text_lists_newest_first() {
    let temp = TempDir::new().unwrap();
    let log = write_log(temp.path());
    let log = log.to_str().unwrap();

    let mut args = vec!["runs"];
    args.extend(window_args(log));
    let output = run(temp.path(), &args);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let authors: Vec<&str> = stdout
        .lines()
        .skip(2)
        .filter_map(|line| line.split("  ").last())
        .filter_map(|tail| tail.split(':').next())
        .collect();
    assert_eq!(authors, vec!["alice", "carol", "bob", "oracle"]);
}

#[test]
fn test_peak_hours_json_has_a_row_per_day() {
    let temp = TempDir::new().unwrap();
    let log = write_log(temp.path());
    let log = log.to_str().unwrap();

    let mut args = vec!["peak-hours", "--json"];
    args.extend(window_args(log));
    let value = stdout_json(&run(temp.path(), &args));

    // Widened by the JST offset: 2025-03-10 03:00 to 2025-03-11 08:00.
    let days = value["days"].as_array().unwrap();
    assert_eq!(days.len(), 2);
    assert_eq!(days[0]["date"], "2025-03-11");
    assert_eq!(value["summaries"].as_array().unwrap().len(), 5);
}

#[test]
fn test_config_file_supplies_log_and_top_n() {
    let temp = TempDir::new().unwrap();
    let log = write_log(temp.path());
    let config = temp.path().join("custom.toml");
    std::fs::write(
        &config,
        format!("log_path = {:?}\ntop_n = 1\n", log.to_str().unwrap()),
    )
    .unwrap();

    let value = stdout_json(&run(
        temp.path(),
        &[
            "--config",
            config.to_str().unwrap(),
            "stats",
            "--json",
            "--since",
            "2025-03-10T12:00:00Z",
            "--until",
            "2025-03-10T23:00:00Z",
        ],
    ));

    assert_eq!(value["top_contributors"].as_array().unwrap().len(), 1);
    assert_eq!(value["top_keywords"].as_array().unwrap().len(), 1);
}

#[test]
fn test_missing_log_fails() {
    let temp = TempDir::new().unwrap();
    let missing = temp.path().join("nope.json");

    let output = run(temp.path(), &["stats", "--log", missing.to_str().unwrap()]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to read status log"), "stderr: {stderr}");
}

#[test]
fn test_no_log_configured_fails() {
    let temp = TempDir::new().unwrap();

    let output = run(temp.path(), &["runs"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("no status log given"), "stderr: {stderr}");
}

#[test]
fn test_inverted_window_fails() {
    let temp = TempDir::new().unwrap();
    let log = write_log(temp.path());

    let output = run(
        temp.path(),
        &[
            "stats",
            "--log",
            log.to_str().unwrap(),
            "--since",
            "2025-03-11T00:00:00Z",
            "--until",
            "2025-03-10T00:00:00Z",
        ],
    );

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--since must not be later than --until"), "stderr: {stderr}");
}

#[test]
fn test_no_subcommand_prints_help() {
    let temp = TempDir::new().unwrap();

    let output = run(temp.path(), &[]);

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("peak-hours"));
}

#[test]
fn test_huge_days_fails_cleanly() {
    let temp = TempDir::new().unwrap();
    let log = write_log(temp.path());

    let output = run(
        temp.path(),
        &["stats", "--log", log.to_str().unwrap(), "--days", "4000000000"],
    );

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--days 4000000000"), "stderr: {stderr}");
    assert!(!stderr.contains("panicked"), "stderr: {stderr}");
}
