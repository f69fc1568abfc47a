//! Basic CLI E2E tests.
//!
//! Tests invoke the built `focusplan` binary against a temporary config
//! directory and a temporary export file.

use std::path::Path;
use std::process::Command;

const EXPORT: &str = r#"{
    "blocks": [
        {
            "id": "b1",
            "ownerId": "u1",
            "start": "2026-03-02T08:00:00Z",
            "end": "2026-03-02T10:00:00Z",
            "category": "work",
            "plannedDurationMinutes": 120,
            "completed": true
        }
    ],
    "feedback": [
        {
            "id": "f1",
            "blockId": "b1",
            "completedAt": "2026-03-02T10:00:00Z",
            "feeling": "good",
            "focus": "yes",
            "interrupted": false,
            "timeComparison": "equal"
        }
    ]
}"#;

/// Run a CLI command with an isolated config directory and return output.
fn run_cli(config_dir: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_focusplan"))
        .env("FOCUSPLAN_CONFIG_DIR", config_dir)
        .env_remove("RUST_LOG")
        .args(args)
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn write_export(dir: &Path) -> String {
    let path = dir.join("export.json");
    std::fs::write(&path, EXPORT).unwrap();
    path.to_string_lossy().to_string()
}

const WEEK: [&str; 4] = ["--from", "2026-03-02", "--to", "2026-03-08"];

#[test]
fn test_analyze_outputs_report() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_export(dir.path());

    let mut args = vec!["analyze", "--input", input.as_str()];
    args.extend(WEEK);
    let (stdout, stderr, code) = run_cli(dir.path(), &args);
    assert_eq!(code, 0, "analyze failed: {stderr}");

    let report: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(report["profileInsights"]["bestFocusSlot"], "08:00–10:00");
    assert_eq!(report["profileInsights"]["strongestDay"], "Lunes");
    assert_eq!(report["profileInsights"]["topCategories"][0], "Trabajo");
    assert_eq!(report["weeklySummary"]["totalFocusMinutes"], 120);
    assert_eq!(report["focusHeatmap"]["matrix"][0][1], 120.0);
}

#[test]
fn test_insights_level_override() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_export(dir.path());

    let mut args = vec!["insights", "--input", input.as_str(), "--level", "high"];
    args.extend(WEEK);
    let (stdout, stderr, code) = run_cli(dir.path(), &args);
    assert_eq!(code, 0, "insights failed: {stderr}");

    let insights: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(insights["recommendations"].as_array().unwrap().len(), 5);
}

#[test]
fn test_summary_and_heatmap() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_export(dir.path());

    let mut args = vec!["summary", "--input", input.as_str()];
    args.extend(WEEK);
    let (stdout, _, code) = run_cli(dir.path(), &args);
    assert_eq!(code, 0);
    let summary: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(summary["rangeLabel"], "02/03/2026 – 08/03/2026");

    let mut args = vec!["heatmap", "--input", input.as_str()];
    args.extend(WEEK);
    let (stdout, _, code) = run_cli(dir.path(), &args);
    assert_eq!(code, 0);
    assert!(stdout.contains("Focus Heatmap"));
    assert!(stdout.contains("Peak slots:"));

    args.push("--json");
    let (stdout, _, code) = run_cli(dir.path(), &args);
    assert_eq!(code, 0);
    let heatmap: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(heatmap["days"][0], "Lun");
}

#[test]
fn test_invalid_range_fails() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_export(dir.path());

    let (_, stderr, code) = run_cli(
        dir.path(),
        &["analyze", "--input", &input, "--from", "2026-03-08", "--to", "2026-03-02"],
    );
    assert_eq!(code, 1);
    assert!(stderr.contains("error:"));
}

#[test]
fn test_oversized_days_fails() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_export(dir.path());

    for extra in [&[][..], &["--from", "2026-03-02"][..], &["--to", "2026-03-08"][..]] {
        let mut args = vec!["analyze", "--input", input.as_str(), "--days", "4000000000"];
        args.extend_from_slice(extra);
        let (stdout, stderr, code) = run_cli(dir.path(), &args);
        assert_eq!(code, 1, "expected failure for {args:?}: {stderr}");
        assert!(stderr.contains("error:"), "no error line for {args:?}: {stderr}");
        assert!(stdout.is_empty());
    }
}

#[test]
fn test_config_rejects_oversized_range_days() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_export(dir.path());

    let (_, stderr, code) = run_cli(
        dir.path(),
        &["config", "set", "analysis.default_range_days", "4000000000"],
    );
    assert_eq!(code, 1);
    assert!(stderr.contains("error:"));

    // The rejected value was not persisted; analysis still runs.
    let (_, stderr, code) = run_cli(dir.path(), &["analyze", "--input", &input]);
    assert_eq!(code, 0, "analyze failed: {stderr}");
}

#[test]
fn test_missing_input_fails() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.json");

    let (_, stderr, code) = run_cli(
        dir.path(),
        &["analyze", "--input", missing.to_str().unwrap()],
    );
    assert_eq!(code, 1);
    assert!(stderr.contains("error:"));
}

#[test]
fn test_config_set_get_reset() {
    let dir = tempfile::tempdir().unwrap();

    let (stdout, _, code) = run_cli(dir.path(), &["config", "get", "ai.intervention_level"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "medium");

    let (stdout, _, code) = run_cli(dir.path(), &["config", "set", "ai.intervention_level", "low"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "ok");
    assert!(dir.path().join("config.toml").exists());

    let (stdout, _, _) = run_cli(dir.path(), &["config", "get", "ai.intervention_level"]);
    assert_eq!(stdout.trim(), "low");

    let (stdout, _, code) = run_cli(dir.path(), &["config", "list"]);
    assert_eq!(code, 0);
    let config: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(config["analysis"]["default_range_days"], 7);

    let (_, _, code) = run_cli(dir.path(), &["config", "reset"]);
    assert_eq!(code, 0);
    let (stdout, _, _) = run_cli(dir.path(), &["config", "get", "ai.intervention_level"]);
    assert_eq!(stdout.trim(), "medium");
}

#[test]
fn test_config_rejects_unknown_key() {
    let dir = tempfile::tempdir().unwrap();

    let (_, stderr, code) = run_cli(dir.path(), &["config", "get", "ai.mood"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("unknown key"));

    let (_, stderr, code) = run_cli(dir.path(), &["config", "set", "ai.intervention_level", "extreme"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("error:"));
}
