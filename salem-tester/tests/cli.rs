use std::process::Command;

fn temp_path(label: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!(
        "salem-cli-{label}-{}",
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos()
    ))
}

#[test]
fn cli_list_scenarios_writes_output() {
    let exe = env!("CARGO_BIN_EXE_salem-tester");
    let output_path = temp_path("list");
    let status = Command::new(exe)
        .args(["--list-scenarios", "--output"])
        .arg(&output_path)
        .status()
        .expect("run cli");
    assert!(status.success());
    let content = std::fs::read_to_string(output_path).expect("read output");
    assert!(content.contains("Available scenarios"));
    assert!(content.contains("deterministic"));
}

#[test]
fn cli_runs_scenarios_and_writes_json_report() {
    let exe = env!("CARGO_BIN_EXE_salem-tester");
    let output_path = temp_path("run");
    let output = Command::new(exe)
        .args([
            "--report",
            "json",
            "--scenarios",
            "smoke,invariants",
            "--iterations",
            "2",
            "--seeds",
            "1..=2",
            "--budget-ms",
            "60000",
            "--output",
        ])
        .arg(&output_path)
        .output()
        .expect("run cli");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Salem Simulation Tester"));
    let content = std::fs::read_to_string(output_path).expect("read output");
    let report: serde_json::Value = serde_json::from_str(&content).expect("valid json");
    assert_eq!(report.as_array().map(Vec::len), Some(4));
}

#[test]
fn cli_rejects_bad_seed_tokens() {
    let exe = env!("CARGO_BIN_EXE_salem-tester");
    let output = Command::new(exe)
        .args(["--seeds", "not-a-seed"])
        .output()
        .expect("run cli");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Unrecognized seed token"));
}

#[test]
fn cli_fails_when_budget_is_exhausted() {
    let exe = env!("CARGO_BIN_EXE_salem-tester");
    let output_path = temp_path("budget");
    let output = Command::new(exe)
        .args([
            "--report",
            "json",
            "--iterations",
            "1",
            "--budget-ms",
            "0",
            "--output",
        ])
        .arg(&output_path)
        .output()
        .expect("run cli");
    assert_eq!(output.status.code(), Some(1));
    let content = std::fs::read_to_string(output_path).expect("read output");
    assert!(content.contains("exceeded time budget"));
}
