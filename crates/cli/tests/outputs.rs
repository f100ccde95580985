use std::path::PathBuf;
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

fn write_temp_file(prefix: &str, contents: &str) -> PathBuf {
    let mut dir = std::env::temp_dir();
    dir.push("hibernus-tests");
    let _ = std::fs::create_dir_all(&dir);

    let nonce = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let path = dir.join(format!("{}-{}.yaml", prefix, nonce));
    std::fs::write(&path, contents).expect("Failed to write temp file");
    path
}

#[test]
fn test_cli_help() {
    let output = Command::new(env!("CARGO_BIN_EXE_hibernus"))
        .arg("--help")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("Hibernus"));
}

#[test]
fn test_cli_default_run_writes_snapshot() {
    let nonce = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let snapshot_path = std::env::temp_dir().join(format!("hibernus-snapshot-{}.json", nonce));
    let _ = std::fs::remove_file(&snapshot_path);

    let output = Command::new(env!("CARGO_BIN_EXE_hibernus"))
        .args([
            "--cycles",
            "3",
            "--steps",
            "5",
            "--snapshot",
            snapshot_path.to_str().unwrap(),
        ])
        .output()
        .expect("Failed to execute hibernus");

    assert!(output.status.success());
    assert!(snapshot_path.exists());

    let snapshot_content = std::fs::read_to_string(&snapshot_path).unwrap();
    let snapshot: serde_json::Value = serde_json::from_str(&snapshot_content).unwrap();
    assert_eq!(snapshot["kind"], "hibernus_node");
    // Every cycle ends with a committed snapshot and a parked node.
    assert_eq!(snapshot["check_flag"], 1);
    assert_eq!(snapshot["interrupt_flag"], 4);

    let regs = snapshot["peripheral_registers"].as_array().unwrap();
    assert_eq!(regs.len(), 514);

    let _ = std::fs::remove_file(&snapshot_path);
}

#[test]
fn test_cli_scenario_pass() {
    let script = write_temp_file(
        "scenario-pass",
        r#"
schema_version: "1.0"
trace:
  - supply: true
    steps: 10
  - supply: false
  - supply: true
    steps: 10
  - supply: false
  - supply: true
    steps: 10
limits:
  max_cycles: 4
assertions:
  - min_progress: 30
  - expected_end_state: resumed
  - max_fault_flashes: 0
"#,
    );

    let output = Command::new(env!("CARGO_BIN_EXE_hibernus"))
        .args(["--scenario", script.to_str().unwrap()])
        .output()
        .expect("Failed to execute hibernus");

    assert!(output.status.success());
}

#[test]
fn test_cli_scenario_assert_fail() {
    let script = write_temp_file(
        "scenario-fail",
        r#"
schema_version: "1.0"
trace:
  - supply: true
    steps: 2
limits:
  max_cycles: 1
assertions:
  - min_progress: 1000
"#,
    );

    let output = Command::new(env!("CARGO_BIN_EXE_hibernus"))
        .args(["--scenario", script.to_str().unwrap()])
        .output()
        .expect("Failed to execute hibernus");

    assert!(!output.status.success());
    assert_eq!(output.status.code(), Some(1)); // EXIT_ASSERT_FAIL
}

#[test]
fn test_cli_scenario_bad_schema() {
    let script = write_temp_file(
        "scenario-bad-schema",
        r#"
schema_version: "3.0"
trace:
  - supply: true
limits:
  max_cycles: 1
"#,
    );

    let output = Command::new(env!("CARGO_BIN_EXE_hibernus"))
        .args(["--scenario", script.to_str().unwrap()])
        .output()
        .expect("Failed to execute hibernus");

    assert!(!output.status.success());
    assert_eq!(output.status.code(), Some(2)); // EXIT_CONFIG_ERROR
}

#[test]
fn test_cli_board_too_much_ram() {
    let board = write_temp_file(
        "board-too-big",
        r#"
name: "oversized"
mcu: "msp430fr5994"
ram:
  base: 0x1C00
  size: "64KiB"
fram:
  base: 0x6000
  size: "6KiB"
comparator_pin: "P4.1"
"#,
    );

    let output = Command::new(env!("CARGO_BIN_EXE_hibernus"))
        .args(["--board", board.to_str().unwrap(), "--cycles", "1"])
        .output()
        .expect("Failed to execute hibernus");

    // The mirror region cannot hold 64KiB of RAM.
    assert!(!output.status.success());
    assert_eq!(output.status.code(), Some(2));
}
