//! End-to-end CLI integration tests.
//!
//! The worker is replaced by a shell script started as
//! `sh <script> -np <p> <worker>`, so no MPI installation is needed.
#![cfg(unix)]

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn parbench() -> Command {
    let mut cmd = Command::cargo_bin("parbench").expect("binary not found");
    cmd.env("NO_COLOR", "1");
    cmd
}

/// Launcher script answering every request with a fixed timing line.
const GOOD_LAUNCHER: &str = r#"cat > /dev/null
echo "Running on $2 processes."
echo "Time Taken: 0.25 seconds"
"#;

fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, body).unwrap();
    path
}

/// Command running against `launcher_body` with outputs under `dir`.
fn scripted(dir: &TempDir, launcher_body: &str) -> Command {
    let script = write_script(dir.path(), "launcher.sh", launcher_body);
    let mut cmd = parbench();
    cmd.args(["--launcher", "sh", "--launcher-arg"])
        .arg(&script)
        .args(["--worker", "./fake_worker", "--trials", "2", "--max-procs", "2"])
        .arg("--input-dir")
        .arg(dir.path().join("input"))
        .arg("--output-dir")
        .arg(dir.path().join("imgs"))
        .arg("--no-charts");
    cmd
}

#[test]
fn help_flag() {
    parbench()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("speedup"));
}

#[test]
fn version_flag() {
    parbench()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("parbench"));
}

#[test]
fn completion_bash() {
    parbench()
        .args(["--completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("parbench"));
}

#[test]
fn dry_run_prints_matrix_without_side_effects() {
    let dir = TempDir::new().unwrap();
    parbench()
        .current_dir(dir.path())
        .args(["--dry-run", "--algo", "bitonic,prime", "--sizes", "1000"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Bitonic Sort"))
        .stdout(predicate::str::contains("1,024 (requested 1,000)"))
        .stdout(predicate::str::contains("p = [1, 2, 4]"))
        .stdout(predicate::str::contains("p = [1, 2, 3, 4, 5, 6]"));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn full_run_with_fake_worker() {
    let dir = TempDir::new().unwrap();
    let summary = dir.path().join("summary.json");
    scripted(&dir, GOOD_LAUNCHER)
        .args(["--algo", "radix,prime", "--sizes", "10", "--quiet", "--summary"])
        .arg(&summary)
        .assert()
        .success()
        .stdout(predicate::str::contains("prime\t10\t1\t0.250000\t1.0000\t1.0000"))
        .stdout(predicate::str::contains("radix\t16\t2\t0.250000\t1.0000\t0.5000"));

    assert!(dir.path().join("input").join("input_4_16.txt").exists());
    assert!(!dir.path().join("input").join("input_2_10.txt").exists());

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&summary).unwrap()).unwrap();
    assert_eq!(json["trials"], 2);
    let series = json["series"].as_array().unwrap();
    assert_eq!(series.len(), 2);
    assert_eq!(series[0]["algorithm"], "Prime Number Finding");
    assert_eq!(series[1]["size"], 16);
    assert_eq!(series[1]["points"].as_array().unwrap().len(), 2);
}

#[test]
fn worker_failure_names_the_trial() {
    let dir = TempDir::new().unwrap();
    scripted(&dir, "cat > /dev/null\necho 'orted: fatal' >&2\nexit 1\n")
        .args(["--algo", "radix", "--sizes", "16"])
        .assert()
        .code(6)
        .stderr(predicate::str::contains("Radix Sort (size=16, p=1, trial 1)"))
        .stderr(predicate::str::contains("orted: fatal"));
}

#[test]
fn quiet_failure_reports_on_stderr_only() {
    let dir = TempDir::new().unwrap();
    scripted(&dir, "cat > /dev/null\necho 'orted: fatal' >&2\nexit 1\n")
        .args(["--algo", "prime", "--sizes", "10", "--quiet"])
        .assert()
        .code(6)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("[ERROR]"))
        .stderr(predicate::str::contains("orted: fatal"));
}

#[test]
fn rust_log_replaces_default_level() {
    let dir = TempDir::new().unwrap();
    scripted(&dir, GOOD_LAUNCHER)
        .env("RUST_LOG", "debug")
        .args(["--algo", "prime", "--sizes", "10", "--quiet"])
        .assert()
        .success()
        .stderr(predicate::str::contains("launching worker"));

    scripted(&dir, GOOD_LAUNCHER)
        .env_remove("RUST_LOG")
        .args(["--algo", "prime", "--sizes", "10", "--quiet"])
        .assert()
        .success()
        .stderr(predicate::str::contains("launching worker").not());
}

#[test]
fn missing_timing_line_is_parse_error() {
    let dir = TempDir::new().unwrap();
    scripted(&dir, "cat > /dev/null\necho 'Result: Found 4 primes'\n")
        .args(["--algo", "prime", "--sizes", "10"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Found 4 primes"));
}

#[test]
fn custom_marker() {
    let dir = TempDir::new().unwrap();
    scripted(&dir, "cat > /dev/null\necho 'elapsed: 0.5'\n")
        .args(["--algo", "prime", "--sizes", "10", "--marker", "elapsed", "--quiet"])
        .assert()
        .success()
        .stdout(predicate::str::contains("prime\t10\t2\t0.500000"));
}

#[test]
fn timeout_kills_the_worker() {
    let dir = TempDir::new().unwrap();
    scripted(&dir, "exec sleep 30\n")
        .args(["--algo", "prime", "--sizes", "10", "--timeout", "200ms"])
        .timeout(std::time::Duration::from_secs(20))
        .assert()
        .code(2)
        .stderr(predicate::str::contains("timed out"));
}

#[test]
fn missing_launcher_is_execution_error() {
    parbench()
        .args([
            "--launcher",
            "/nonexistent/parbench-launcher",
            "--algo",
            "prime",
            "--sizes",
            "10",
            "--no-charts",
        ])
        .assert()
        .code(6);
}

#[test]
fn build_failure_stops_before_experiments() {
    let dir = TempDir::new().unwrap();
    let build = write_script(dir.path(), "compile.sh", "echo 'mpicc: not found' >&2\nexit 1\n");
    scripted(&dir, GOOD_LAUNCHER)
        .args(["--algo", "radix", "--sizes", "16", "--build-script"])
        .arg(&build)
        .assert()
        .code(5)
        .stderr(predicate::str::contains("mpicc: not found"));
    assert!(!dir.path().join("input").exists());
}

#[test]
fn unknown_algorithm_is_config_error() {
    parbench()
        .args(["--algo", "heap", "--dry-run"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("unknown algorithm: heap"));
}

#[test]
fn invalid_timeout_is_config_error() {
    let dir = TempDir::new().unwrap();
    scripted(&dir, GOOD_LAUNCHER)
        .args(["--algo", "prime", "--sizes", "10", "--timeout", "eventually"])
        .assert()
        .code(4);
}
