//! Command-line contract: output and exit codes of `agent`, `check` and `discover`.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::{tempdir, TempDir};

const HEADER: &str = "<<<cisco_ucm_services:sep(124)>>>";

fn binary_command() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("ucm-services"))
}

fn write_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).expect("write fixture");
    path
}

fn agent_output(dir: &TempDir, name: &str, rows: &[&str]) -> PathBuf {
    write_file(dir, name, &format!("{}\n{}\n", HEADER, rows.join("\n")))
}

fn path_arg(path: &Path) -> &str {
    path.to_str().expect("utf-8 temp path")
}

#[test]
fn agent_unreachable_host_exits_one_with_error() {
    binary_command()
        .args(["agent", "127.0.0.1", "-p", "1", "-t", "1"])
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::is_empty().not());
}

#[test]
fn agent_debug_prints_error_chain() {
    binary_command()
        .args(["agent", "127.0.0.1", "-p", "1", "-t", "1", "--debug"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Caused by"));
}

#[test]
fn agent_missing_secret_file_exits_one() {
    binary_command()
        .args([
            "agent",
            "127.0.0.1",
            "-u",
            "monitor",
            "--secret-file",
            "/nonexistent/ucm-secret",
        ])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("/nonexistent/ucm-secret"));
}

#[test]
fn check_all_started_exits_zero() {
    let dir = tempdir().expect("tempdir");
    let input = agent_output(&dir, "ucm1.txt", &["Cisco CallManager|Started|-1|"]);

    binary_command()
        .args(["check", "--host", "ucm1", path_arg(&input)])
        .assert()
        .code(0)
        .stdout(predicate::str::contains("[OK] Service Cisco CallManager"))
        .stdout(predicate::str::contains("Host:      ucm1"));
}

#[test]
fn check_stopped_service_exits_crit() {
    let dir = tempdir().expect("tempdir");
    let config = write_file(&dir, "rules.toml", "[discovery]\ndefault_state = \"any\"\n");
    let input = agent_output(&dir, "ucm1.txt", &["Cisco Tftp|Stopped|0|"]);

    binary_command()
        .args(["check", "-c", path_arg(&config), path_arg(&input)])
        .assert()
        .code(2)
        .stdout(predicate::str::contains("[CRIT] Service Cisco Tftp"));
}

#[test]
fn check_warn_on_stopped_summary() {
    let dir = tempdir().expect("tempdir");
    let config = write_file(&dir, "rules.toml", "[summary]\nstate_if_stopped = 1\n");
    let input = agent_output(
        &dir,
        "ucm1.txt",
        &["Cisco CallManager|Started|-1|", "Cisco Tftp|Stopped|0|"],
    );

    binary_command()
        .args(["check", "--brief", "-c", path_arg(&config), path_arg(&input)])
        .assert()
        .code(1)
        .stdout(predicate::str::contains(
            "WARN - Service Summary: Started services: 1, Stopped services: 1",
        ));
}

#[test]
fn check_invalid_config_exits_unknown() {
    let dir = tempdir().expect("tempdir");
    let config = write_file(&dir, "rules.toml", "[check]\nelse = 9\n");
    let input = agent_output(&dir, "ucm1.txt", &["Cisco CallManager|Started|-1|"]);

    binary_command()
        .args(["check", "-c", path_arg(&config), path_arg(&input)])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn check_missing_input_exits_unknown() {
    binary_command()
        .args(["check", "/nonexistent/ucm1.txt"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Failed to read"));
}

#[test]
fn check_rejects_node_without_path() {
    binary_command()
        .args(["check", "--node", "ucm1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("NAME=PATH"));
}

#[test]
fn check_cluster_reports_running_node() {
    let dir = tempdir().expect("tempdir");
    let ucm1 = agent_output(&dir, "ucm1.txt", &["Cisco CallManager|Stopped|0|"]);
    let ucm2 = agent_output(&dir, "ucm2.txt", &["Cisco CallManager|Started|-1|"]);

    binary_command()
        .args([
            "check",
            "--json",
            "--node",
            &format!("ucm1={}", path_arg(&ucm1)),
            "--node",
            &format!("ucm2={}", path_arg(&ucm2)),
        ])
        .assert()
        .code(0)
        .stdout(predicate::str::contains("Running on: ucm2"));
}

#[test]
fn discover_prints_items() {
    let dir = tempdir().expect("tempdir");
    let input = agent_output(
        &dir,
        "ucm1.txt",
        &["Cisco CallManager|Started|-1|", "Cisco Tftp|Stopped|0|"],
    );

    binary_command()
        .args(["discover", path_arg(&input)])
        .assert()
        .success()
        .stdout("Cisco CallManager\n");
}
