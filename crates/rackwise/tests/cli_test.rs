//! Integration tests for the `rackwise` CLI binary.
//!
//! Every test runs against its own temporary state directory and a
//! nonexistent config file so the user's real inventory is never touched.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::TempDir;

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `rackwise` binary with env isolation.
fn rackwise_cmd(dir: &TempDir) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("rackwise");
    cmd.env("HOME", dir.path())
        .env("XDG_CONFIG_HOME", dir.path().join("xdg-config"))
        .env("XDG_DATA_HOME", dir.path().join("xdg-data"))
        .env_remove("RACKWISE_CONFIG")
        .env_remove("RACKWISE_STATE_DIR")
        .env_remove("RACKWISE_OUTPUT")
        .env_remove("RUST_LOG")
        .arg("--config")
        .arg(dir.path().join("config.toml"))
        .arg("--state-dir")
        .arg(dir.path().join("state"))
        .arg("--color")
        .arg("never");
    cmd
}

/// Run a command that prints a new entity ID and return it.
fn create(dir: &TempDir, args: &[&str]) -> String {
    let output = rackwise_cmd(dir).args(args).output().unwrap();
    assert!(
        output.status.success(),
        "{args:?} failed:\n{}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout).unwrap().trim().to_owned()
}

/// Data center, room and a 10U rack; returns the rack ID.
fn build_rack(dir: &TempDir) -> String {
    let dc = create(dir, &["dc", "add", "DC-1"]);
    let room = create(dir, &["room", "add", "--dc", &dc, "Room-1"]);
    create(dir, &["rack", "add", "--room", &room, "--units", "10", "Rack-1"])
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let dir = tempfile::tempdir().unwrap();
    let output = cargo_bin_cmd!("rackwise")
        .env("HOME", dir.path())
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = format!(
        "{}{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_lists_commands() {
    let dir = tempfile::tempdir().unwrap();
    rackwise_cmd(&dir).arg("--help").assert().success().stdout(
        predicate::str::contains("rack")
            .and(predicate::str::contains("device"))
            .and(predicate::str::contains("subnet")),
    );
}

#[test]
fn test_completions_zsh() {
    let dir = tempfile::tempdir().unwrap();
    rackwise_cmd(&dir)
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

// ── Inventory flows ─────────────────────────────────────────────────

#[test]
fn test_init_demo_seeds_hierarchy() {
    let dir = tempfile::tempdir().unwrap();
    rackwise_cmd(&dir).args(["init", "--demo"]).assert().success();

    rackwise_cmd(&dir)
        .args(["-o", "plain", "dc", "list"])
        .assert()
        .success()
        .stdout("dc-1\ndc-2\n");

    rackwise_cmd(&dir)
        .args(["-o", "plain", "rack", "find", "rack-8"])
        .assert()
        .success()
        .stdout("dc-2 room-3 rack-8\n");

    assert!(dir.path().join("state/data-center-storage.json").exists());
}

#[test]
fn test_device_placement_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let rack = build_rack(&dir);
    let device = create(
        &dir,
        &[
            "device", "add", "--rack", &rack, "--position", "3", "--name", "web-01", "--size", "2",
            "--type", "Server",
        ],
    );

    rackwise_cmd(&dir)
        .args(["device", "locate", &device])
        .assert()
        .success()
        .stdout("DC-1 / Room-1 / Rack-1 U3-U4\n");

    rackwise_cmd(&dir)
        .args(["-o", "json", "rack", "show", &rack])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"web-01\"").and(predicate::str::contains("\"usedUnits\": 2")));

    // Overlapping placement is a conflict
    rackwise_cmd(&dir)
        .args(["device", "add", "--rack", &rack, "-p", "4", "--name", "db-01", "-s", "1"])
        .assert()
        .code(6)
        .stderr(predicate::str::contains("occupied"));

    // Past the top of the rack is a conflict too
    rackwise_cmd(&dir)
        .args(["device", "add", "--rack", &rack, "-p", "10", "--name", "db-01", "-s", "2"])
        .assert()
        .code(6);

    rackwise_cmd(&dir)
        .args(["device", "move", &device, "--position", "7"])
        .assert()
        .success();
    rackwise_cmd(&dir)
        .args(["device", "locate", &device])
        .assert()
        .success()
        .stdout("DC-1 / Room-1 / Rack-1 U7-U8\n");
}

#[test]
fn test_rack_delete_unplaces_devices() {
    let dir = tempfile::tempdir().unwrap();
    let rack = build_rack(&dir);
    let device = create(
        &dir,
        &["device", "add", "--rack", &rack, "-p", "1", "--name", "edge", "-s", "1"],
    );

    rackwise_cmd(&dir)
        .args(["--yes", "rack", "delete", &rack])
        .assert()
        .success();

    rackwise_cmd(&dir)
        .args(["-o", "plain", "device", "list", "--unplaced"])
        .assert()
        .success()
        .stdout(format!("{device}\n"));

    rackwise_cmd(&dir)
        .args(["device", "locate", &device])
        .assert()
        .code(4);
}

#[test]
fn test_rack_shrink_across_device_is_conflict() {
    let dir = tempfile::tempdir().unwrap();
    let rack = build_rack(&dir);
    let device = create(
        &dir,
        &["device", "add", "--rack", &rack, "-p", "5", "--name", "straddle", "-s", "3"],
    );

    rackwise_cmd(&dir)
        .args(["rack", "update", &rack, "--units", "6"])
        .assert()
        .code(6)
        .stderr(predicate::str::contains("occupied"));

    rackwise_cmd(&dir)
        .args(["device", "locate", &device])
        .assert()
        .success()
        .stdout("DC-1 / Room-1 / Rack-1 U5-U7\n");

    rackwise_cmd(&dir)
        .args(["rack", "update", &rack, "--units", "7"])
        .assert()
        .success();
}

#[test]
fn test_service_assignment_shows_on_device() {
    let dir = tempfile::tempdir().unwrap();
    let rack = build_rack(&dir);
    let device = create(
        &dir,
        &["device", "add", "--rack", &rack, "-p", "1", "--name", "app", "-s", "1"],
    );
    let service = create(
        &dir,
        &["service", "add", "Web Application", "--criticality", "high"],
    );

    rackwise_cmd(&dir)
        .args(["service", "assign", &service, &device])
        .assert()
        .success();

    rackwise_cmd(&dir)
        .args(["-o", "json", "device", "get", &device])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"serviceName\": \"Web Application\""));

    rackwise_cmd(&dir)
        .args(["-o", "plain", "device", "list", "--service", &service])
        .assert()
        .success()
        .stdout(format!("{device}\n"));
}

#[test]
fn test_subnet_counters_follow_ip_operations() {
    let dir = tempfile::tempdir().unwrap();
    let rack = build_rack(&dir);
    let device = create(
        &dir,
        &["device", "add", "--rack", &rack, "-p", "1", "--name", "app", "-s", "1"],
    );
    create(&dir, &["subnet", "add", "192.168.1.0/24", "--description", "Office"]);

    let ip = create(
        &dir,
        &["ip", "assign", "192.168.1.10", "--subnet", "192.168.1.0/24", "--device", &device],
    );
    rackwise_cmd(&dir)
        .args(["-o", "json-compact", "subnet", "list"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("\"usedIPs\":1")
                .and(predicate::str::contains("\"availableIPs\":253")),
        );

    rackwise_cmd(&dir).args(["ip", "release", &ip]).assert().success();
    rackwise_cmd(&dir)
        .args(["-o", "json-compact", "subnet", "list"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("\"usedIPs\":0")
                .and(predicate::str::contains("\"availableIPs\":254")),
        );
}

// ── Error cases ─────────────────────────────────────────────────────

#[test]
fn test_unknown_device_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    rackwise_cmd(&dir)
        .args(["device", "get", "dev-missing"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("device list"));
}

#[test]
fn test_delete_without_yes_is_refused_non_interactively() {
    let dir = tempfile::tempdir().unwrap();
    let dc = create(&dir, &["dc", "add", "DC-1"]);
    rackwise_cmd(&dir)
        .args(["dc", "delete", &dc])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("requires confirmation"));

    rackwise_cmd(&dir)
        .args(["-o", "plain", "dc", "list"])
        .assert()
        .success()
        .stdout(format!("{dc}\n"));
}

#[test]
fn test_invalid_status_is_usage_error() {
    let dir = tempfile::tempdir().unwrap();
    rackwise_cmd(&dir)
        .args(["device", "list", "--status", "exploded"])
        .assert()
        .code(2);
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn test_config_init_and_show() {
    let dir = tempfile::tempdir().unwrap();
    rackwise_cmd(&dir)
        .args(["--yes", "config", "init"])
        .assert()
        .success();
    assert!(dir.path().join("config.toml").exists());

    rackwise_cmd(&dir)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("storage_name = \"data-center-storage\""));

    rackwise_cmd(&dir)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_configured_output_format_applies() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("config.toml"),
        "[defaults]\noutput = \"plain\"\n",
    )
    .unwrap();
    rackwise_cmd(&dir).args(["init", "--demo"]).assert().success();
    rackwise_cmd(&dir)
        .args(["subnet", "list"])
        .assert()
        .success()
        .stdout("192.168.1.0/24\n192.168.2.0/24\n10.0.0.0/24\n");
}
