//! CLI integration tests

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn snappaste_bin(config_home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("snappaste").unwrap();
    cmd.env("XDG_CONFIG_HOME", config_home.path())
        .env("HOME", config_home.path())
        .env_remove("SNAPPASTE_PORT")
        .env_remove("SNAPPASTE_ADVERTISE_IP")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn help_output() {
    let home = TempDir::new().unwrap();
    snappaste_bin(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("clipboard"))
        .stdout(predicate::str::contains("--port"))
        .stdout(predicate::str::contains("--bind"))
        .stdout(predicate::str::contains("--advertise-ip"))
        .stdout(predicate::str::contains("--no-qr"))
        .stdout(predicate::str::contains("--notify"))
        .stdout(predicate::str::contains("interfaces"))
        .stdout(predicate::str::contains("paste"));
}

#[test]
fn version_output() {
    let home = TempDir::new().unwrap();
    snappaste_bin(&home)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("snappaste"))
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn config_help() {
    let home = TempDir::new().unwrap();
    snappaste_bin(&home)
        .args(["config", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("init"))
        .stdout(predicate::str::contains("set"))
        .stdout(predicate::str::contains("get"))
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("path"));
}

#[cfg(target_os = "linux")]
#[test]
fn config_path_follows_xdg() {
    let home = TempDir::new().unwrap();
    let expected = home.path().join("snappaste").join("config.toml");
    snappaste_bin(&home)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains(expected.to_string_lossy().to_string()));
}

#[cfg(target_os = "linux")]
#[test]
fn config_init_set_get_list() {
    let home = TempDir::new().unwrap();

    snappaste_bin(&home)
        .args(["config", "init"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Config file created"));
    assert!(home.path().join("snappaste/config.toml").exists());

    snappaste_bin(&home)
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    snappaste_bin(&home)
        .args(["config", "set", "helper_timeout", "90s"])
        .assert()
        .success();

    snappaste_bin(&home)
        .args(["config", "get", "helper_timeout"])
        .assert()
        .success()
        .stdout(predicate::str::diff("1m30s\n"));

    snappaste_bin(&home)
        .args(["config", "set", "network.wireless_keywords", "wlan, airport"])
        .assert()
        .success();

    snappaste_bin(&home)
        .args(["config", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("port"))
        .stdout(predicate::str::contains("8080"))
        .stdout(predicate::str::contains("wlan, airport"));
}

#[test]
fn interfaces_json_reports_selection() {
    let home = TempDir::new().unwrap();
    snappaste_bin(&home)
        .args(["--advertise-ip", "192.168.77.7", "interfaces", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"selection\""))
        .stdout(predicate::str::contains("192.168.77.7"))
        .stdout(predicate::str::contains("\"configured\""));
}

#[test]
fn advertise_ip_from_environment() {
    let home = TempDir::new().unwrap();
    snappaste_bin(&home)
        .env("SNAPPASTE_ADVERTISE_IP", "10.20.30.40")
        .args(["interfaces", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("10.20.30.40"));
}

#[test]
fn paste_rejects_tiny_file() {
    let home = TempDir::new().unwrap();
    let file = home.path().join("tiny.png");
    std::fs::write(&file, [0x89, b'P', b'N', b'G', 0x0D, 0x0A]).unwrap();

    snappaste_bin(&home)
        .arg("paste")
        .arg(&file)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("too small"));
}
