#![cfg(unix)]

mod common;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

use common::*;

fn bgp_filters() -> Command {
    Command::cargo_bin("bgp-filters").expect("binary")
}

#[test]
fn test_cli_help() {
    bgp_filters()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("bgpq4"))
        .stdout(predicate::str::contains("--config-dir"))
        .stdout(predicate::str::contains("--output-dir"));
}

#[test]
fn test_cli_generates_filters() {
    let tmp = TempDir::new().expect("tmp");
    let config_dir = tmp.path().join("config");
    let output = tmp.path().join("output");
    let report = tmp.path().join("report.json");
    write_config(&config_dir, "demo.toml", DEMO_CONFIG);
    let stub = stub_bgpq4(tmp.path(), DEMO_STUB);

    bgp_filters()
        .arg("--config-dir")
        .arg(&config_dir)
        .arg("--output-dir")
        .arg(&output)
        .arg("--bgpq4")
        .arg(&stub)
        .arg("--report")
        .arg(&report)
        .assert()
        .success()
        .stdout(predicate::str::contains("demo"))
        .stdout(predicate::str::contains("2 filter(s) generated, 0 failed"));

    assert_eq!(read(&output.join("demo/filters/PFX_AS100.conf")), AS100_V4);
    assert_eq!(read(&output.join("demo/filters/PFX_AS200.conf")), AS200_V6);
    assert_eq!(
        read(&output.join("demo/filtersprefix.conf")),
        format!("{}{}", AS100_V4, AS200_V6)
    );

    let report: serde_json::Value = serde_json::from_str(&read(&report)).unwrap();
    let requests = &report["sources"][0]["requests"];
    assert_eq!(requests[0]["status"], "written");
    assert_eq!(requests[1]["asn"], "AS200");
    assert_eq!(requests[1]["family"], "Ipv6");
}

#[test]
fn test_cli_failures_do_not_fail_the_run() {
    let tmp = TempDir::new().expect("tmp");
    let config_dir = tmp.path().join("config");
    let output = tmp.path().join("output");
    write_config(&config_dir, "demo.toml", DEMO_CONFIG);
    let stub = stub_bgpq4(tmp.path(), "exit 1");

    bgp_filters()
        .arg("-c")
        .arg(&config_dir)
        .arg("-o")
        .arg(&output)
        .arg("--bgpq4")
        .arg(&stub)
        .assert()
        .success()
        .stdout(predicate::str::contains("0 filter(s) generated, 2 failed"));

    assert!(!output.join("demo/filters/PFX_AS100.conf").exists());
    assert_eq!(read(&output.join("demo/filtersprefix.conf")), "");
}

#[test]
fn test_cli_missing_bgpq4() {
    let tmp = TempDir::new().expect("tmp");
    let config_dir = tmp.path().join("config");
    write_config(&config_dir, "demo.toml", DEMO_CONFIG);

    bgp_filters()
        .arg("-c")
        .arg(&config_dir)
        .arg("-o")
        .arg(tmp.path().join("output"))
        .arg("--bgpq4")
        .arg(tmp.path().join("not-installed"))
        .assert()
        .success()
        .stderr(predicate::str::contains("Failed to launch"));
}

#[test]
fn test_cli_missing_config_dir() {
    let tmp = TempDir::new().expect("tmp");

    bgp_filters()
        .arg("--config-dir")
        .arg(tmp.path().join("missing"))
        .arg("--output-dir")
        .arg(tmp.path().join("output"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Config directory"));
    assert!(!tmp.path().join("output").exists());
}

#[test]
fn test_cli_dry_run() {
    let tmp = TempDir::new().expect("tmp");
    let config_dir = tmp.path().join("config");
    let output = tmp.path().join("output");
    write_config(&config_dir, "demo.toml", DEMO_CONFIG);

    bgp_filters()
        .arg("-c")
        .arg(&config_dir)
        .arg("-o")
        .arg(&output)
        .arg("--bgpq4")
        .arg(tmp.path().join("not-installed"))
        .arg("--dry-run")
        .assert()
        .success()
        .stderr(predicate::str::contains("define PFX_AS100"));
    assert!(!output.exists());
}
