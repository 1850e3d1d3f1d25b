//! End-to-end tests of the `versified` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;
use tempfile::TempDir;

const SETTLEMENT: &str = "2024-03-01";

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// The binary, isolated from the user's settings, environment and `.env`.
fn versified(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("versified").unwrap();
    cmd.current_dir(home.path())
        .env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path())
        .env_remove("RUST_LOG");
    for (key, _) in std::env::vars().filter(|(k, _)| k.starts_with("VERSIFIED_")) {
        cmd.env_remove(key);
    }
    cmd
}

#[test]
fn test_estimate_table() {
    let home = TempDir::new().unwrap();
    versified(&home)
        .args(["estimate", "--bond"])
        .arg(fixture("bond.json"))
        .args(["--settlement", SETTLEMENT])
        .assert()
        .success()
        .stdout(predicate::str::contains("CH0000000001"))
        .stdout(predicate::str::contains("after tax"))
        .stdout(predicate::str::contains("4.0816%"))
        .stdout(predicate::str::contains("4.2929%"));
}

#[test]
fn test_estimate_minimal_after_tax() {
    let home = TempDir::new().unwrap();
    versified(&home)
        .args(["estimate", "--format", "minimal", "--bond"])
        .arg(fixture("bond.json"))
        .args(["--settlement", SETTLEMENT])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("0.04292"));

    // 35% withholding on every coupon: (2 * 13 + 20 / 8) / 990
    versified(&home)
        .args(["estimate", "-f", "minimal", "--withholding-rate", "0.35", "--bond"])
        .arg(fixture("bond.json"))
        .args(["--settlement", SETTLEMENT])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("0.02878"));
}

#[test]
fn test_estimate_json() {
    let home = TempDir::new().unwrap();
    let output = versified(&home)
        .args(["estimate", "--format", "json", "--custody-fee", "0.002", "--bond"])
        .arg(fixture("bond.json"))
        .args(["--settlement", SETTLEMENT])
        .output()
        .unwrap();
    assert!(output.status.success());

    let estimates: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let estimate = &estimates[0];
    assert_eq!(estimate["identifier"], "CH0000000001");
    assert_eq!(estimate["gross"]["tier"], "gross");
    assert_eq!(estimate["after_tax"]["tier"], "after_tax");

    let gross = estimate["gross"]["metrics"]["approximate_ytm"].as_f64().unwrap();
    let after_fees = estimate["after_fees"]["metrics"]["approximate_ytm"].as_f64().unwrap();
    assert!(after_fees < gross);
}

#[test]
fn test_estimate_settings_file_and_flags() {
    let home = TempDir::new().unwrap();
    let plain = versified(&home)
        .args(["estimate", "-f", "minimal", "--config"])
        .arg(fixture("settings.toml"))
        .arg("--bond")
        .arg(fixture("bond.json"))
        .args(["--settlement", SETTLEMENT])
        .output()
        .unwrap();
    let untaxed = versified(&home)
        .args(["estimate", "-f", "minimal", "--withholding-rate", "0", "--config"])
        .arg(fixture("settings.toml"))
        .arg("--bond")
        .arg(fixture("bond.json"))
        .args(["--settlement", SETTLEMENT])
        .output()
        .unwrap();
    assert!(plain.status.success() && untaxed.status.success());

    let parse = |out: &[u8]| String::from_utf8_lossy(out).trim().parse::<f64>().unwrap();
    assert!(parse(&untaxed.stdout) > parse(&plain.stdout));
}

#[test]
fn test_estimate_env_layer() {
    let home = TempDir::new().unwrap();
    versified(&home)
        .env("VERSIFIED_WITHHOLDING_RATE", "0.35")
        .args(["estimate", "-f", "minimal", "--bond"])
        .arg(fixture("bond.json"))
        .args(["--settlement", SETTLEMENT])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("0.02878"));
}

#[test]
fn test_estimate_dotenv_file() {
    let home = TempDir::new().unwrap();
    std::fs::write(home.path().join(".env"), "VERSIFIED_WITHHOLDING_RATE=0.35\n").unwrap();
    versified(&home)
        .args(["estimate", "-f", "minimal", "--bond"])
        .arg(fixture("bond.json"))
        .args(["--settlement", SETTLEMENT])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("0.02878"));
}

#[test]
fn test_estimate_batch_reports_failures() {
    let home = TempDir::new().unwrap();
    versified(&home)
        .args(["estimate", "--format", "csv", "--bond"])
        .arg(fixture("bonds.json"))
        .args(["--settlement", SETTLEMENT])
        .assert()
        .success()
        .stdout(predicate::str::contains("XS0000000002"))
        .stdout(predicate::str::contains("CH0000000003").not())
        .stderr(predicate::str::contains("CH0000000003"));
}

#[test]
fn test_estimate_csv_input() {
    let home = TempDir::new().unwrap();
    versified(&home)
        .args(["estimate", "-f", "minimal", "--bond"])
        .arg(fixture("bonds.csv"))
        .args(["--settlement", SETTLEMENT])
        .assert()
        .success()
        .stdout(predicate::str::contains("CH0000000001\t"))
        .stdout(predicate::str::contains("XS0000000002\t"));
}

#[test]
fn test_estimate_matured_bond_fails() {
    let home = TempDir::new().unwrap();
    versified(&home)
        .args(["estimate", "--bond"])
        .arg(fixture("bond.json"))
        .args(["--settlement", "2032-03-01"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("matured"));
}

#[test]
fn test_invalid_fee_is_rejected() {
    let home = TempDir::new().unwrap();
    versified(&home)
        .args(["estimate", "--custody-fee", "1.5", "--bond"])
        .arg(fixture("bond.json"))
        .args(["--settlement", SETTLEMENT])
        .assert()
        .failure()
        .stderr(predicate::str::contains("fees.custody_fee"));
}

#[test]
fn test_schedule_gross_total() {
    let home = TempDir::new().unwrap();
    versified(&home)
        .args(["schedule", "-f", "minimal", "--tier", "gross", "--bond"])
        .arg(fixture("bond.json"))
        .args(["--settlement", SETTLEMENT])
        .assert()
        .success()
        .stdout(predicate::str::diff("gross\t1320.00\n"));
}

#[test]
fn test_schedule_table() {
    let home = TempDir::new().unwrap();
    versified(&home)
        .args(["schedule", "--id", "XS0000000002", "--bond"])
        .arg(fixture("bonds.json"))
        .args(["--settlement", SETTLEMENT])
        .assert()
        .success()
        .stdout(predicate::str::contains("2029-09-15"))
        .stdout(predicate::str::contains("after fees"));
}

#[test]
fn test_schedule_unknown_bond() {
    let home = TempDir::new().unwrap();
    versified(&home)
        .args(["schedule", "--id", "NOPE", "--bond"])
        .arg(fixture("bonds.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Bond not found: NOPE"));
}

#[test]
fn test_spread_json() {
    let home = TempDir::new().unwrap();
    let output = versified(&home)
        .args(["spread", "--format", "json", "--bond"])
        .arg(fixture("bond.json"))
        .arg("--curve")
        .arg(fixture("curve.json"))
        .args(["--settlement", SETTLEMENT])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let solved = report["solved_yield_pct"].as_f64().unwrap();
    let curve = report["curve_yield_pct"].as_f64().unwrap();
    let spread = report["spread_bps"].as_f64().unwrap();

    // 4% coupon below par over 8 years yields a little above 4.3%
    assert!(solved > 4.2 && solved < 4.4, "solved yield {solved}");
    assert!((curve - 1.58).abs() < 1e-9, "curve yield {curve}");
    assert!(spread > 200.0 && spread < 320.0, "spread {spread}");
}

#[test]
fn test_spread_with_quote() {
    let home = TempDir::new().unwrap();
    versified(&home)
        .args(["spread", "--ask", "1,00.5", "--bid", "99.5", "--bond"])
        .arg(fixture("bond.json"))
        .arg("--curve")
        .arg(fixture("curve.json"))
        .args(["--settlement", SETTLEMENT])
        .assert()
        .success()
        .stdout(predicate::str::contains("(mid)"));
}

#[test]
fn test_config_show_and_init() {
    let home = TempDir::new().unwrap();
    versified(&home)
        .args(["config", "show", "--format", "json", "--config"])
        .arg(fixture("settings.toml"))
        .assert()
        .success()
        .stdout(predicate::str::contains("\"withholding_rate\": 0.35"));

    let path = home.path().join("settings.yaml");
    versified(&home)
        .args(["config", "init"])
        .arg(&path)
        .assert()
        .success();
    assert!(path.exists());

    versified(&home)
        .args(["config", "validate", "--config"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Settings are valid"));
}

#[test]
fn test_config_validate_reports_errors() {
    let home = TempDir::new().unwrap();
    versified(&home)
        .args(["config", "validate", "--entry-fee", "2", "--fx-fee=-1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("fees.entry_fee"))
        .stderr(predicate::str::contains("fees.fx_fee"));
}
