use assert_cmd::Command;
use predicates::prelude::*;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::{tempdir, TempDir};

const HEADER: &str = "Datetime,Temperature,Humidity,PowerConsumption_Zone1,PowerConsumption_Zone2,PowerConsumption_Zone3";

/// Two weeks of hourly readings in the source layout; evenings run 20% hotter.
fn write_dataset(dir: &Path) -> PathBuf {
    let mut csv = String::from(HEADER);
    csv.push('\n');
    for day in 1..=14 {
        for hour in 0..24 {
            let scale = if (18..=22).contains(&hour) { 1.2 } else { 1.0 };
            writeln!(
                csv,
                "1/{day}/2017 {hour}:00,6.5,73.8,{:.3},{:.3},{:.3}",
                30_000.0 * scale,
                18_000.0 * scale,
                12_000.0 * scale
            )
            .unwrap();
        }
    }
    let path = dir.join("powerconsumption.csv");
    fs::write(&path, csv).unwrap();
    path
}

fn dataset() -> (TempDir, PathBuf) {
    let dir = tempdir().unwrap();
    let path = write_dataset(dir.path());
    (dir, path)
}

#[test]
fn gridpulse_reports_wastage_at_startup_and_exits() {
    let (_dir, input) = dataset();
    let mut cmd = Command::cargo_bin("gridpulse").unwrap();
    cmd.arg(&input)
        .write_stdin("8\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Total Wastage Events: 0"))
        .stdout(predicate::str::contains("8. Exit"))
        .stdout(predicate::str::contains("Exiting System... Thank You!"));
}

#[test]
fn gridpulse_balancing_requires_risk_identification() {
    let (_dir, input) = dataset();
    let mut cmd = Command::cargo_bin("gridpulse").unwrap();
    cmd.arg(&input)
        .write_stdin("7\n4\n7\n8\n")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "demand balancing requires peak load risk identification to run first",
        ))
        .stdout(predicate::str::contains("High Risk Peak Hours"))
        .stdout(predicate::str::contains("✔ Shift load to off-peak hours"))
        .stdout(predicate::str::contains("✔ Stagger usage during peak hours"));
}

#[test]
fn gridpulse_runs_every_report() {
    let (_dir, input) = dataset();
    let mut cmd = Command::cargo_bin("gridpulse").unwrap();
    cmd.arg(&input)
        .write_stdin("1\n2\n3\n5\n6\n9\n8\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Average Load (Peak vs Off-Peak)"))
        .stdout(predicate::str::contains("Rolling Load Trend (last 10 of 336 readings)"))
        .stdout(predicate::str::contains("Weekday vs Weekend Load"))
        .stdout(predicate::str::contains("Zone1"))
        .stdout(predicate::str::contains("60.00"))
        .stdout(predicate::str::contains("Statistical Anomalies: 0"))
        .stdout(predicate::str::contains("Invalid choice"));
}

#[test]
fn gridpulse_json_output_is_machine_readable() {
    let (_dir, input) = dataset();
    let output = Command::cargo_bin("gridpulse")
        .unwrap()
        .args([input.to_str().unwrap(), "--format", "json"])
        .write_stdin("5\n7\n")
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let docs: Vec<serde_json::Value> = serde_json::Deserializer::from_str(&stdout)
        .into_iter::<serde_json::Value>()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(docs.len(), 3);
    assert_eq!(docs[0]["operation"], "wastage_detection");
    assert_eq!(docs[1]["operation"], "zone_efficiency");
    assert_eq!(docs[1]["result"][0]["score"], 60.0);
    assert_eq!(docs[2]["operation"], "demand_balancing");
    assert!(docs[2]["error"]
        .as_str()
        .unwrap()
        .contains("peak load risk identification"));
}

#[test]
fn gridpulse_rejects_malformed_rows() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("broken.csv");
    fs::write(
        &input,
        format!("{HEADER}\n1/1/2017 0:00,6.5,73.8,1.0,2.0,3.0\nnot-a-time,6.5,73.8,1.0,2.0,3.0\n"),
    )
    .unwrap();
    let output = Command::cargo_bin("gridpulse")
        .unwrap()
        .arg(&input)
        .write_stdin("8\n")
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert_eq!(stderr.matches("Malformed row 1").count(), 1, "{stderr}");
}

#[test]
fn gridpulse_reports_missing_columns() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("other.csv");
    fs::write(&input, "time,a,b,c\n2017-01-01 00:00,1,2,3\n").unwrap();
    let mut cmd = Command::cargo_bin("gridpulse").unwrap();
    cmd.arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("column 'Datetime' not found"));
}

#[test]
fn gridpulse_honors_custom_columns_and_peak_window() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("custom.csv");
    let mut csv = String::from("time,a,b,c\n");
    for hour in 0..24 {
        writeln!(csv, "2017-01-02 {hour:02}:00:00,{},1,1", 10 + hour).unwrap();
    }
    fs::write(&input, csv).unwrap();

    let mut cmd = Command::cargo_bin("gridpulse").unwrap();
    cmd.args([
        input.to_str().unwrap(),
        "--timestamp-column",
        "time",
        "--zone-columns",
        "a,b,c",
        "--peak-start",
        "20",
        "--peak-end",
        "23",
    ])
    .write_stdin("1\n8\n")
    .assert()
    .success()
    .stdout(predicate::str::contains("Off-Peak"))
    .stdout(predicate::str::contains("peak window 20:00-23:59"));
}
