//! End-to-end tests driving the `clk` binary.
//!
//! Every test runs against a private `HOME` and a temp config file pointing
//! the record store into the same temp directory.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

fn clk_binary() -> &'static str {
    env!("CARGO_BIN_EXE_clk")
}

/// Writes a config file with the given storage and extra TOML.
fn write_config(temp: &Path, storage: &str, store_name: &str, extra: &str) -> PathBuf {
    let config_path = temp.join("config.toml");
    let store_path = temp.join(store_name);
    std::fs::write(
        &config_path,
        format!(
            "database_path = \"{}\"\nstorage = \"{storage}\"\n{extra}",
            store_path.display()
        ),
    )
    .unwrap();
    config_path
}

fn clk(temp: &Path, config: &Path, args: &[&str]) -> Output {
    Command::new(clk_binary())
        .env("HOME", temp)
        .env_remove("XDG_CONFIG_HOME")
        .env_remove("XDG_DATA_HOME")
        .env_remove("RUST_LOG")
        .arg("--config")
        .arg(config)
        .args(args)
        .output()
        .expect("failed to run clk")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn assert_success(output: &Output) {
    assert!(
        output.status.success(),
        "clk failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

#[test]
fn test_track_notify_show_remove_flow() {
    let temp = TempDir::new().unwrap();
    let config = write_config(temp.path(), "sqlite", "data/clk.db", "");

    let output = clk(
        temp.path(),
        &config,
        &[
            "track", "--date", "10.01.2022", "--begin", "08:00", "--end", "16:30", "--pause",
            "0:30",
        ],
    );
    assert_success(&output);
    let text = stdout(&output);
    assert!(text.contains("Working Day - Mon 10.01.2022"), "{text}");
    assert!(
        text.contains("Mon 10.01.2022  W     08:00:00  16:30:00   0:30:00    8:00:00    0:00:00"),
        "{text}"
    );
    assert!(temp.path().join("data/clk.db").exists());

    let output = clk(
        temp.path(),
        &config,
        &["notify", "--start", "11.01.2022", "--end", "12.01.2022", "--absence", "V"],
    );
    assert_success(&output);
    let text = stdout(&output);
    assert!(text.contains("Tue 11.01.2022  V"), "{text}");
    assert!(text.contains("Wed 12.01.2022  V"), "{text}");

    let output = clk(temp.path(), &config, &["show", "--month", "1", "--year", "2022"]);
    assert_success(&output);
    let text = stdout(&output);
    assert!(text.contains("Working Days - 01/2022"), "{text}");
    assert!(text.contains("Mon 31.01.2022"), "{text}");
    assert!(
        text.contains("Vacation 2/30 (28) | Flexday 0 | Sickness 0"),
        "{text}"
    );

    let output = clk(temp.path(), &config, &["remove", "--start", "10.01.2022"]);
    assert_success(&output);
    assert!(stdout(&output).contains("Removed Entries"));

    let output = clk(temp.path(), &config, &["show", "--month", "1", "--year", "2022"]);
    assert_success(&output);
    let text = stdout(&output);
    assert!(text.lines().any(|line| line == "Mon 10.01.2022"), "{text}");
    assert!(text.contains("Tue 11.01.2022  V"), "{text}");
}

#[test]
fn test_track_without_begin_fails() {
    let temp = TempDir::new().unwrap();
    let config = write_config(temp.path(), "sqlite", "clk.db", "");

    let output = clk(temp.path(), &config, &["track", "--date", "10.01.2022"]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("[Error] start time of 2022-01-10 cannot be empty"),
        "{stderr}"
    );
}

#[test]
fn test_invalid_absence_fails() {
    let temp = TempDir::new().unwrap();
    let config = write_config(temp.path(), "sqlite", "clk.db", "");

    let output = clk(
        temp.path(),
        &config,
        &["notify", "--start", "10.01.2022", "--absence", "X"],
    );

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("invalid absence type: X"));
}

#[test]
fn test_settings_reflect_config_file() {
    let temp = TempDir::new().unwrap();
    let config = write_config(
        temp.path(),
        "sqlite",
        "clk.db",
        "[work]\npause_time = \"0:45\"\n",
    );

    let output = clk(temp.path(), &config, &["settings", "work.pause_time"]);
    assert_success(&output);
    assert_eq!(stdout(&output), "0:45:00\n");

    let output = clk(temp.path(), &config, &["settings"]);
    assert_success(&output);
    assert!(stdout(&output).contains("work.duration = 8:00:00"));
}

#[test]
fn test_report_json_and_output_file() {
    let temp = TempDir::new().unwrap();
    let config = write_config(temp.path(), "sqlite", "clk.db", "");

    assert_success(&clk(
        temp.path(),
        &config,
        &["track", "--date", "03.01.2022", "--begin", "08:00", "--end", "17:00"],
    ));

    let output = clk(
        temp.path(),
        &config,
        &["report", "--month", "1", "--year", "2022", "--json"],
    );
    assert_success(&output);
    let report: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(report["days"][0]["date"], "2022-01-03");
    assert_eq!(report["days"][0]["pause"], "0:30:00");
    assert_eq!(report["statistics"]["working_hours"], "8:30:00");
    assert_eq!(report["statistics"]["flextime"], "0:30:00");

    let report_path = temp.path().join("report.txt");
    let output = clk(
        temp.path(),
        &config,
        &[
            "report",
            "--month",
            "1",
            "--year",
            "2022",
            "--output",
            report_path.to_str().unwrap(),
        ],
    );
    assert_success(&output);
    assert!(stdout(&output).is_empty());
    let content = std::fs::read_to_string(&report_path).unwrap();
    assert!(content.starts_with("Monthly Report - 01/2022\n"), "{content}");
}

#[test]
fn test_json_storage_writes_year_documents() {
    let temp = TempDir::new().unwrap();
    let config = write_config(temp.path(), "json", "days", "");

    assert_success(&clk(
        temp.path(),
        &config,
        &["track", "--date", "10.01.2022", "--begin", "08:00", "--end", "16:30"],
    ));
    assert_success(&clk(temp.path(), &config, &["holidays", "--year", "2022"]));

    let document = std::fs::read_to_string(temp.path().join("days/2022.json")).unwrap();
    let document: serde_json::Value = serde_json::from_str(&document).unwrap();
    assert_eq!(document["2022-01-10"]["begin"], "08:00:00");
    assert_eq!(document["2022-04-15"]["absence"], 4);
}

#[test]
fn test_help_without_command() {
    let output = Command::new(clk_binary()).output().expect("failed to run clk");

    assert!(output.status.success());
    assert!(stdout(&output).contains("notify"));
}
