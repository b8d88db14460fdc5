#![allow(dead_code)]

use assert_cmd::Command;
use chrono::NaiveDate;
use tempfile::TempDir;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid calendar date")
}

/// Builds a script-mode shell whose configuration lives under `home`.
pub fn script_cli(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("fintrack_core_cli").expect("binary builds");
    cmd.env("FINTRACK_CORE_CLI_SCRIPT", "1")
        .env("FINTRACK_CORE_HOME", home.path())
        .env("NO_COLOR", "1");
    cmd
}
