mod common;

use common::script_cli;
use predicates::{prelude::PredicateBooleanExt, str::contains};
use tempfile::TempDir;

#[test]
fn help_lists_commands() {
    let home = TempDir::new().unwrap();
    script_cli(&home)
        .write_stdin("help\nexit\n")
        .assert()
        .success()
        .stdout(contains("Available commands").and(contains("amortize")));
}

#[test]
fn version_reports_package_version() {
    let home = TempDir::new().unwrap();
    script_cli(&home)
        .write_stdin("version\n")
        .assert()
        .success()
        .stdout(contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn amortize_prints_payoff() {
    let home = TempDir::new().unwrap();
    script_cli(&home)
        .write_stdin("amortize 1200 12 106.62\n")
        .assert()
        .success()
        .stdout(contains("Months to payoff").and(contains("12")))
        .stdout(contains("Total interest"));
}

#[test]
fn amortize_reports_never() {
    let home = TempDir::new().unwrap();
    script_cli(&home)
        .write_stdin("amortize 1000 24 10\n")
        .assert()
        .success()
        .stdout(contains("never be paid off"));
}

#[test]
fn goal_on_track() {
    let home = TempDir::new().unwrap();
    script_cli(&home)
        .write_stdin("goal 1200 0 100 2025-12-27 2025-01-01\n")
        .assert()
        .success()
        .stdout(contains("On track."));
}

#[test]
fn advance_and_status() {
    let home = TempDir::new().unwrap();
    script_cli(&home)
        .write_stdin("advance 2025-01-31 monthly 2025-03-01\nstatus 2025-06-09 2025-06-10\n")
        .assert()
        .success()
        .stdout(contains("Next due: 2025-03-31").and(contains("2025-06-09 is Overdue")));
}

#[test]
fn invalid_frequency_is_reported_without_exiting() {
    let home = TempDir::new().unwrap();
    script_cli(&home)
        .write_stdin("advance 2025-01-01 fortnightly 2025-02-01\nhelp\n")
        .assert()
        .success()
        .stdout(contains("unknown frequency `fortnightly`").and(contains("Available commands")));
}

#[test]
fn unknown_command_suggests_closest() {
    let home = TempDir::new().unwrap();
    script_cli(&home)
        .write_stdin("amortise 1 2 3\n")
        .assert()
        .success()
        .stdout(contains("Unknown command `amortise`").and(contains("Suggestion: `amortize`?")));
}

#[test]
fn config_set_persists_between_runs() {
    let home = TempDir::new().unwrap();
    script_cli(&home)
        .write_stdin("config set currency eur\n")
        .assert()
        .success()
        .stdout(contains("currency updated."));

    let saved = std::fs::read_to_string(home.path().join("config").join("config.json")).unwrap();
    assert!(saved.contains("\"EUR\""));

    script_cli(&home)
        .write_stdin("config get currency\nemi 1200 12 12\n")
        .assert()
        .success()
        .stdout(contains("currency = EUR").and(contains("€106.62")));
}

#[test]
fn forecast_lists_occurrences_within_horizon() {
    let home = TempDir::new().unwrap();
    script_cli(&home)
        .write_stdin(
            "config set upcoming_horizon_days 14\n\
             forecast 15 weekly 2025-01-08 2025-01-10\n",
        )
        .assert()
        .success()
        .stdout(contains("Next 14 days"))
        .stdout(contains("2025-01-08").and(contains("Overdue")))
        .stdout(contains("2025-01-22").and(contains("2025-01-29").not()))
        .stdout(contains("$65.00"));
}

#[test]
fn wrong_arity_prints_usage_and_quit_alias_exits() {
    let home = TempDir::new().unwrap();
    script_cli(&home)
        .write_stdin("amortize 1200 12\nquit\nhelp\n")
        .assert()
        .success()
        .stdout(contains("usage: amortize <balance> <annual-rate%> <monthly-payment>"))
        .stdout(contains("Available commands").not());
}

#[test]
fn oversized_amounts_are_reported_not_fatal() {
    let home = TempDir::new().unwrap();
    script_cli(&home)
        .write_stdin(
            "amortize 79228162514264337593543950335 2400 79228162514264337593543950335\n\
             forecast 79228162514264337593543950335 daily 2025-01-08 2025-01-10\n\
             help\n",
        )
        .assert()
        .success()
        .stdout(contains("overflow the decimal range"))
        .stdout(contains("Monthly equivalent"))
        .stdout(contains("Available commands"));
}
