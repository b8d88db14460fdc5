//! Shell state, dispatch and error reporting.

use std::io;

use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::{
    config::{Config, ConfigManager},
    currency::{format_amount, format_date, parse_amount},
    errors::{CliError, FinanceError},
    planning::Frequency,
};

use super::{commands::COMMANDS, output};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    /// Wrong number of arguments; reported with the command's usage line.
    #[error("wrong number of arguments")]
    Usage,
    #[error(transparent)]
    Finance(#[from] FinanceError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("exit requested")]
    ExitRequested,
}

pub type CommandResult = Result<(), CommandError>;

pub struct ShellContext {
    pub mode: CliMode,
    config: Config,
    config_manager: ConfigManager,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        Ok(Self::with_config_manager(mode, ConfigManager::new()?))
    }

    pub(crate) fn with_config_manager(mode: CliMode, config_manager: ConfigManager) -> Self {
        let config = config_manager.load().unwrap_or_else(|err| {
            warn!(error = %err, "falling back to default configuration");
            output::warning(format!("Could not read configuration ({err}); using defaults."));
            Config::default()
        });
        Self {
            mode,
            config,
            config_manager,
        }
    }

    pub fn prompt(&self) -> String {
        format!("fintrack [{}]> ", self.config.currency)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub(crate) fn update_config(&mut self, key: &str, value: &str) -> CommandResult {
        let mut updated = self.config.clone();
        updated.set(key, value)?;
        self.config_manager.save(&updated)?;
        self.config = updated;
        Ok(())
    }

    pub(crate) fn config_path(&self) -> String {
        self.config_manager.path().display().to_string()
    }

    pub(crate) fn money(&self, amount: Decimal) -> String {
        format_amount(
            amount,
            &self.config.currency_code(),
            &self.config.locale_config(),
        )
    }

    pub(crate) fn date(&self, date: NaiveDate) -> String {
        format_date(&self.config.locale_config(), date)
    }

    /// Tokenises and runs one input line. Blank lines and `#` comments are skipped.
    pub(crate) fn execute(&mut self, line: &str) -> Result<LoopControl, CommandError> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(LoopControl::Continue);
        }
        let tokens = shell_words::split(line).map_err(|err| {
            CommandError::InvalidArguments(format!("cannot parse `{line}`: {err}"))
        })?;
        let Some((name, rest)) = tokens.split_first() else {
            return Ok(LoopControl::Continue);
        };
        let args: Vec<&str> = rest.iter().map(String::as_str).collect();

        let Some(command) = COMMANDS.find(name) else {
            self.suggest_command(name);
            return Ok(LoopControl::Continue);
        };
        debug!(command = command.name, args = args.len(), "dispatching");
        match (command.handler)(self, &args) {
            Ok(()) => Ok(LoopControl::Continue),
            Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
            Err(CommandError::Usage) => Err(CommandError::InvalidArguments(format!(
                "usage: {}",
                command.usage
            ))),
            Err(err) => Err(err),
        }
    }

    fn suggest_command(&self, input: &str) {
        output::warning(format!(
            "Unknown command `{input}`. Type `help` to see available commands."
        ));
        if let Some(best) = COMMANDS.closest(input) {
            output::info(format!("Suggestion: `{best}`?"));
        }
    }

    pub(crate) fn report_error(&self, err: CommandError) {
        match err {
            CommandError::ExitRequested => {}
            CommandError::InvalidArguments(message) => {
                output::error(message);
                output::hint("Use `help <command>` for usage details.");
            }
            other => output::error(other),
        }
    }
}

pub(crate) fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub(crate) fn parse_date(input: &str) -> Result<NaiveDate, CommandError> {
    NaiveDate::parse_from_str(input, "%Y-%m-%d").map_err(|_| {
        CommandError::InvalidArguments(format!("invalid date `{}` (use YYYY-MM-DD)", input))
    })
}

pub(crate) fn parse_money(label: &str, input: &str) -> Result<Decimal, CommandError> {
    parse_amount(input)
        .map_err(|_| CommandError::InvalidArguments(format!("invalid {label} `{input}`")))
}

pub(crate) fn parse_frequency(input: &str) -> Result<Frequency, CommandError> {
    Ok(input.parse::<Frequency>()?)
}

/// Parses an optional trailing date, defaulting to today.
pub(crate) fn parse_optional_date(arg: Option<&str>) -> Result<NaiveDate, CommandError> {
    arg.map_or_else(|| Ok(today()), parse_date)
}
