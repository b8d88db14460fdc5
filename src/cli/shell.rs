//! Line sources and the read-execute loop.

use std::io::{self, BufRead};

use rustyline::{
    completion::{Completer, Pair},
    error::ReadlineError,
    history::DefaultHistory,
    Context, Editor, Helper, Highlighter, Hinter, Validator,
};
use tracing::info;

use crate::errors::CliError;

use super::{
    commands::COMMANDS,
    context::{CliMode, LoopControl, ShellContext},
    output,
};

pub const SCRIPT_MODE_ENV: &str = "FINTRACK_CORE_CLI_SCRIPT";

pub fn run_cli() -> Result<(), CliError> {
    let mode = if std::env::var_os(SCRIPT_MODE_ENV).is_some() {
        CliMode::Script
    } else {
        CliMode::Interactive
    };
    if mode == CliMode::Script {
        output::set_color_enabled(false);
    }
    let mut context = ShellContext::new(mode)?;
    info!(?mode, "shell started");

    match mode {
        CliMode::Interactive => {
            let mut editor = Editor::<ShellHelper, DefaultHistory>::new()?;
            editor.set_helper(Some(ShellHelper));
            output::info("Type `help` to list commands, `exit` to leave.");
            drive(&mut context, &mut Terminal { editor })
        }
        CliMode::Script => {
            let stdin = io::stdin();
            drive(&mut context, &mut Piped(stdin.lock().lines()))
        }
    }
}

/// Where input lines come from. `None` ends the session.
trait LineSource {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>, CliError>;
}

struct Terminal {
    editor: Editor<ShellHelper, DefaultHistory>,
}

impl LineSource for Terminal {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>, CliError> {
        match self.editor.readline(prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    self.editor.add_history_entry(line.trim())?;
                }
                Ok(Some(line))
            }
            Err(ReadlineError::Interrupted) => {
                output::info("Press Ctrl-D or type `exit` to leave.");
                Ok(Some(String::new()))
            }
            Err(ReadlineError::Eof) => {
                output::info("Exiting shell.");
                Ok(None)
            }
            Err(err) => Err(err.into()),
        }
    }
}

/// Non-interactive input, one command per line, no prompt.
struct Piped<R: BufRead>(io::Lines<R>);

impl<R: BufRead> LineSource for Piped<R> {
    fn read_line(&mut self, _prompt: &str) -> Result<Option<String>, CliError> {
        Ok(self.0.next().transpose()?)
    }
}

fn drive(context: &mut ShellContext, source: &mut impl LineSource) -> Result<(), CliError> {
    while let Some(line) = source.read_line(&context.prompt())? {
        match context.execute(&line) {
            Ok(LoopControl::Continue) => {}
            Ok(LoopControl::Exit) => break,
            Err(err) => context.report_error(err),
        }
    }
    Ok(())
}

#[derive(Helper, Hinter, Highlighter, Validator)]
struct ShellHelper;

impl Completer for ShellHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let (start, words) = COMMANDS.complete(&line[..pos]);
        let candidates = words
            .into_iter()
            .map(|word| Pair {
                display: word.clone(),
                replacement: word,
            })
            .collect();
        Ok((start, candidates))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use tempfile::tempdir;

    use crate::config::ConfigManager;

    use super::*;

    fn script_context(dir: &std::path::Path) -> ShellContext {
        output::set_color_enabled(false);
        let manager = ConfigManager::with_base_dir(dir.to_path_buf()).unwrap();
        ShellContext::with_config_manager(CliMode::Script, manager)
    }

    #[test]
    fn stops_reading_after_exit() {
        let dir = tempdir().unwrap();
        let mut context = script_context(dir.path());
        let input = "config set currency eur\nexit\nconfig set currency gbp\n";

        drive(&mut context, &mut Piped(Cursor::new(input).lines())).unwrap();

        assert_eq!(context.config().currency, "EUR");
    }

    #[test]
    fn keeps_going_past_bad_lines() {
        let dir = tempdir().unwrap();
        let mut context = script_context(dir.path());
        let input =
            "amortize 1000\nnot-a-command\n\"unbalanced\n# comment\nconfig set currency jpy\n";

        drive(&mut context, &mut Piped(Cursor::new(input).lines())).unwrap();

        assert_eq!(context.config().currency, "JPY");
    }

    #[test]
    fn usage_errors_name_the_expected_arguments() {
        let dir = tempdir().unwrap();
        let mut context = script_context(dir.path());

        let err = context.execute("amortize 1000 12").unwrap_err();
        assert!(err.to_string().starts_with("usage: amortize <balance>"), "{err}");
        assert!(matches!(context.execute("QUIT"), Ok(LoopControl::Exit)));
        assert!(matches!(context.execute("  "), Ok(LoopControl::Continue)));
    }

    #[test]
    fn helper_completes_through_the_command_table() {
        let helper = ShellHelper;
        let history = DefaultHistory::new();
        let ctx = Context::new(&history);
        let (start, pairs) = helper.complete("forecast 40 mon", 15, &ctx).unwrap();
        assert_eq!(start, "forecast 40 ".len());
        let words: Vec<_> = pairs.into_iter().map(|pair| pair.replacement).collect();
        assert_eq!(words, vec!["monthly"]);
    }
}
