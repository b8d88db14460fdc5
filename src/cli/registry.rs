//! Static command table with alias lookup, suggestions and argument completion.

use strsim::levenshtein;

use crate::{config::Config, planning::Frequency};

use super::context::{CommandResult, ShellContext};

pub(crate) type Handler = fn(&mut ShellContext, &[&str]) -> CommandResult;

const MAX_SUGGESTION_DISTANCE: usize = 3;

/// What a positional argument accepts, used to drive tab completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Arg {
    /// Numbers, dates and other values with nothing to complete.
    Value,
    Frequency,
    Setting,
    Command,
    OneOf(&'static [&'static str]),
}

pub(crate) struct Command {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub summary: &'static str,
    pub usage: &'static str,
    pub args: &'static [Arg],
    pub handler: Handler,
}

impl Command {
    fn answers_to(&self, name: &str) -> bool {
        self.name == name || self.aliases.contains(&name)
    }
}

pub(crate) struct CommandTable {
    commands: &'static [Command],
}

impl CommandTable {
    pub const fn new(commands: &'static [Command]) -> Self {
        Self { commands }
    }

    pub fn find(&self, name: &str) -> Option<&'static Command> {
        let name = name.to_ascii_lowercase();
        self.commands.iter().find(|command| command.answers_to(&name))
    }

    pub fn iter(&self) -> impl Iterator<Item = &'static Command> {
        self.commands.iter()
    }

    /// Nearest command name within a small edit distance of `input`.
    pub fn closest(&self, input: &str) -> Option<&'static str> {
        let needle = input.to_ascii_lowercase();
        self.commands
            .iter()
            .map(|command| (levenshtein(command.name, &needle), command.name))
            .filter(|(distance, _)| *distance <= MAX_SUGGESTION_DISTANCE)
            .min_by_key(|(distance, _)| *distance)
            .map(|(_, name)| name)
    }

    /// Candidates for the word under the cursor, given the text before it.
    ///
    /// Returns the byte offset where the word starts and the matching candidates.
    pub fn complete(&self, before_cursor: &str) -> (usize, Vec<String>) {
        let start = before_cursor
            .rfind(|ch: char| ch.is_ascii_whitespace())
            .map_or(0, |idx| idx + 1);
        let partial = before_cursor[start..].to_ascii_lowercase();
        let words: Vec<&str> = before_cursor[..start].split_whitespace().collect();

        let pool: Vec<&str> = match words.split_first() {
            None => self.commands.iter().map(|command| command.name).collect(),
            Some((name, args)) => match self.find(name).and_then(|cmd| cmd.args.get(args.len())) {
                Some(Arg::Frequency) => Frequency::ALL.iter().map(Frequency::label).collect(),
                Some(Arg::Setting) => Config::KEYS.to_vec(),
                Some(Arg::Command) => self.commands.iter().map(|command| command.name).collect(),
                Some(Arg::OneOf(choices)) => choices.to_vec(),
                Some(Arg::Value) | None => Vec::new(),
            },
        };

        let candidates = pool
            .into_iter()
            .filter(|candidate| candidate.starts_with(&partial))
            .map(str::to_string)
            .collect();
        (start, candidates)
    }
}
