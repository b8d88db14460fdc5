//! Line-oriented shell over the calculation core.

mod commands;
pub(crate) mod context;
mod output;
mod registry;
mod shell;

pub use context::{CliMode, CommandError, ShellContext};
pub use shell::{run_cli, SCRIPT_MODE_ENV};
