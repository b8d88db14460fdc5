use thiserror::Error;

/// Error type shared by the calculation and configuration layers.
#[derive(Debug, Error)]
pub enum FinanceError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl FinanceError {
    pub fn invalid(message: impl Into<String>) -> Self {
        FinanceError::InvalidArgument(message.into())
    }
}

pub type FinanceResult<T> = Result<T, FinanceError>;

/// Failures that terminate the interactive shell.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Line editor error: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),
    #[error(transparent)]
    Finance(#[from] FinanceError),
}
