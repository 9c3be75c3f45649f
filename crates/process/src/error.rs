use crate::processor::ProcessStats;
use galley_style::StyleParseError;
use thiserror::Error;

/// Failure of a deferred content expression.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EvalError {
    #[error("{0}")]
    Failed(String),

    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },
}

impl EvalError {
    pub fn failed(message: impl Into<String>) -> Self {
        EvalError::Failed(message.into())
    }
}

/// Errors raised while assembling a processor.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid processor configuration: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Initial style '{0}' is not defined in the stylesheet")]
    UnknownStyle(String),

    #[error(transparent)]
    Style(#[from] StyleParseError),
}

/// Errors returned by [`crate::Processor::process`].
#[derive(Error, Debug)]
pub enum ProcessError {
    /// Strict mode: processing ran to completion but reported errors.
    /// The sink has received the full output either way.
    #[error("Processing reported {errors} error diagnostic(s)")]
    Diagnostics { errors: usize, stats: ProcessStats },

    #[error(transparent)]
    Config(#[from] ConfigError),
}
