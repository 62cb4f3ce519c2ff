//! Error handling for nebula-logger
//!
//! All fallible operations return [`LogResult<T>`], an alias for
//! `Result<T, LogError>`. Sink write failures are deliberately absent from this
//! taxonomy: they are absorbed by the backend and never reach a caller.

use std::io;

/// Type alias for Result with [`LogError`] for logging operations
pub type LogResult<T> = Result<T, LogError>;

/// Errors surfaced by the registry, the facade and backend configuration
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum LogError {
    /// A log call (or a backend lookup) happened before the registry was initialized
    #[error(
        "The logger was not initialized, you can not log. Please run 'initialize(config)' \
         on your service initialization phase first before you try to consume it."
    )]
    NotInitialized,

    /// The registry refuses a second initialization
    #[error("The logger registry is already initialized and does not allow re-initialization")]
    AlreadyInitialized,

    /// Unknown log level name
    #[error("Invalid log level: '{0}' (expected one of: debug, info, warn, error)")]
    InvalidLevel(String),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error while preparing sinks
    #[error("IO error: {context}: {source}")]
    Io {
        /// What was being done when the error occurred
        context: String,
        /// Underlying error
        #[source]
        source: io::Error,
    },
}

impl LogError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Whether this error is a caller contract violation rather than an
    /// environment problem
    pub fn is_contract_violation(&self) -> bool {
        matches!(self, Self::NotInitialized | Self::AlreadyInitialized)
    }
}
