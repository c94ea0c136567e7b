//! Error types for key-value store adapters.

/// Errors that can occur when talking to the key-value store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The store could not be reached or the connection dropped.
    #[error("connection error: {0}")]
    Connection(String),

    /// A command was sent but the store rejected or failed it.
    #[error("{command} failed: {reason}")]
    Command { command: String, reason: String },

    /// A key pattern could not be compiled.
    #[error("invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// The store is not available (e.g. disabled or shutting down).
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// Creates a new command error.
    pub fn command(command: impl Into<String>, reason: impl ToString) -> Self {
        Self::Command {
            command: command.into(),
            reason: reason.to_string(),
        }
    }

    /// Creates a new connection error.
    pub fn connection(reason: impl ToString) -> Self {
        Self::Connection(reason.to_string())
    }

    /// Creates a new invalid pattern error.
    pub fn invalid_pattern(pattern: impl Into<String>, reason: impl ToString) -> Self {
        Self::InvalidPattern {
            pattern: pattern.into(),
            reason: reason.to_string(),
        }
    }

    /// Returns true if this is a transient error that might succeed on retry.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Connection(_) | Self::Unavailable(_))
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
