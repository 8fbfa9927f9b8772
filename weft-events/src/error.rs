//! Error types for the event polling engine.

use thiserror::Error;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the polling engine and its collaborators.
#[derive(Debug, Error)]
pub enum Error {
    /// Failure surfaced by an injected collaborator (offset store or item
    /// source). The message is passed through unchanged so callers see the
    /// underlying store's own description.
    #[error("{0}")]
    Store(String),

    /// The events handler reported a failure for a delivered page.
    #[error("handler failed: {0}")]
    Handler(String),

    /// The poller configuration failed validation.
    #[error("invalid poller configuration: {0}")]
    Config(String),

    /// The operation was abandoned because the context was cancelled.
    #[error("cancelled")]
    Cancelled,
}

impl Error {
    /// Build a collaborator error from any displayable cause.
    pub fn store(cause: impl std::fmt::Display) -> Self {
        Self::Store(cause.to_string())
    }

    /// Build a handler error from any displayable cause.
    pub fn handler(cause: impl std::fmt::Display) -> Self {
        Self::Handler(cause.to_string())
    }
}
