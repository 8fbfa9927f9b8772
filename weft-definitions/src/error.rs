//! Error types for definition sending.

use thiserror::Error;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while defining or publishing definitions.
#[derive(Debug, Error)]
pub enum Error {
    /// A definition with the same identity already exists.
    #[error("a contract interface named '{name}' version '{version}' already exists in namespace '{namespace}'")]
    Conflict {
        /// Local namespace.
        namespace: String,
        /// Definition name.
        name: String,
        /// Definition version.
        version: String,
    },

    /// The action requires multiparty networking, which this node does not
    /// participate in.
    #[error("this action requires multiparty networking, which is not enabled on this node")]
    ActionNotSupported,

    /// A definition referenced by name/version does not exist locally.
    #[error("contract interface '{name}' version '{version}' not found")]
    NotFound {
        /// Definition name.
        name: String,
        /// Definition version.
        version: String,
    },

    /// The local definition handler rejected the definition.
    #[error("definition was rejected by the local handler")]
    Rejected,

    /// The definition object failed validation.
    #[error(transparent)]
    Model(#[from] weft_models::Error),

    /// The definition could not be serialized for broadcast.
    #[error("failed to serialize definition: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Failure surfaced by an injected collaborator, passed through
    /// unchanged.
    #[error("{0}")]
    Collaborator(String),
}

impl Error {
    /// Build a collaborator error from any displayable cause.
    pub fn collaborator(cause: impl std::fmt::Display) -> Self {
        Self::Collaborator(cause.to_string())
    }
}
