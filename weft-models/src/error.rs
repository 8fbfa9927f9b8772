//! Error types for the weft data model.

use thiserror::Error;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while validating or constructing model objects.
#[derive(Debug, Error)]
pub enum Error {
    /// A name, namespace, or version failed the safe-name syntax rules.
    #[error("invalid {field}: '{value}' must match [a-zA-Z0-9_.-] and be 1-64 characters")]
    InvalidName {
        /// Which field was rejected.
        field: &'static str,
        /// The offending value.
        value: String,
    },

    /// An unknown validator kind was supplied for a datatype.
    #[error("unknown validator '{0}' for datatype")]
    UnknownValidator(String),

    /// A datatype was defined without a value document.
    #[error("datatype value is missing")]
    MissingValue,

    /// A datatype value document was not parseable JSON.
    #[error("datatype value is not valid JSON: {0}")]
    InvalidValue(#[from] serde_json::Error),

    /// A first-event position string could not be parsed.
    #[error("invalid first-event position '{0}': expected 'newest', 'oldest', or a sequence number")]
    InvalidFirstEvent(String),
}
