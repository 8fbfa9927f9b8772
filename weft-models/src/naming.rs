//! Safe-name validation shared by every named model object.

use crate::error::{Error, Result};

/// Maximum length for names, namespaces, and versions.
pub const MAX_SAFE_NAME_LEN: usize = 64;

/// Validate a name-like field against the safe-name rules.
///
/// Names must be 1-64 characters drawn from `[a-zA-Z0-9_.-]`. This is
/// deliberately stricter than what most stores would accept, because names
/// travel to other parties and end up in URLs and broadcast payloads.
pub fn validate_safe_name(field: &'static str, value: &str) -> Result<()> {
    let ok = !value.is_empty()
        && value.len() <= MAX_SAFE_NAME_LEN
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'));
    if ok {
        Ok(())
    } else {
        Err(Error::InvalidName {
            field,
            value: value.to_string(),
        })
    }
}
