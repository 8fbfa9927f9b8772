//! Subscription options shared by durable and ephemeral consumers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Where a newly created consumer starts reading the log.
///
/// Serialized as a string: `"newest"`, `"oldest"`, or a decimal sequence
/// number.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum FirstEvent {
    /// Skip history that predates the consumer; start after the newest
    /// sequence present when the consumer is created.
    #[default]
    Newest,
    /// Process from the start of the log.
    Oldest,
    /// Start immediately after a specific sequence.
    Specific(i64),
}

impl fmt::Display for FirstEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Newest => write!(f, "newest"),
            Self::Oldest => write!(f, "oldest"),
            Self::Specific(seq) => write!(f, "{seq}"),
        }
    }
}

impl FromStr for FirstEvent {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "newest" => Ok(Self::Newest),
            "oldest" => Ok(Self::Oldest),
            other => other
                .parse::<i64>()
                .map(Self::Specific)
                .map_err(|_| Error::InvalidFirstEvent(other.to_string())),
        }
    }
}

impl From<FirstEvent> for String {
    fn from(value: FirstEvent) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for FirstEvent {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_positions() {
        assert_eq!("newest".parse::<FirstEvent>().unwrap(), FirstEvent::Newest);
        assert_eq!("oldest".parse::<FirstEvent>().unwrap(), FirstEvent::Oldest);
        assert_eq!(
            "123456".parse::<FirstEvent>().unwrap(),
            FirstEvent::Specific(123456)
        );
    }

    #[test]
    fn rejects_garbage() {
        assert!("latest".parse::<FirstEvent>().is_err());
    }

    #[test]
    fn serializes_as_string() {
        assert_eq!(
            serde_json::to_string(&FirstEvent::Specific(42)).unwrap(),
            "\"42\""
        );
        let back: FirstEvent = serde_json::from_str("\"oldest\"").unwrap();
        assert_eq!(back, FirstEvent::Oldest);
    }
}
