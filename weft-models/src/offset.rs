//! Durable consumer cursors over the sequenced event log.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Sequence value meaning "before the first possible event".
pub const SEQUENCE_NONE: i64 = -1;

/// The kind of consumer an offset belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OffsetType {
    /// A durable subscription delivering events to an application.
    Subscription,
    /// The node-internal aggregator that assembles confirmed state.
    Aggregator,
}

impl fmt::Display for OffsetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Subscription => write!(f, "subscription"),
            Self::Aggregator => write!(f, "aggregator"),
        }
    }
}

/// A persisted cursor marking the last sequence fully processed by a named
/// consumer.
///
/// An offset is uniquely identified by `(offset_type, namespace, name)`. It is
/// created lazily on first restore, mutated only by the poller that owns it,
/// and never deleted by this subsystem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offset {
    /// The kind of consumer this cursor belongs to.
    #[serde(rename = "type")]
    pub offset_type: OffsetType,
    /// Namespace scoping the consumer.
    pub namespace: String,
    /// Consumer name, unique within `(offset_type, namespace)`.
    pub name: String,
    /// Sequence of the last fully processed event; [`SEQUENCE_NONE`] if none.
    pub current: i64,
}

impl Offset {
    /// Create an offset cursor positioned before the first possible event.
    pub fn new(
        offset_type: OffsetType,
        namespace: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            offset_type,
            namespace: namespace.into(),
            name: name.into(),
            current: SEQUENCE_NONE,
        }
    }

    /// Position the cursor at a specific sequence.
    #[must_use]
    pub fn at(mut self, sequence: i64) -> Self {
        self.current = sequence;
        self
    }
}
