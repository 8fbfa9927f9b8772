//! Sequenced events emitted by the node's append-only event log.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Anything positioned in the local append-only log by a strictly increasing
/// sequence number.
///
/// The poller consumes items purely through this trait; it is agnostic to the
/// payload shape.
pub trait Sequenced {
    /// The item's position in the log.
    fn sequence(&self) -> i64;
}

/// The kind of state change an event announces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    /// A message completed all confirmations and is final.
    MessageConfirmed,
    /// A message was rejected during confirmation.
    MessageRejected,
    /// A definition (datatype, contract interface, API) was confirmed.
    DefinitionConfirmed,
}

/// An event row from the local log.
///
/// `sequence` is assigned by the log at commit time and is strictly increasing
/// within a node. `reference` points at the object the event is about.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Unique id of the event itself.
    pub id: Uuid,
    /// What happened.
    #[serde(rename = "type")]
    pub event_type: EventType,
    /// Namespace the event belongs to.
    pub namespace: String,
    /// The object this event refers to.
    pub reference: Uuid,
    /// Position in the local log.
    pub sequence: i64,
    /// Commit time.
    pub created: DateTime<Utc>,
}

impl Event {
    /// Create a new event for an object reference.
    ///
    /// The sequence is left at zero; the log assigns the real sequence when
    /// the event is committed.
    pub fn new(event_type: EventType, namespace: impl Into<String>, reference: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            event_type,
            namespace: namespace.into(),
            reference,
            sequence: 0,
            created: Utc::now(),
        }
    }
}

impl Sequenced for Event {
    fn sequence(&self) -> i64 {
        self.sequence
    }
}
