//! Collaborator contracts consumed by the event poller.
//!
//! The poller owns no storage and no transport: it fetches ordered items
//! through [`ItemSource`], tracks its cursor through [`OffsetStore`], and
//! delivers pages through a [`NewEventsHandler`] callback.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;
use weft_models::{Offset, OffsetType, SEQUENCE_NONE};

/// Bounds on a single page read from an item source.
///
/// Encodes "sequence strictly greater than `after`, ascending, at most
/// `limit` rows". `descending` flips the sort and is used only by the
/// startup seed query that finds the newest existing sequence.
#[derive(Debug, Clone)]
pub struct EventFilter {
    /// Strictly-greater-than sequence bound.
    pub after: i64,
    /// Maximum rows to return.
    pub limit: usize,
    /// Return newest-first instead of oldest-first.
    pub descending: bool,
    /// Restrict to a namespace, where the source supports it.
    pub namespace: Option<String>,
}

impl EventFilter {
    /// Filter for everything after a sequence, ascending.
    #[must_use]
    pub fn after(sequence: i64) -> Self {
        Self {
            after: sequence,
            limit: usize::MAX,
            descending: false,
            namespace: None,
        }
    }

    /// Filter that selects only the newest existing item.
    #[must_use]
    pub fn newest() -> Self {
        Self {
            after: SEQUENCE_NONE,
            limit: 1,
            descending: true,
            namespace: None,
        }
    }

    /// Bound the page size.
    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Restrict to a namespace.
    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }
}

/// Hook letting a poller's owner add criteria to every page fetch.
pub type CriteriaHook = Arc<dyn Fn(EventFilter) -> EventFilter + Send + Sync>;

/// Page handler invoked with each non-empty batch of events, in ascending
/// sequence order.
///
/// Returns `Ok(true)` to request an immediate repoll (the handler believes
/// more work is available right now), `Ok(false)` to let the poller idle
/// until the next tap or timeout.
pub type NewEventsHandler<E> =
    Arc<dyn Fn(Vec<E>) -> Pin<Box<dyn Future<Output = Result<bool>> + Send>> + Send + Sync>;

/// An ordered, append-only source of sequenced items.
#[async_trait]
pub trait ItemSource<E>: Send + Sync {
    /// Fetch one page of items matching the filter, ordered by sequence.
    async fn fetch(&self, filter: &EventFilter) -> Result<Vec<E>>;
}

/// Durable storage for consumer cursors.
///
/// Implementations must be safe for concurrent callers across unrelated
/// pollers; a single cursor row is only ever written by the poller that
/// owns it.
#[async_trait]
pub trait OffsetStore: Send + Sync {
    /// Read a cursor row, `None` if it has never been created.
    async fn get_offset(
        &self,
        offset_type: OffsetType,
        namespace: &str,
        name: &str,
    ) -> Result<Option<Offset>>;

    /// Write a cursor row. With `allow_create` false the row must already
    /// exist.
    async fn upsert_offset(&self, offset: &Offset, allow_create: bool) -> Result<()>;
}
