//! In-memory implementations of the poller's collaborators.
//!
//! These back unit and integration tests, and serve non-durable deployments
//! where offsets need not survive a restart. They are not a storage engine:
//! everything lives in process memory.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::{Error, Result};
use crate::notifier::EventNotifier;
use crate::traits::{EventFilter, ItemSource, OffsetStore};
use weft_models::{Offset, OffsetType, Sequenced};

/// In-memory [`OffsetStore`] keyed by `(type, namespace, name)`.
#[derive(Debug, Default)]
pub struct InMemoryOffsetStore {
    offsets: RwLock<HashMap<(OffsetType, String, String), i64>>,
}

impl InMemoryOffsetStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Directly read a cursor value, for assertions.
    pub async fn get(&self, offset_type: OffsetType, namespace: &str, name: &str) -> Option<i64> {
        self.offsets
            .read()
            .await
            .get(&(offset_type, namespace.to_string(), name.to_string()))
            .copied()
    }

    /// Directly seed a cursor value, bypassing `allow_create`.
    pub async fn set(&self, offset_type: OffsetType, namespace: &str, name: &str, current: i64) {
        self.offsets.write().await.insert(
            (offset_type, namespace.to_string(), name.to_string()),
            current,
        );
    }

    /// True if no cursor rows exist.
    pub async fn is_empty(&self) -> bool {
        self.offsets.read().await.is_empty()
    }
}

#[async_trait]
impl OffsetStore for InMemoryOffsetStore {
    async fn get_offset(
        &self,
        offset_type: OffsetType,
        namespace: &str,
        name: &str,
    ) -> Result<Option<Offset>> {
        Ok(self
            .get(offset_type, namespace, name)
            .await
            .map(|current| Offset::new(offset_type, namespace, name).at(current)))
    }

    async fn upsert_offset(&self, offset: &Offset, allow_create: bool) -> Result<()> {
        let key = (
            offset.offset_type,
            offset.namespace.clone(),
            offset.name.clone(),
        );
        let mut offsets = self.offsets.write().await;
        if !allow_create && !offsets.contains_key(&key) {
            return Err(Error::store(format!(
                "offset not found: {}:{}:{}",
                offset.offset_type, offset.namespace, offset.name
            )));
        }
        offsets.insert(key, offset.current);
        Ok(())
    }
}

/// In-memory append-only log implementing [`ItemSource`].
///
/// Sequences are assigned on append, starting at 0. An optional notifier is
/// tapped on every append so idle pollers wake immediately.
///
/// The namespace field of a filter is ignored: this store holds a single
/// undifferentiated log.
pub struct InMemoryEventStore<E> {
    events: RwLock<Vec<E>>,
    next_sequence: AtomicI64,
    notifier: Option<Arc<EventNotifier>>,
}

impl<E> InMemoryEventStore<E>
where
    E: Sequenced + Clone + Send + Sync,
{
    /// Create an empty log with no notifier.
    #[must_use]
    pub fn new() -> Self {
        Self {
            events: RwLock::new(Vec::new()),
            next_sequence: AtomicI64::new(0),
            notifier: None,
        }
    }

    /// Create an empty log that taps `notifier` on every append.
    #[must_use]
    pub fn with_notifier(notifier: Arc<EventNotifier>) -> Self {
        Self {
            events: RwLock::new(Vec::new()),
            next_sequence: AtomicI64::new(0),
            notifier: Some(notifier),
        }
    }

    /// Append an item built from the next sequence; returns that sequence.
    pub async fn append(&self, build: impl FnOnce(i64) -> E) -> i64 {
        let mut events = self.events.write().await;
        let sequence = self.next_sequence.fetch_add(1, Ordering::SeqCst);
        events.push(build(sequence));
        drop(events);
        if let Some(notifier) = &self.notifier {
            notifier.tap_sequence(sequence);
        }
        sequence
    }

    /// Number of items in the log.
    pub async fn len(&self) -> usize {
        self.events.read().await.len()
    }

    /// True if nothing has been appended.
    pub async fn is_empty(&self) -> bool {
        self.events.read().await.is_empty()
    }
}

impl<E> Default for InMemoryEventStore<E>
where
    E: Sequenced + Clone + Send + Sync,
{
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<E> ItemSource<E> for InMemoryEventStore<E>
where
    E: Sequenced + Clone + Send + Sync,
{
    async fn fetch(&self, filter: &EventFilter) -> Result<Vec<E>> {
        let events = self.events.read().await;
        // Appends happen in sequence order, so the vec is already ascending.
        let mut page: Vec<E> = events
            .iter()
            .filter(|e| e.sequence() > filter.after)
            .cloned()
            .collect();
        if filter.descending {
            page.reverse();
        }
        page.truncate(filter.limit);
        Ok(page)
    }
}
