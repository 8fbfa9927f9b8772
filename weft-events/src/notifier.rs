//! Shoulder-tap notifications between event writers and idle pollers.
//!
//! An [`EventNotifier`] is created once per scope (typically per namespace)
//! and shared by every producer and poller in that scope. Producers tap it
//! when they commit a new event; idle pollers wake immediately instead of
//! waiting out their poll timeout.

use tokio::sync::watch;
use tracing::trace;
use weft_models::SEQUENCE_NONE;

/// A coalescing wake-up signal for idle pollers.
///
/// Built on a single-slot watch channel holding the newest announced
/// sequence: taps never block and never queue. A second tap before the
/// first is consumed simply overwrites the slot. Every subscribed poller
/// observes each tap; the carried sequence is advisory and may be ignored.
#[derive(Debug)]
pub struct EventNotifier {
    scope: String,
    tx: watch::Sender<i64>,
}

impl EventNotifier {
    /// Create a notifier for a scope.
    #[must_use]
    pub fn new(scope: impl Into<String>) -> Self {
        let (tx, _rx) = watch::channel(SEQUENCE_NONE);
        Self {
            scope: scope.into(),
            tx,
        }
    }

    /// The scope this notifier serves.
    pub fn scope(&self) -> &str {
        &self.scope
    }

    /// Announce that new data is available, without a sequence.
    ///
    /// Non-blocking and coalescing: safe to call from any task at any
    /// frequency.
    pub fn tap(&self) {
        let latest = *self.tx.borrow();
        self.tx.send_replace(latest);
        trace!(scope = %self.scope, "Shoulder tap");
    }

    /// Announce that the event at `sequence` was committed.
    pub fn tap_sequence(&self, sequence: i64) {
        self.tx.send_replace(sequence);
        trace!(scope = %self.scope, sequence, "Shoulder tap");
    }

    /// The newest sequence announced so far, or -1 if none.
    pub fn latest(&self) -> i64 {
        *self.tx.borrow()
    }

    /// Subscribe a poller to wake-up signals.
    ///
    /// The returned receiver's `changed()` future resolves on every
    /// subsequent tap.
    pub fn subscribe(&self) -> watch::Receiver<i64> {
        self.tx.subscribe()
    }
}
