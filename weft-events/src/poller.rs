//! The event poller: a durable-offset consumer loop over an ordered,
//! append-only item source.
//!
//! Each poller owns one background task that restores its cursor, then
//! repeatedly fetches a bounded page of items past the cursor, hands the page
//! to the configured handler, advances and persists the cursor, and idles
//! until a shoulder tap, a timeout, or cancellation. Steady-state failures
//! are absorbed with capped exponential backoff; callers only ever observe a
//! start-time error and an eventual closure signal.

use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use tokio::sync::{Mutex, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

use crate::config::PollerConfig;
use crate::error::{Error, Result};
use crate::notifier::EventNotifier;
use crate::traits::{CriteriaHook, EventFilter, ItemSource, NewEventsHandler, OffsetStore};
use weft_models::{Offset, FirstEvent, SEQUENCE_NONE, Sequenced};

/// A background consumer of sequenced items with a durable cursor.
///
/// Construct with [`EventPoller::new`], wrap in an [`Arc`], and call
/// [`start`](EventPoller::start). The loop runs until the cancellation token
/// passed at construction fires; [`closed`](EventPoller::closed) resolves
/// once the loop has fully stopped.
pub struct EventPoller<E> {
    conf: PollerConfig,
    source: Arc<dyn ItemSource<E>>,
    offsets: Arc<dyn OffsetStore>,
    handler: NewEventsHandler<E>,
    criteria: Option<CriteriaHook>,
    notifier: Arc<EventNotifier>,
    /// Receiver side of the notifier; locked only by the loop task's wait.
    taps: Mutex<watch::Receiver<i64>>,
    ctx: CancellationToken,
    closed: CancellationToken,
    /// Authoritative in-memory cursor; only the loop task writes it.
    polling_offset: AtomicI64,
}

impl<E> EventPoller<E>
where
    E: Sequenced + Send + Sync + 'static,
{
    /// Create a poller over the given collaborators.
    ///
    /// Fails if the configuration is invalid. The poller does nothing until
    /// [`start`](EventPoller::start) is called.
    pub fn new(
        conf: PollerConfig,
        source: Arc<dyn ItemSource<E>>,
        offsets: Arc<dyn OffsetStore>,
        notifier: Arc<EventNotifier>,
        handler: NewEventsHandler<E>,
        ctx: CancellationToken,
    ) -> Result<Self> {
        conf.validate()?;
        let taps = Mutex::new(notifier.subscribe());
        Ok(Self {
            conf,
            source,
            offsets,
            handler,
            criteria: None,
            notifier,
            taps,
            ctx,
            closed: CancellationToken::new(),
            polling_offset: AtomicI64::new(0),
        })
    }

    /// Add a hook that augments the filter used for every page fetch.
    #[must_use]
    pub fn with_criteria(mut self, hook: CriteriaHook) -> Self {
        self.criteria = Some(hook);
        self
    }

    /// The current in-memory cursor.
    pub fn polling_offset(&self) -> i64 {
        self.polling_offset.load(Ordering::SeqCst)
    }

    /// Wake this poller's scope: producers call this after committing a new
    /// event.
    pub fn shoulder_tap(&self) {
        self.notifier.tap();
    }

    /// Resolves once the background loop has fully stopped.
    pub async fn closed(&self) {
        self.closed.cancelled().await;
    }

    /// Restore the cursor and spawn the background loop.
    ///
    /// Restoration is attempted up to `startup_offset_retry_attempts` times
    /// with the configured backoff; the last error is returned if all
    /// attempts fail, and the loop is not started.
    pub async fn start(self: &Arc<Self>) -> Result<()> {
        let attempts = self.conf.startup_offset_retry_attempts.max(1);
        let mut attempt: u32 = 0;
        loop {
            match self.restore_offset().await {
                Ok(()) => break,
                Err(err) => {
                    attempt += 1;
                    if attempt >= attempts {
                        return Err(err);
                    }
                    warn!(
                        offset_name = %self.conf.offset_name,
                        error = %err,
                        attempt,
                        "Failed to restore offset, retrying"
                    );
                    if !self.conf.retry.backoff(&self.ctx, attempt - 1).await {
                        return Err(Error::Cancelled);
                    }
                }
            }
        }
        let poller = Arc::clone(self);
        tokio::spawn(poller.event_loop());
        Ok(())
    }

    /// Establish the in-memory cursor and, unless ephemeral, guarantee a
    /// persisted row exists.
    pub(crate) async fn restore_offset(&self) -> Result<()> {
        if self.conf.ephemeral {
            let sequence = self.resolve_first_event().await?;
            self.polling_offset.store(sequence, Ordering::SeqCst);
            debug!(
                offset_name = %self.conf.offset_name,
                sequence,
                "Ephemeral poller offset resolved in memory"
            );
            return Ok(());
        }
        loop {
            if let Some(row) = self
                .offsets
                .get_offset(
                    self.conf.offset_type,
                    &self.conf.offset_namespace,
                    &self.conf.offset_name,
                )
                .await?
            {
                self.polling_offset.store(row.current, Ordering::SeqCst);
                info!(
                    offset_type = %self.conf.offset_type,
                    namespace = %self.conf.offset_namespace,
                    offset_name = %self.conf.offset_name,
                    offset = row.current,
                    "Event poller offset restored"
                );
                return Ok(());
            }
            let sequence = self.resolve_first_event().await?;
            let offset = Offset::new(
                self.conf.offset_type,
                self.conf.offset_namespace.clone(),
                self.conf.offset_name.clone(),
            )
            .at(sequence);
            self.offsets.upsert_offset(&offset, true).await?;
            // Loop back and adopt whatever row now exists, ours or a
            // concurrent creator's.
        }
    }

    /// Resolve the first-event policy to a starting sequence.
    async fn resolve_first_event(&self) -> Result<i64> {
        match self.conf.first_event {
            FirstEvent::Specific(sequence) => Ok(sequence),
            FirstEvent::Oldest => Ok(SEQUENCE_NONE),
            FirstEvent::Newest => {
                // Seed past existing history so a fresh consumer does not
                // replay events that predate it.
                let filter = self.build_filter(EventFilter::newest());
                let items = self.source.fetch(&filter).await?;
                Ok(items
                    .iter()
                    .map(Sequenced::sequence)
                    .max()
                    .unwrap_or(SEQUENCE_NONE))
            }
        }
    }

    fn build_filter(&self, base: EventFilter) -> EventFilter {
        match &self.criteria {
            Some(hook) => hook(base),
            None => base,
        }
    }

    /// Run until cancelled. Never returns an error: operational failures are
    /// retried with backoff, and anything observed during shutdown is benign.
    pub(crate) async fn event_loop(self: Arc<Self>) {
        info!(
            offset_type = %self.conf.offset_type,
            namespace = %self.conf.offset_namespace,
            offset_name = %self.conf.offset_name,
            "Event poller started"
        );
        let mut handler_attempt: u32 = 0;
        loop {
            let Some(events) = self.read_page().await else {
                break;
            };
            let page_size = events.len();
            let mut repoll = false;
            if page_size > 0 {
                // Pages arrive in ascending sequence order.
                let last_sequence = events
                    .iter()
                    .map(Sequenced::sequence)
                    .max()
                    .unwrap_or(SEQUENCE_NONE);
                debug!(count = page_size, last_sequence, "Dispatching events page");
                match (self.handler)(events).await {
                    Ok(requested_repoll) => {
                        handler_attempt = 0;
                        repoll = requested_repoll;
                    }
                    Err(err) => {
                        if self.ctx.is_cancelled() {
                            break;
                        }
                        warn!(
                            offset_name = %self.conf.offset_name,
                            error = %err,
                            "Events handler failed, backing off before re-polling"
                        );
                        if !self.conf.retry.backoff(&self.ctx, handler_attempt).await {
                            break;
                        }
                        handler_attempt = handler_attempt.saturating_add(1);
                        // Re-fetch from the unchanged offset; no partial
                        // advance on failure.
                        continue;
                    }
                }
                self.polling_offset.store(last_sequence, Ordering::SeqCst);
                if !self.conf.ephemeral && !self.commit_offset().await {
                    break;
                }
            }
            if repoll {
                trace!("Handler requested immediate repoll");
                continue;
            }
            if !self.wait_for_shoulder_tap_or_poll_timeout(page_size).await {
                break;
            }
        }
        debug!(offset_name = %self.conf.offset_name, "Event poller closed");
        self.closed.cancel();
    }

    /// Fetch one page past the cursor, retrying failures with backoff.
    ///
    /// Returns `None` when cancellation ends the loop.
    async fn read_page(&self) -> Option<Vec<E>> {
        let mut attempt: u32 = 0;
        loop {
            if self.ctx.is_cancelled() {
                return None;
            }
            let filter = self.build_filter(
                EventFilter::after(self.polling_offset()).with_limit(self.conf.event_batch_size),
            );
            match self.source.fetch(&filter).await {
                Ok(events) => return Some(events),
                Err(err) => {
                    if self.ctx.is_cancelled() {
                        // Benign: errors racing shutdown are suppressed.
                        return None;
                    }
                    warn!(
                        offset_name = %self.conf.offset_name,
                        error = %err,
                        attempt,
                        "Failed to read events page, retrying"
                    );
                    if !self.conf.retry.backoff(&self.ctx, attempt).await {
                        return None;
                    }
                    attempt = attempt.saturating_add(1);
                }
            }
        }
    }

    /// Persist the advanced cursor, retrying failures with backoff.
    ///
    /// A lost advance would replay events on restart, so persistence errors
    /// are never dropped; only cancellation abandons the write. Returns
    /// `false` when cancellation ends the loop.
    async fn commit_offset(&self) -> bool {
        let offset = Offset::new(
            self.conf.offset_type,
            self.conf.offset_namespace.clone(),
            self.conf.offset_name.clone(),
        )
        .at(self.polling_offset());
        let mut attempt: u32 = 0;
        loop {
            match self.offsets.upsert_offset(&offset, false).await {
                Ok(()) => {
                    trace!(offset = offset.current, "Offset committed");
                    return true;
                }
                Err(err) => {
                    if self.ctx.is_cancelled() {
                        return false;
                    }
                    warn!(
                        offset_name = %self.conf.offset_name,
                        error = %err,
                        "Failed to persist offset, retrying"
                    );
                    if !self.conf.retry.backoff(&self.ctx, attempt).await {
                        return false;
                    }
                    attempt = attempt.saturating_add(1);
                }
            }
        }
    }

    /// Idle until new data is announced, a timeout elapses, or the context
    /// is cancelled.
    ///
    /// A full previous page means more data is likely imminent, so the short
    /// batch timeout applies; otherwise the log was drained and the long poll
    /// timeout bounds worst-case latency. Cancellation always wins and
    /// returns `false`; a tap or an elapsed timeout returns `true`.
    pub(crate) async fn wait_for_shoulder_tap_or_poll_timeout(&self, last_page_size: usize) -> bool {
        let timeout = if last_page_size >= self.conf.event_batch_size {
            self.conf.event_batch_timeout
        } else {
            self.conf.event_poll_timeout
        };
        let mut taps = self.taps.lock().await;
        tokio::select! {
            biased;
            _ = self.ctx.cancelled() => false,
            _ = taps.changed() => true,
            _ = tokio::time::sleep(timeout) => true,
        }
    }
}
