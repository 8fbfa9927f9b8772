//! Sequenced-event polling engine for weft.
//!
//! This crate turns an ordered, append-only event log into batches delivered
//! to a pluggable handler, with durable offsets, capped-backoff retries, and
//! coalescing wake-up signals.
//!
//! # Key Types
//!
//! - [`EventPoller`] - Background loop: restore offset, fetch, handle,
//!   advance, wait
//! - [`EventNotifier`] - Shared shoulder-tap signal between writers and
//!   pollers
//! - [`RetryPolicy`] - Capped exponential backoff for retryable failures
//! - [`ItemSource`] / [`OffsetStore`] - Injected collaborator contracts
//! - [`InMemoryEventStore`] / [`InMemoryOffsetStore`] - Test and non-durable
//!   implementations

pub mod config;
pub mod error;
pub mod memory;
pub mod notifier;
pub mod poller;
pub mod retry;
pub mod traits;

pub use config::PollerConfig;
pub use error::{Error, Result};
pub use memory::{InMemoryEventStore, InMemoryOffsetStore};
pub use notifier::EventNotifier;
pub use poller::EventPoller;
pub use retry::RetryPolicy;
pub use traits::{CriteriaHook, EventFilter, ItemSource, NewEventsHandler, OffsetStore};
