//! Configuration for event poller instances.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::retry::RetryPolicy;
use weft_models::{FirstEvent, OffsetType};

/// Immutable per-instance configuration for an [`EventPoller`].
///
/// [`EventPoller`]: crate::EventPoller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollerConfig {
    /// The kind of consumer the poller's cursor belongs to.
    pub offset_type: OffsetType,

    /// Namespace scoping the cursor.
    pub offset_namespace: String,

    /// Cursor name, unique within `(offset_type, offset_namespace)`.
    pub offset_name: String,

    /// Maximum events per page.
    #[serde(default = "default_batch_size")]
    pub event_batch_size: usize,

    /// Short debounce wait used after a full page; more data is likely
    /// imminent.
    #[serde(default = "default_batch_timeout", with = "humantime_serde")]
    pub event_batch_timeout: Duration,

    /// Long idle wait used after a drained log; bounds worst-case latency if
    /// a tap is missed.
    #[serde(default = "default_poll_timeout", with = "humantime_serde")]
    pub event_poll_timeout: Duration,

    /// Attempts allowed for offset restoration at startup before `start`
    /// fails.
    #[serde(default = "default_startup_attempts")]
    pub startup_offset_retry_attempts: u32,

    /// Backoff applied to retryable failures in the running loop.
    #[serde(default)]
    pub retry: RetryPolicy,

    /// Where a freshly created cursor starts reading.
    #[serde(default)]
    pub first_event: FirstEvent,

    /// If true, the cursor lives in memory only: the offset store is never
    /// read or written.
    #[serde(default)]
    pub ephemeral: bool,
}

fn default_batch_size() -> usize {
    50
}

fn default_batch_timeout() -> Duration {
    Duration::from_millis(250)
}

fn default_poll_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_startup_attempts() -> u32 {
    5
}

impl PollerConfig {
    /// Create a config with defaults for a named cursor.
    pub fn new(
        offset_type: OffsetType,
        namespace: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            offset_type,
            offset_namespace: namespace.into(),
            offset_name: name.into(),
            event_batch_size: default_batch_size(),
            event_batch_timeout: default_batch_timeout(),
            event_poll_timeout: default_poll_timeout(),
            startup_offset_retry_attempts: default_startup_attempts(),
            retry: RetryPolicy::default(),
            first_event: FirstEvent::default(),
            ephemeral: false,
        }
    }

    /// Set the page size.
    #[must_use]
    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.event_batch_size = size;
        self
    }

    /// Set the short debounce timeout.
    #[must_use]
    pub fn with_batch_timeout(mut self, timeout: Duration) -> Self {
        self.event_batch_timeout = timeout;
        self
    }

    /// Set the long idle timeout.
    #[must_use]
    pub fn with_poll_timeout(mut self, timeout: Duration) -> Self {
        self.event_poll_timeout = timeout;
        self
    }

    /// Set the retry policy.
    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Set where a fresh cursor starts reading.
    #[must_use]
    pub fn with_first_event(mut self, first_event: FirstEvent) -> Self {
        self.first_event = first_event;
        self
    }

    /// Make the cursor in-memory only.
    #[must_use]
    pub fn ephemeral(mut self) -> Self {
        self.ephemeral = true;
        self
    }

    /// Check the config is usable.
    pub fn validate(&self) -> Result<()> {
        if self.event_batch_size == 0 {
            return Err(Error::Config("event_batch_size must be at least 1".into()));
        }
        if self.offset_name.is_empty() {
            return Err(Error::Config("offset_name must not be empty".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let conf = PollerConfig::new(OffsetType::Subscription, "ns1", "sub1");
        conf.validate().unwrap();
        assert_eq!(conf.event_batch_size, 50);
        assert!(conf.event_batch_timeout < conf.event_poll_timeout);
        assert!(!conf.ephemeral);
        assert_eq!(conf.first_event, FirstEvent::Newest);
    }

    #[test]
    fn zero_batch_size_is_rejected() {
        let conf = PollerConfig::new(OffsetType::Subscription, "ns1", "sub1").with_batch_size(0);
        assert!(conf.validate().is_err());
    }

    #[test]
    fn deserializes_with_defaults() {
        let conf: PollerConfig = serde_json::from_str(
            r#"{
                "offset_type": "aggregator",
                "offset_namespace": "weft_system",
                "offset_name": "aggregator",
                "event_poll_timeout": "10s",
                "first_event": "oldest"
            }"#,
        )
        .unwrap();
        assert_eq!(conf.offset_type, OffsetType::Aggregator);
        assert_eq!(conf.event_poll_timeout, Duration::from_secs(10));
        assert_eq!(conf.first_event, FirstEvent::Oldest);
        assert_eq!(conf.event_batch_size, 50);
    }
}
