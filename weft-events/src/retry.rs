//! Capped exponential backoff with cancellation-aware waits.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Exponential-backoff policy used whenever a retryable operation fails.
///
/// The delay for attempt `n` (zero-based) is `initial_delay * factor^n`,
/// capped at `maximum_delay`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Delay before the first retry.
    #[serde(default = "default_initial_delay", with = "humantime_serde")]
    pub initial_delay: Duration,

    /// Upper bound on any single delay.
    #[serde(default = "default_maximum_delay", with = "humantime_serde")]
    pub maximum_delay: Duration,

    /// Multiplier applied to the delay on each successive attempt.
    #[serde(default = "default_factor")]
    pub factor: f64,
}

fn default_initial_delay() -> Duration {
    Duration::from_millis(250)
}

fn default_maximum_delay() -> Duration {
    Duration::from_secs(30)
}

fn default_factor() -> f64 {
    2.0
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            initial_delay: default_initial_delay(),
            maximum_delay: default_maximum_delay(),
            factor: default_factor(),
        }
    }
}

impl RetryPolicy {
    /// Compute the delay for a zero-based attempt number.
    #[must_use]
    pub fn delay(&self, attempt: u32) -> Duration {
        let factor = self.factor.max(1.0);
        let scaled = self.initial_delay.as_secs_f64() * factor.powi(attempt as i32);
        let capped = scaled.min(self.maximum_delay.as_secs_f64());
        Duration::from_secs_f64(capped)
    }

    /// Sleep for the attempt's delay, waking early on cancellation.
    ///
    /// Returns `true` if the full delay elapsed, `false` if the context was
    /// cancelled first (the caller must stop retrying).
    pub async fn backoff(&self, ctx: &CancellationToken, attempt: u32) -> bool {
        let delay = self.delay(attempt);
        debug!(attempt, delay_ms = delay.as_millis() as u64, "Backing off before retry");
        tokio::select! {
            _ = ctx.cancelled() => false,
            _ = tokio::time::sleep(delay) => true,
        }
    }
}
