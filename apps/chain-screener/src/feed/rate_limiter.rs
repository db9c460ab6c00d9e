//! Minimum-interval rate limiter shared by fetch workers.

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

/// Default spacing between outbound requests.
pub const DEFAULT_MIN_INTERVAL: Duration = Duration::from_secs(1);

/// Grants at most one request per `min_interval` across all holders.
///
/// The last grant time is checked and updated under one lock, so concurrent
/// callers are serialised and spaced.
#[derive(Debug)]
pub struct RateLimiter {
    min_interval: Duration,
    last_grant: Mutex<Option<Instant>>,
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_INTERVAL)
    }
}

impl RateLimiter {
    /// Create a limiter with the given spacing.
    #[must_use]
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_grant: Mutex::new(None),
        }
    }

    /// Wait until a request may be sent.
    pub async fn acquire(&self) {
        let mut last_grant = self.last_grant.lock().await;
        if let Some(previous) = *last_grant {
            tokio::time::sleep_until(previous + self.min_interval).await;
        }
        *last_grant = Some(Instant::now());
    }
}
