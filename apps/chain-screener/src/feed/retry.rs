//! Retry policy with exponential backoff for chain requests.
//!
//! | Retryable | Non-Retryable |
//! |-----------|---------------|
//! | HTTP 429 (honours `Retry-After`) | Other HTTP 4xx |
//! | HTTP 5xx, 408 | Malformed response bodies |
//! | Network errors and timeouts | |

use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Retry policy for market-data requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Maximum number of attempts, including the first (default: 3).
    pub max_attempts: u32,
    /// Delay before the first retry (default: 1s).
    pub initial_backoff: Duration,
    /// Maximum delay (default: 30s).
    pub max_backoff: Duration,
    /// Backoff multiplier for exponential growth (default: 2.0).
    pub backoff_multiplier: f64,
    /// Jitter factor for randomization (default: 0.1 = ±10%).
    pub jitter_factor: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_secs(1),
            max_backoff: Duration::from_secs(30),
            backoff_multiplier: 2.0,
            jitter_factor: 0.1,
        }
    }
}

impl RetryPolicy {
    /// Policy with no delay between attempts.
    #[must_use]
    pub const fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            initial_backoff: Duration::ZERO,
            max_backoff: Duration::ZERO,
            backoff_multiplier: 1.0,
            jitter_factor: 0.0,
        }
    }
}

/// Exponential backoff with jitter over one request's attempts.
#[derive(Debug)]
pub struct Backoff {
    retries: u32,
    max_retries: u32,
    initial_backoff_ms: u64,
    max_backoff_ms: u64,
    backoff_multiplier: f64,
    jitter_factor: f64,
}

impl Backoff {
    /// Start a backoff sequence for `policy`.
    #[must_use]
    pub fn new(policy: &RetryPolicy) -> Self {
        #[allow(clippy::cast_possible_truncation)]
        let to_ms = |d: Duration| d.as_millis() as u64;
        Self {
            retries: 0,
            max_retries: policy.max_attempts.saturating_sub(1),
            initial_backoff_ms: to_ms(policy.initial_backoff),
            max_backoff_ms: to_ms(policy.max_backoff),
            backoff_multiplier: policy.backoff_multiplier,
            jitter_factor: policy.jitter_factor,
        }
    }

    /// Delay before the next attempt, or `None` once attempts are spent.
    pub fn next_backoff(&mut self) -> Option<Duration> {
        if self.retries >= self.max_retries {
            return None;
        }

        let base_ms = self.base_backoff_ms();
        let jittered_ms = self.apply_jitter(base_ms).min(self.max_backoff_ms);
        self.retries += 1;

        Some(Duration::from_millis(jittered_ms))
    }

    /// Like [`next_backoff`](Self::next_backoff), but prefer a server
    /// supplied delay when present. Either way one attempt is consumed.
    pub fn next_with_hint(&mut self, hint: Option<Duration>) -> Option<Duration> {
        let computed = self.next_backoff()?;
        Some(hint.unwrap_or(computed))
    }

    /// Number of retries handed out so far.
    #[must_use]
    pub const fn retries(&self) -> u32 {
        self.retries
    }

    fn base_backoff_ms(&self) -> u64 {
        #[allow(clippy::cast_possible_wrap)]
        let multiplier = self.backoff_multiplier.powi(self.retries as i32);
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let backoff = (self.initial_backoff_ms as f64 * multiplier) as u64;
        backoff.min(self.max_backoff_ms)
    }

    /// Random value in `[backoff * (1 - jitter), backoff * (1 + jitter)]`.
    fn apply_jitter(&self, backoff_ms: u64) -> u64 {
        if backoff_ms == 0 || self.jitter_factor <= 0.0 {
            return backoff_ms;
        }
        let jitter_range = backoff_ms as f64 * self.jitter_factor;
        let min = (backoff_ms as f64 - jitter_range).max(0.0);
        let max = backoff_ms as f64 + jitter_range;

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let jittered = rand::rng().random_range(min..=max) as u64;
        jittered
    }
}

/// How a failed response should be handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Transient failure; retry with backoff.
    Retryable,
    /// Permanent failure; give up.
    NonRetryable,
    /// Rate limited; retry after `Retry-After` when given.
    RateLimited,
}

/// Categorize an HTTP status code for retry decisions.
#[must_use]
pub const fn categorize_status(status_code: u16) -> ErrorCategory {
    match status_code {
        429 => ErrorCategory::RateLimited,
        408 | 500..=599 => ErrorCategory::Retryable,
        _ => ErrorCategory::NonRetryable,
    }
}

/// Parse a `Retry-After` header given in (possibly fractional) seconds.
#[must_use]
pub fn parse_retry_after(value: &str) -> Option<Duration> {
    let seconds: f64 = value.trim().parse().ok()?;
    Duration::try_from_secs_f64(seconds).ok()
}
