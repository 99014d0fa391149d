//! Backoff retry policy for transient network failures.
//!
//! The default matches the behaviour this library inherited: a fixed
//! delay, retried without bound, until the operation succeeds or fails
//! with a non-retryable error. Callers that want a bound set
//! `max_retries`; callers that want growth set `multiplier`.

use std::time::Duration;

/// Configuration for the retry policy.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retry attempts (not counting the first try).
    /// `None` retries forever.
    pub max_retries: Option<u32>,
    /// Delay before the first retry.
    pub backoff: Duration,
    /// Multiplier applied to the delay on each retry (1.0 = fixed).
    pub multiplier: f64,
    /// Cap on the delay when `multiplier > 1.0`.
    pub max_backoff: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: None,
            backoff: Duration::from_millis(1000),
            multiplier: 1.0,
            max_backoff: Duration::from_secs(30),
        }
    }
}

impl RetryConfig {
    /// A bounded policy: `n` retries at a fixed `backoff`.
    pub fn bounded(n: u32, backoff: Duration) -> Self {
        Self {
            max_retries: Some(n),
            backoff,
            ..Self::default()
        }
    }

    /// A policy that never retries.
    pub fn none() -> Self {
        Self {
            max_retries: Some(0),
            ..Self::default()
        }
    }
}

/// Stateless retry policy — computes the next delay given the attempt number.
#[derive(Debug, Clone, Default)]
pub struct RetryPolicy {
    pub config: RetryConfig,
}

impl RetryPolicy {
    pub fn new(config: RetryConfig) -> Self {
        Self { config }
    }

    /// Returns the delay before the `attempt`-th retry (1-based), or
    /// `None` once `attempt` exceeds `max_retries`.
    pub fn next_delay(&self, attempt: u32) -> Option<Duration> {
        if let Some(max) = self.config.max_retries {
            if attempt > max {
                return None;
            }
        }
        let base_ms = self.config.backoff.as_millis() as f64
            * self.config.multiplier.powi(attempt.saturating_sub(1) as i32);
        let capped = base_ms.min(self.config.max_backoff.as_millis() as f64);
        Some(Duration::from_millis(capped as u64))
    }
}
