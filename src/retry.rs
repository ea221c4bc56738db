// src/retry.rs
// Generic retry-with-backoff utility. Kept outside the business logic so the
// policy (which errors retry, how long to wait) is testable on its own.

use std::future::Future;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total attempts including the first one.
    pub max_attempts: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 1_000,
            max_delay_ms: 30_000,
        }
    }
}

impl RetryPolicy {
    /// Delay slept after the given failed attempt (1-based): doubles each
    /// attempt starting from the base, capped at `max_delay_ms`.
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let exp = attempt.saturating_sub(1).min(63);
        let ms = self
            .base_delay_ms
            .saturating_mul(1u64 << exp)
            .min(self.max_delay_ms);
        Duration::from_millis(ms)
    }
}

/// Run `op` up to `policy.max_attempts` times, sleeping the backoff delay
/// between attempts whose error satisfies `is_retryable`. A non-retryable
/// error or an exhausted budget returns the last error.
pub async fn retry_with_backoff<T, E, F, Fut, P>(
    policy: &RetryPolicy,
    mut is_retryable: P,
    mut op: F,
) -> Result<T, E>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    P: FnMut(&E) -> bool,
    E: std::fmt::Display,
{
    let mut attempt = 1u32;
    loop {
        match op(attempt).await {
            Ok(value) => return Ok(value),
            Err(err) if attempt < policy.max_attempts && is_retryable(&err) => {
                let delay = policy.backoff_delay(attempt);
                debug!(attempt, delay_ms = delay.as_millis() as u64, error = %err, "retrying after backoff");
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}
