//! Bounded exponential back-off for upstream calls.
//!
//! Delays grow as `initial × factor^n` with no jitter, so consecutive waits
//! are strictly increasing as long as `factor > 1` (enforced by config
//! validation). Only transient errors are retried; anything else returns
//! immediately.

use std::future::Future;
use std::time::Duration;

use cg_domain::config::RetryConfig;
use cg_domain::error::{Error, Result};
use cg_domain::trace::TraceEvent;

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub max_attempts: u32,
    pub initial_delay: Duration,
    pub backoff_factor: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&RetryConfig::default())
    }
}

impl RetryPolicy {
    pub fn from_config(cfg: &RetryConfig) -> Self {
        Self {
            max_attempts: cfg.max_attempts.max(1),
            initial_delay: Duration::from_millis(cfg.initial_backoff_ms),
            backoff_factor: cfg.backoff_factor,
        }
    }

    /// Delay before retry number `retry` (0-indexed: the wait after the
    /// first failed attempt is `delay_for_retry(0)`).
    pub fn delay_for_retry(&self, retry: u32) -> Duration {
        let base_ms = self.initial_delay.as_millis().max(1) as f64;
        let delay_ms = base_ms * self.backoff_factor.powi(retry as i32);
        Duration::from_millis(delay_ms.round() as u64)
    }
}

/// Run `op` until it succeeds, fails permanently, or `policy.max_attempts`
/// transient failures have happened. `op` receives the 1-based attempt number.
///
/// Exhausting the attempts yields [`Error::RetriesExhausted`].
pub async fn retry_with_backoff<T, F, Fut>(service: &str, policy: &RetryPolicy, mut op: F) -> Result<T>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let max = policy.max_attempts.max(1);
    let mut attempt = 1;
    loop {
        match op(attempt).await {
            Ok(value) => return Ok(value),
            Err(e) if !e.is_transient() => return Err(e),
            Err(e) if attempt >= max => {
                tracing::warn!(service, attempts = attempt, error = %e, "retries exhausted");
                return Err(Error::RetriesExhausted {
                    service: service.to_owned(),
                    attempts: attempt,
                });
            }
            Err(e) => {
                let delay = policy.delay_for_retry(attempt - 1);
                TraceEvent::GenerationRetry {
                    service: service.to_owned(),
                    attempt,
                    delay_ms: delay.as_millis() as u64,
                    reason: e.to_string(),
                }
                .emit();
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}
