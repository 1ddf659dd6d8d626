use std::future::Future;
use std::time::Duration;

use anyhow::Result;
use tracing::{error, info, warn};

/// Bounded retry with exponential backoff.
///
/// After failed attempt `n` (1-based) the delay is
/// `initial_delay * multiplier^(n-1)`, capped at `max_delay`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub multiplier: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 4,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(10),
            multiplier: 2,
        }
    }
}

impl RetryPolicy {
    /// A policy that tries exactly once.
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Total attempts made before giving up; never less than one.
    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }

    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1);
        self.multiplier
            .checked_pow(exponent)
            .and_then(|factor| self.initial_delay.checked_mul(factor))
            .unwrap_or(self.max_delay)
            .min(self.max_delay)
    }

    /// Run `op` until it succeeds or the attempts are used up, sleeping
    /// between failures. Returns the last error on exhaustion.
    pub async fn run<T, F, Fut>(&self, operation: &str, mut op: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let max_attempts = self.attempts();
        let mut attempt = 0u32;

        loop {
            attempt += 1;
            match op().await {
                Ok(value) => {
                    if attempt > 1 {
                        info!(operation, attempts = attempt, "succeeded after retry");
                    }
                    return Ok(value);
                }
                Err(e) if attempt < max_attempts => {
                    let delay = self.delay_for_attempt(attempt);
                    warn!(
                        operation,
                        attempt,
                        max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "attempt failed, retrying with backoff"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => {
                    error!(operation, attempts = attempt, error = %e, "giving up after max attempts");
                    return Err(e);
                }
            }
        }
    }
}
