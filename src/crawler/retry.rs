//! Bounded retry with a fixed backoff
//!
//! Every network call site (collection pages, product pages, images) goes
//! through the same policy; only the attempt count and delay differ.

use crate::ScrapeError;
use std::future::Future;
use std::time::Duration;

/// Retry policy: a fixed number of attempts with a fixed delay between them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one
    pub max_attempts: u32,
    /// Delay between consecutive attempts
    pub backoff: Duration,
}

impl RetryPolicy {
    /// Creates a policy; `max_attempts` is raised to at least 1
    pub fn new(max_attempts: u32, backoff: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff,
        }
    }

    /// Runs `operation` until it succeeds or the attempts are used up
    ///
    /// The delay is only inserted between attempts, never after the last one.
    ///
    /// # Arguments
    ///
    /// * `target` - What is being fetched (used in log lines and the error)
    /// * `operation` - Produces a fresh future per attempt
    ///
    /// # Returns
    ///
    /// * `Ok(T)` - The first successful result
    /// * `Err(ScrapeError::RetriesExhausted)` - Every attempt failed; wraps the last error
    pub async fn run<T, F, Fut>(&self, target: &str, mut operation: F) -> Result<T, ScrapeError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ScrapeError>>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            let error = match operation().await {
                Ok(value) => return Ok(value),
                Err(e) => e,
            };

            if error.is_timeout() {
                tracing::warn!(
                    "Timeout fetching {}. Attempt {} of {}",
                    target,
                    attempt,
                    max_attempts
                );
            } else {
                tracing::warn!(
                    "Error fetching {}: {}. Attempt {} of {}",
                    target,
                    error,
                    attempt,
                    max_attempts
                );
            }

            if attempt >= max_attempts {
                tracing::warn!("Max retries reached for {}", target);
                return Err(ScrapeError::RetriesExhausted {
                    url: target.to_string(),
                    attempts: attempt,
                    source: Box::new(error),
                });
            }

            if !self.backoff.is_zero() {
                tokio::time::sleep(self.backoff).await;
            }
            attempt += 1;
        }
    }
}
