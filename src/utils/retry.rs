//! Retry utilities with fixed backoff for registry lookups.

use std::time::Duration;
use tokio::time::sleep;

use crate::sources::LookupError;

/// Configuration for retry behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryConfig {
    /// Maximum number of attempts, the first one included
    pub max_attempts: u32,
    /// Fixed delay between attempts
    pub delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 4,
            delay: Duration::from_secs(1),
        }
    }
}

impl RetryConfig {
    pub fn max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// Execute an async operation, retrying transient failures
///
/// Only errors for which [`LookupError::is_transient`] holds are retried;
/// anything else is returned from the attempt that produced it. When the
/// budget runs out the last transient error is replaced by
/// [`LookupError::Exhausted`].
pub async fn with_retry<T, F, Fut>(config: RetryConfig, operation: F) -> Result<T, LookupError>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, LookupError>>,
{
    let max_attempts = config.max_attempts.max(1);
    let mut attempts = 0;
    let mut operation = operation;

    loop {
        attempts += 1;

        match operation().await {
            Ok(result) => {
                if attempts > 1 {
                    tracing::info!(
                        "Lookup succeeded on attempt {} of {}",
                        attempts,
                        max_attempts
                    );
                }
                return Ok(result);
            }
            Err(error) if error.is_transient() => {
                if attempts >= max_attempts {
                    tracing::warn!("{} on final attempt {}", error, attempts);
                    return Err(LookupError::Exhausted {
                        attempts: max_attempts,
                    });
                }

                tracing::warn!(
                    "{}. Retrying, try {} of {}",
                    error,
                    attempts,
                    max_attempts
                );
                sleep(config.delay).await;
            }
            Err(error) => return Err(error),
        }
    }
}
