//! Exponential-backoff retry for transient gateway failures.

use super::error::{classify, describe, GatewayError};
use crate::config::RetryConfig;
use crate::logging::{EventSink, GatewayEvent};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// Retry bounds, fixed at client construction and shared read-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the initial attempt.
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(1000),
            max_delay: Duration::from_millis(10_000),
        }
    }
}

impl RetryPolicy {
    /// Backoff slept before retry `retry` (0 for the first retry):
    /// `min(base_delay * 2^retry, max_delay)`.
    pub fn delay_for(&self, retry: u32) -> Duration {
        2u32.checked_pow(retry)
            .and_then(|factor| self.base_delay.checked_mul(factor))
            .map_or(self.max_delay, |delay| delay.min(self.max_delay))
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            base_delay: Duration::from_millis(config.base_delay_ms),
            max_delay: Duration::from_millis(config.max_delay_ms),
        }
    }
}

/// Runs an operation under a [`RetryPolicy`].
#[derive(Clone)]
pub struct RetryExecutor {
    policy: RetryPolicy,
    events: Arc<dyn EventSink>,
}

impl RetryExecutor {
    pub fn new(policy: RetryPolicy, events: Arc<dyn EventSink>) -> Self {
        Self { policy, events }
    }

    /// Run `op`, retrying retryable failures with exponential backoff.
    ///
    /// A non-retryable failure ends the loop immediately. The terminal error is
    /// always [`GatewayError::Operation`], labelled with `operation` and
    /// carrying the category of the last failure.
    pub async fn run<T, F, Fut>(&self, operation: &str, mut op: F) -> Result<T, GatewayError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, GatewayError>>,
    {
        let mut retry = 0u32;

        loop {
            let err = match op().await {
                Ok(value) => return Ok(value),
                Err(err) => err,
            };

            let category = classify(&err);
            let attempts = retry + 1;

            if !category.is_retryable() || retry >= self.policy.max_attempts {
                tracing::debug!(
                    operation = %operation,
                    category = %category,
                    attempts = attempts,
                    "Giving up on gateway operation"
                );
                return Err(GatewayError::Operation {
                    operation: operation.to_string(),
                    attempts,
                    category,
                    message: describe(&err),
                });
            }

            let delay = self.policy.delay_for(retry);
            self.events.emit(&GatewayEvent::RetryScheduled {
                operation: operation.to_string(),
                category,
                attempt: attempts,
                delay,
            });
            tokio::time::sleep(delay).await;
            retry += 1;
        }
    }
}
