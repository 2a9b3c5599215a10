use crate::error::{GhReleaseError, Result};
use backoff::future::retry;
use backoff::ExponentialBackoff;
use std::time::Duration;
use tracing::{info, warn};

/// Configuration for retry behavior
#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub initial_interval: Duration,
    pub max_interval: Duration,
    /// Extra wall-clock bound. `None` leaves `max_retries` as the only cap.
    pub max_elapsed_time: Option<Duration>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_interval: Duration::from_secs(1),
            max_interval: Duration::from_secs(30),
            max_elapsed_time: None,
        }
    }
}

impl RetryConfig {
    /// Default intervals with a custom retry cap
    pub fn with_max_retries(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Default::default()
        }
    }

    /// Create an exponential backoff from this configuration
    pub fn to_backoff(&self) -> ExponentialBackoff {
        ExponentialBackoff {
            initial_interval: self.initial_interval,
            max_interval: self.max_interval,
            max_elapsed_time: self.max_elapsed_time,
            ..Default::default()
        }
    }
}

/// Execute an async operation, retrying only the errors `is_retryable` accepts.
///
/// Every other error is returned on its first occurrence.
pub async fn with_retry<F, Fut, T, P>(
    operation_name: &str,
    config: &RetryConfig,
    is_retryable: P,
    mut operation: F,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T>>,
    P: Fn(&GhReleaseError) -> bool,
{
    let backoff = config.to_backoff();
    let is_retryable = &is_retryable;
    let mut attempt = 0;

    retry(backoff, || {
        attempt += 1;
        let op = operation();

        async move {
            match op.await {
                Ok(result) => {
                    if attempt > 1 {
                        info!("{} succeeded on attempt {}", operation_name, attempt);
                    }
                    Ok(result)
                }
                Err(e) if !is_retryable(&e) => Err(backoff::Error::permanent(e)),
                Err(e) => {
                    if attempt <= config.max_retries {
                        warn!(
                            "{} failed on attempt {} of {}: {}. Retrying...",
                            operation_name,
                            attempt,
                            config.max_retries + 1,
                            e
                        );
                        Err(backoff::Error::transient(e))
                    } else {
                        warn!(
                            "{} failed after {} attempts: {}",
                            operation_name, attempt, e
                        );
                        Err(backoff::Error::permanent(e))
                    }
                }
            }
        }
    })
    .await
}
