use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

/// How a failed attempt should be retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backoff {
    /// The service is overloaded (HTTP 503): exponential backoff
    Overloaded,
    /// Any other transient failure: linear backoff, no wait after the last attempt
    Transient,
    /// Retrying cannot help: fail immediately
    Fatal,
}

/// Configuration for retry behavior
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of attempts (including the first one)
    pub max_attempts: u32,
    /// Base delay for overload backoff: `overload_delay * 2^attempt`
    pub overload_delay: Duration,
    /// Step for transient-error backoff: `transient_delay * (attempt + 1)`
    pub transient_delay: Duration,
}

impl RetryConfig {
    /// Create a new retry configuration with the default delays
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            overload_delay: Duration::from_secs(5),
            transient_delay: Duration::from_secs(2),
        }
    }

    /// Set the base delay used when the service reports overload
    pub fn with_overload_delay(mut self, delay: Duration) -> Self {
        self.overload_delay = delay;
        self
    }

    /// Set the step used for other transient failures
    pub fn with_transient_delay(mut self, delay: Duration) -> Self {
        self.transient_delay = delay;
        self
    }

    /// Preset: translation service calls (3 attempts)
    /// Overload delays: 5s, 10s. Error delays: 2s, 4s.
    pub fn translation() -> Self {
        Self::new(3)
    }

    /// Calculate the wait after a failed attempt (0-indexed).
    ///
    /// `None` means give up now.
    fn delay_after(&self, backoff: Backoff, attempt: u32) -> Option<Duration> {
        if attempt + 1 >= self.max_attempts {
            return None;
        }
        match backoff {
            Backoff::Overloaded => Some(self.overload_delay * 2u32.saturating_pow(attempt)),
            Backoff::Transient => Some(self.transient_delay * (attempt + 1)),
            Backoff::Fatal => None,
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self::translation()
    }
}

/// Execute an async operation with retries, using `classify` to pick the backoff for each error
///
/// # Arguments
/// * `config` - Retry configuration (max_attempts must be >= 1)
/// * `operation_name` - Name of the operation for logging
/// * `operation` - Async closure that returns Result<T, E>
/// * `classify` - Maps an error to the backoff that applies to it
///
/// # Returns
/// The result of the operation, or the last error if all retries failed
///
/// # Panics
/// Panics if `config.max_attempts` is 0
pub async fn with_backoff<T, E, F, Fut, C>(
    config: &RetryConfig,
    operation_name: &str,
    mut operation: F,
    classify: C,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
    C: Fn(&E) -> Backoff,
{
    assert!(
        config.max_attempts >= 1,
        "RetryConfig.max_attempts must be >= 1, got {}",
        config.max_attempts
    );

    let mut attempt = 0;
    loop {
        match operation().await {
            Ok(result) => {
                if attempt > 0 {
                    debug!(
                        "{}: Succeeded on attempt {}/{}",
                        operation_name,
                        attempt + 1,
                        config.max_attempts
                    );
                }
                return Ok(result);
            }
            Err(e) => {
                let backoff = classify(&e);
                if backoff == Backoff::Fatal {
                    debug!(
                        "{}: Error is not retryable, failing immediately: {}",
                        operation_name, e
                    );
                    return Err(e);
                }

                let Some(delay) = config.delay_after(backoff, attempt) else {
                    warn!(
                        "{}: All {} attempts failed. Last error: {}",
                        operation_name, config.max_attempts, e
                    );
                    return Err(e);
                };

                warn!(
                    "{}: Attempt {}/{} failed ({}), retrying in {:?}",
                    operation_name,
                    attempt + 1,
                    config.max_attempts,
                    e,
                    delay
                );
                sleep(delay).await;
                attempt += 1;
            }
        }
    }
}
