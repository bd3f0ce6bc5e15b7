//! Retry mechanism with exponential backoff
//!
//! Every live probe funnels its network call through a [`RetryPolicy`].
//! Policies are named presets over the same engine, differing only in
//! their configuration and retry condition.

use crate::utils::error::{ErrorClass, Result, ServiceError};
use std::future::Future;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Retry configuration
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Total attempts including the first
    pub max_attempts: u32,
    /// Delay before the second attempt
    pub base_delay: Duration,
    /// Ceiling for the computed backoff delay
    pub max_delay: Duration,
    /// Backoff multiplier
    pub backoff_multiplier: f64,
    /// Whether to add random jitter to delays
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(1000),
            max_delay: Duration::from_millis(10_000),
            backoff_multiplier: 2.0,
            jitter: true,
        }
    }
}

/// Outcome of running an operation under a retry policy
#[derive(Debug)]
pub struct RetryOutcome<T> {
    /// Final result: the first success, or the failure of the last attempt made
    pub result: Result<T>,
    /// Number of attempts actually made
    pub attempts: u32,
    /// Wall-clock time across all attempts and backoff sleeps
    pub total_duration: Duration,
}

impl<T> RetryOutcome<T> {
    /// Whether the operation eventually succeeded
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Predicate deciding whether a failure is worth another attempt
pub type RetryCondition = fn(&ServiceError) -> bool;

/// Retry engine: bounded exponential backoff with jitter and a
/// conditional short-circuit
pub struct RetryPolicy {
    config: RetryConfig,
    retry_on: RetryCondition,
}

impl RetryPolicy {
    /// Create a policy that retries unconditionally
    pub fn new(config: RetryConfig) -> Self {
        Self {
            config,
            retry_on: |_| true,
        }
    }

    /// Create a policy with an explicit retry condition
    pub fn with_condition(config: RetryConfig, retry_on: RetryCondition) -> Self {
        Self { config, retry_on }
    }

    /// Preset for outbound network probes: retries only transient
    /// network failures
    pub fn network_transient() -> Self {
        Self::with_condition(
            RetryConfig {
                max_attempts: 3,
                base_delay: Duration::from_millis(1000),
                max_delay: Duration::from_millis(10_000),
                backoff_multiplier: 2.0,
                jitter: true,
            },
            |e| e.is_transient(),
        )
    }

    /// Preset for expired-credential failures: one quick follow-up
    /// attempt after the caller has had a chance to refresh
    pub fn auth_token_expired() -> Self {
        Self::with_condition(
            RetryConfig {
                max_attempts: 2,
                base_delay: Duration::from_millis(500),
                max_delay: Duration::from_millis(2000),
                backoff_multiplier: 1.0,
                jitter: false,
            },
            |e| matches!(e.class(), ErrorClass::AuthExpired | ErrorClass::NetworkTransient),
        )
    }

    /// Preset for critical operations with no failure-specific handling
    pub fn generic_critical() -> Self {
        Self::new(RetryConfig {
            max_attempts: 2,
            base_delay: Duration::from_millis(1000),
            max_delay: Duration::from_millis(5000),
            backoff_multiplier: 2.0,
            jitter: true,
        })
    }

    /// Configuration in effect for this policy
    pub fn config(&self) -> &RetryConfig {
        &self.config
    }

    /// Execute an operation under this policy.
    ///
    /// Attempts are strictly sequential; no sleep occurs after the final
    /// attempt. A `max_attempts` of zero still runs the operation once.
    pub async fn run<T, F, Fut>(&self, mut operation: F) -> RetryOutcome<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let started = Instant::now();
        let mut attempt = 0u32;

        loop {
            attempt += 1;

            match operation().await {
                Ok(value) => {
                    if attempt > 1 {
                        debug!("Retry succeeded on attempt {}", attempt);
                    }
                    return RetryOutcome {
                        result: Ok(value),
                        attempts: attempt,
                        total_duration: started.elapsed(),
                    };
                }
                Err(error) => {
                    if attempt >= self.config.max_attempts {
                        warn!("Giving up after {} attempts: {}", attempt, error);
                        return RetryOutcome {
                            result: Err(error),
                            attempts: attempt,
                            total_duration: started.elapsed(),
                        };
                    }

                    if !(self.retry_on)(&error) {
                        debug!("Not retryable, stopping after attempt {}: {}", attempt, error);
                        return RetryOutcome {
                            result: Err(error),
                            attempts: attempt,
                            total_duration: started.elapsed(),
                        };
                    }

                    let delay = self.delay_for_attempt(attempt + 1);
                    debug!(
                        "Attempt {} failed: {}, retrying in {:?}",
                        attempt, error, delay
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    /// Delay to sleep before the given attempt, jitter applied
    fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let delay = backoff_delay(&self.config, attempt);
        if self.config.jitter {
            apply_jitter(delay)
        } else {
            delay
        }
    }
}

/// Deterministic exponential delay before attempt `n` (n >= 2):
/// `min(base * multiplier^(n-2), max)`
pub fn backoff_delay(config: &RetryConfig, attempt: u32) -> Duration {
    let exponent = attempt.saturating_sub(2);
    let factor = config.backoff_multiplier.powi(exponent as i32);
    let raw = config.base_delay.as_millis() as f64 * factor;
    let capped = raw.min(config.max_delay.as_millis() as f64);
    Duration::from_millis(capped.max(0.0) as u64)
}

/// Uniform ±25% jitter, so concurrent callers do not retry in lockstep
fn apply_jitter(delay: Duration) -> Duration {
    let factor = 1.0 + 0.25 * (rand::random::<f64>() * 2.0 - 1.0);
    Duration::from_millis((delay.as_millis() as f64 * factor).max(0.0) as u64)
}
