//! Bounded retry with exponential backoff.
//!
//! A logical request is retried as a whole (sign, send, decode). Only
//! errors that report [`crate::CoinPaymentsError::is_retryable`] trigger another
//! attempt; remote and client-side rejections return immediately.

use std::future::Future;
use std::time::Duration;

use crate::constants::DEFAULT_MAX_ATTEMPTS;
use crate::error::Result;

/// Attempt budget and delay schedule for one logical request.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts, first try included. Values below 1 are treated as 1.
    pub max_attempts: u32,
    /// Delay before the second attempt.
    pub initial_delay: Duration,
    /// Upper bound on any single delay.
    pub max_delay: Duration,
    /// Growth factor applied per attempt.
    pub backoff_multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            initial_delay: Duration::from_millis(200),
            max_delay: Duration::from_secs(2),
            backoff_multiplier: 2.0,
        }
    }
}

impl RetryPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Retry back to back with no delay.
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            initial_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            backoff_multiplier: 1.0,
        }
    }

    pub fn with_max_attempts(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            ..Self::default()
        }
    }

    /// Delay to wait after the given zero-based failed attempt.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
        let millis = self.initial_delay.as_millis() as f64 * self.backoff_multiplier.powi(exponent);
        if !millis.is_finite() || millis < 0.0 {
            return self.max_delay;
        }
        Duration::from_millis(millis as u64).min(self.max_delay)
    }

    fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }
}

/// Run `operation` until it succeeds, fails with a non-retryable error, or
/// the attempt budget is spent. The last error is returned on exhaustion.
pub async fn retry_with_backoff<F, Fut, T>(policy: &RetryPolicy, mut operation: F) -> Result<T>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let attempts = policy.attempts();
    let mut attempt = 0;

    loop {
        match operation(attempt).await {
            Ok(value) => {
                if attempt > 0 {
                    tracing::info!(attempt = attempt + 1, "request succeeded after retry");
                }
                return Ok(value);
            }
            Err(error) if error.is_retryable() && attempt + 1 < attempts => {
                tracing::warn!(
                    attempt = attempt + 1,
                    max_attempts = attempts,
                    error = %error,
                    "request attempt failed, retrying"
                );
                let delay = policy.delay_for_attempt(attempt);
                if !delay.is_zero() {
                    tracing::debug!(delay_ms = delay.as_millis() as u64, "sleeping before retry");
                    tokio::time::sleep(delay).await;
                }
                attempt += 1;
            }
            Err(error) => {
                if error.is_retryable() {
                    tracing::warn!(attempts, error = %error, "request failed, attempts exhausted");
                }
                return Err(error);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoinPaymentsError;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn transient() -> CoinPaymentsError {
        CoinPaymentsError::Status {
            status: 503,
            body: String::new(),
        }
    }

    #[test]
    fn test_delay_schedule_is_capped() {
        let policy = RetryPolicy {
            max_attempts: 5,
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_millis(300),
            backoff_multiplier: 2.0,
        };
        assert_eq!(policy.delay_for_attempt(0), Duration::from_millis(100));
        assert_eq!(policy.delay_for_attempt(1), Duration::from_millis(200));
        assert_eq!(policy.delay_for_attempt(2), Duration::from_millis(300));
        assert_eq!(policy.delay_for_attempt(30), Duration::from_millis(300));
    }

    #[test]
    fn test_default_budget_is_three() {
        assert_eq!(RetryPolicy::default().max_attempts, 3);
    }

    #[tokio::test]
    async fn test_succeeds_on_third_attempt() {
        let calls = AtomicU32::new(0);
        let result = retry_with_backoff(&RetryPolicy::immediate(3), |_| {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err(transient())
                } else {
                    Ok(n)
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_exhaustion_returns_last_error() {
        let calls = AtomicU32::new(0);
        let result: Result<()> = retry_with_backoff(&RetryPolicy::immediate(3), |attempt| {
            calls.fetch_add(1, Ordering::SeqCst);
            async move {
                Err(CoinPaymentsError::Status {
                    status: 500 + attempt as u16,
                    body: String::new(),
                })
            }
        })
        .await;
        assert!(matches!(result, Err(CoinPaymentsError::Status { status: 502, .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_remote_error_is_not_retried() {
        let calls = AtomicU32::new(0);
        let result: Result<()> = retry_with_backoff(&RetryPolicy::immediate(3), |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(CoinPaymentsError::Remote("Invalid command".to_string())) }
        })
        .await;
        assert!(matches!(result, Err(CoinPaymentsError::Remote(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_zero_attempts_still_tries_once() {
        let calls = AtomicU32::new(0);
        let result: Result<()> = retry_with_backoff(&RetryPolicy::immediate(0), |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(transient()) }
        })
        .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
