//! Fixed-budget retry for the IMS token exchange.

use std::future::Future;
use std::time::Duration;

use tracing::{debug, warn};

use provider_core::Error;

/// Retries an operation a fixed number of times with a fixed delay.
///
/// Every failure consumes one attempt. The delay is constant: no jitter and
/// no exponential growth. There is no sleep after the final attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    attempts: u32,
    delay: Duration,
}

/// The retry budget ran out.
#[derive(Debug)]
pub struct Exhausted {
    /// How many attempts were made.
    pub attempts: u32,
    /// The error from the final attempt.
    pub last_error: Error,
}

impl RetryPolicy {
    pub const DEFAULT_ATTEMPTS: u32 = 10;
    pub const DEFAULT_DELAY: Duration = Duration::from_secs(1);

    /// A policy making at most `attempts` attempts (at least one).
    pub fn new(attempts: u32, delay: Duration) -> Self {
        Self {
            attempts: attempts.max(1),
            delay,
        }
    }

    /// The same attempt budget with a different delay.
    pub fn with_delay(self, delay: Duration) -> Self {
        Self { delay, ..self }
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Run `op` until it succeeds or the budget is exhausted.
    ///
    /// `op` receives the 1-based attempt number.
    pub async fn run<T, F, Fut>(&self, what: &str, mut op: F) -> Result<T, Exhausted>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, Error>>,
    {
        let mut attempt = 1;
        loop {
            match op(attempt).await {
                Ok(value) => {
                    debug!(attempt, "{what} succeeded");
                    return Ok(value);
                }
                Err(last_error) if attempt >= self.attempts => {
                    warn!(attempt, error = %last_error, "{what} failed, giving up");
                    return Err(Exhausted {
                        attempts: attempt,
                        last_error,
                    });
                }
                Err(e) => {
                    warn!(attempt, error = %e, "{what} failed, retrying");
                    tokio::time::sleep(self.delay).await;
                    attempt += 1;
                }
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_ATTEMPTS, Self::DEFAULT_DELAY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    use provider_core::error::AuthError;

    fn empty() -> Error {
        AuthError::EmptyToken { field: "ims_token" }.into()
    }

    #[test]
    fn default_budget_is_ten_by_one_second() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.attempts(), 10);
        assert_eq!(policy.delay(), Duration::from_secs(1));
    }

    #[test]
    fn zero_attempts_clamped_to_one() {
        assert_eq!(RetryPolicy::new(0, Duration::ZERO).attempts(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn first_attempt_success_does_not_sleep() {
        let start = tokio::time::Instant::now();
        let calls = AtomicU32::new(0);

        let value = RetryPolicy::default()
            .run("op", |_| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Ok::<_, Error>("token") }
            })
            .await
            .unwrap();

        assert_eq!(value, "token");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn succeeds_on_last_attempt() {
        let start = tokio::time::Instant::now();

        let value = RetryPolicy::default()
            .run("op", |attempt| async move {
                if attempt < 10 { Err(empty()) } else { Ok(attempt) }
            })
            .await
            .unwrap();

        assert_eq!(value, 10);
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_secs(9) && elapsed < Duration::from_secs(10));
    }

    #[tokio::test(start_paused = true)]
    async fn exhausts_after_exactly_ten_attempts() {
        let start = tokio::time::Instant::now();
        let calls = AtomicU32::new(0);

        let err = RetryPolicy::default()
            .run("op", |_| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err::<(), _>(empty()) }
            })
            .await
            .unwrap_err();

        assert_eq!(err.attempts, 10);
        assert_eq!(calls.load(Ordering::SeqCst), 10);
        assert!(err.last_error.to_string().contains("ims_token"));
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_secs(9) && elapsed < Duration::from_secs(10));
    }
}
