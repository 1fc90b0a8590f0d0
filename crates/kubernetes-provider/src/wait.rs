//! Polling for remote state transitions.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, instrument};

use provider_core::error::WaitError;
use provider_core::{Error, Result};

/// Default interval between refreshes.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// What a refresh observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Observed {
    /// The object no longer exists.
    Gone,
    /// The object exists in the given state.
    State(String),
}

/// Polls a refresh function until the object reaches a target state.
///
/// An empty target means the wait ends when the object is gone. Any state
/// that is neither pending nor target ends the wait with an error, as does
/// running past the timeout.
#[derive(Debug, Clone)]
pub struct StateWaiter {
    pending: Vec<String>,
    target: Vec<String>,
    timeout: Duration,
    poll_interval: Duration,
}

impl StateWaiter {
    pub fn new(pending: &[&str], target: &[&str], timeout: Duration) -> Self {
        Self {
            pending: pending.iter().map(|s| s.to_string()).collect(),
            target: target.iter().map(|s| s.to_string()).collect(),
            timeout,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    fn target_description(&self) -> String {
        if self.target.is_empty() {
            "deletion".to_string()
        } else {
            format!("{:?}", self.target)
        }
    }

    /// Refresh until the target is reached.
    ///
    /// Errors returned by `refresh` end the wait immediately.
    #[instrument(skip(self, refresh), fields(pending = ?self.pending, target = ?self.target))]
    pub async fn wait<F, Fut>(&self, mut refresh: F) -> Result<Observed>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<Observed>>,
    {
        let deadline = Instant::now() + self.timeout;

        loop {
            let observed = refresh().await?;
            let state = match &observed {
                Observed::Gone if self.target.is_empty() => return Ok(observed),
                Observed::Gone => "<gone>".to_string(),
                Observed::State(state) if self.target.contains(state) => return Ok(observed),
                Observed::State(state) => state.clone(),
            };

            if !self.pending.contains(&state) {
                return Err(Error::Wait(WaitError::UnexpectedState {
                    state,
                    target: self.target_description(),
                }));
            }

            let now = Instant::now();
            if now >= deadline {
                return Err(Error::Wait(WaitError::Timeout {
                    target: self.target_description(),
                    last_state: state,
                    timeout_secs: self.timeout.as_secs(),
                }));
            }

            debug!(%state, "Still pending");
            tokio::time::sleep(self.poll_interval.min(deadline - now)).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn deletion() -> StateWaiter {
        StateWaiter::new(&["Terminating"], &[], Duration::from_secs(300))
    }

    #[tokio::test(start_paused = true)]
    async fn waits_through_pending_until_gone() {
        let calls = AtomicU32::new(0);
        let start = Instant::now();

        let observed = deletion()
            .wait(|| {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n < 3 {
                        Ok(Observed::State("Terminating".to_string()))
                    } else {
                        Ok(Observed::Gone)
                    }
                }
            })
            .await
            .unwrap();

        assert_eq!(observed, Observed::Gone);
        assert_eq!(calls.load(Ordering::SeqCst), 4);
        assert_eq!(start.elapsed(), Duration::from_secs(6));
    }

    #[tokio::test(start_paused = true)]
    async fn times_out_when_stuck_pending() {
        let err = deletion()
            .wait(|| async { Ok(Observed::State("Terminating".to_string())) })
            .await
            .unwrap_err();

        match err {
            Error::Wait(WaitError::Timeout {
                last_state,
                timeout_secs,
                ..
            }) => {
                assert_eq!(last_state, "Terminating");
                assert_eq!(timeout_secs, 300);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn unexpected_state_fails_immediately() {
        let err = deletion()
            .wait(|| async { Ok(Observed::State("Active".to_string())) })
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            Error::Wait(WaitError::UnexpectedState { ref state, .. }) if state == "Active"
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn reaches_named_target() {
        let waiter = StateWaiter::new(&["Pending"], &["Active"], Duration::from_secs(10))
            .with_poll_interval(Duration::from_millis(100));

        let observed = waiter
            .wait(|| async { Ok(Observed::State("Active".to_string())) })
            .await
            .unwrap();
        assert_eq!(observed, Observed::State("Active".to_string()));
    }
}
