// src/exec/deadline.rs

//! The wall-clock bound of one execution.
//!
//! A [`Deadline`] is fixed once when the pump loop starts. Everything that
//! can block afterwards (pipe reads, sink writes, the final wait for the
//! exit status) races against the same instant.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;

use crate::errors::{Result, RunboundError};

// Instant arithmetic panics on overflow; absurd timeouts are clamped to this.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline {
    at: Instant,
    timeout: Duration,
}

impl Deadline {
    /// A deadline `timeout` from now.
    pub fn after(timeout: Duration) -> Self {
        let now = Instant::now();
        let at = now.checked_add(timeout).unwrap_or(now + FAR_FUTURE);
        Self { at, timeout }
    }

    pub fn instant(&self) -> Instant {
        self.at
    }

    /// The configured timeout, as reported in [`RunboundError::Timeout`].
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn expired(&self) -> RunboundError {
        RunboundError::Timeout {
            timeout: self.timeout,
        }
    }

    /// Await `fut`, failing with a timeout if the deadline passes first.
    pub async fn bound<T, F>(&self, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        match tokio::time::timeout_at(self.at, fut).await {
            Ok(res) => res,
            Err(_) => Err(self.expired()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn bound_passes_through_work_that_finishes_in_time() {
        let deadline = Deadline::after(Duration::from_secs(5));
        let value = deadline
            .bound(async {
                tokio::time::sleep(Duration::from_secs(1)).await;
                Ok(7)
            })
            .await
            .unwrap();
        assert_eq!(value, 7);
    }

    #[tokio::test(start_paused = true)]
    async fn bound_cuts_off_work_that_never_finishes() {
        let deadline = Deadline::after(Duration::from_millis(250));
        let err = deadline
            .bound(std::future::pending::<Result<()>>())
            .await
            .unwrap_err();
        match err {
            RunboundError::Timeout { timeout } => {
                assert_eq!(timeout, Duration::from_millis(250))
            }
            other => panic!("expected Timeout, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn inner_failures_are_not_masked() {
        let deadline = Deadline::after(Duration::from_secs(1));
        let err = deadline
            .bound(async { Err::<(), _>(RunboundError::Usage("bad".into())) })
            .await
            .unwrap_err();
        assert!(matches!(err, RunboundError::Usage(_)));
    }

    #[test]
    fn huge_timeouts_do_not_overflow() {
        let deadline = Deadline::after(Duration::MAX);
        assert_eq!(deadline.timeout(), Duration::MAX);
        assert!(deadline.instant() > Instant::now());
    }
}
