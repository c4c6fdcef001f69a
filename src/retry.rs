// src/retry.rs

//! Bounded retry with a fixed delay.
//!
//! [`retry`] re-runs a unit of work from the start whenever it fails with an
//! enrolled [`FailureClass`], up to `tries` attempts in total. Failures of
//! other classes are returned straight away, and once attempts run out the
//! last failure is returned unchanged.

use std::future::Future;
use std::time::Duration;

use crate::errors::{Result, RunboundError, logged};
use crate::exec::{LogSink, Severity};
use crate::types::{FailureClass, RetryOn};

/// How many times to try, what to catch and how long to wait in between.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts, including the first. Must be at least 1.
    pub tries: u32,
    pub on: RetryOn,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            tries: 1,
            on: RetryOn::Any,
            delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    pub fn new(tries: u32) -> Self {
        Self {
            tries,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn on(mut self, classes: impl IntoIterator<Item = FailureClass>) -> Self {
        self.on = RetryOn::Only(classes.into_iter().collect());
        self
    }

    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// Run `work`, retrying enrolled failures according to `policy`.
pub async fn retry<T, F, Fut>(policy: &RetryPolicy, log: &dyn LogSink, mut work: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    log.log(Severity::Debug, &format!("options={policy:?}"));

    if policy.tries == 0 {
        return Err(logged(
            log,
            RunboundError::Usage("retry policy needs at least one try".to_string()),
        ));
    }

    let mut remaining = policy.tries;
    loop {
        let err = match work().await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };

        if !policy.on.matches(err.class()) {
            return Err(err);
        }

        remaining -= 1;
        if remaining == 0 {
            log.log(
                Severity::Fatal,
                &format!(
                    "Caught {err:?} and we have no more tries left, sorry, we have to give up now."
                ),
            );
            return Err(err);
        }

        log.log(
            Severity::Warn,
            &format!(
                "Caught {err:?}, we will give it {remaining} more {}.",
                if remaining > 1 { "tries" } else { "try" }
            ),
        );
        tokio::time::sleep(policy.delay).await;
    }
}
