#![allow(dead_code)]

use std::time::Duration;

use runbound::exec::{ExecOptions, LocalExecutor};
use runbound_test_utils::sinks::Capture;

pub use runbound_test_utils::init_tracing;

/// An executor wired to the in-memory sinks of `capture`.
pub fn executor(capture: &Capture) -> LocalExecutor {
    LocalExecutor::builder()
        .log_sink(capture.log_sink())
        .output_sinks(capture.output_sinks())
        .build()
        .expect("executor with a log sink must build")
}

/// Default options with a test-friendly deadline.
pub fn opts() -> ExecOptions {
    ExecOptions::default().with_timeout(Duration::from_secs(10))
}
