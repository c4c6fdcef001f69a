mod common;
use crate::common::{executor, opts};

use std::time::Duration;

use tokio::time::Instant;

use runbound::errors::RunboundError;
use runbound::exec::{CommandRunner, Severity};
use runbound::retry::{RetryPolicy, retry};
use runbound::types::FailureClass;
use runbound_test_utils::fake_runner::FlakyRunner;
use runbound_test_utils::sinks::{Capture, MemoryLogSink};

#[tokio::test(start_paused = true)]
async fn succeeds_on_third_try_after_two_delays() {
    let log = MemoryLogSink::new();
    let runner = FlakyRunner::new(2, FailureClass::Timeout);
    let policy = RetryPolicy::new(3).with_delay(Duration::from_secs(1));
    let options = opts();

    let started = Instant::now();
    let result = retry(&policy, &log, || runner.exec("echo ok", &options))
        .await
        .expect("third attempt succeeds");
    let elapsed = started.elapsed();

    assert_eq!(result.output, b"echo ok");
    assert_eq!(runner.calls(), 3);
    assert!(elapsed >= Duration::from_secs(2), "elapsed {elapsed:?}");
    assert!(elapsed < Duration::from_millis(2100), "elapsed {elapsed:?}");

    let warnings = log.at(Severity::Warn);
    assert_eq!(warnings.len(), 2);
    assert!(warnings[0].contains("2 more tries"));
    assert!(warnings[1].contains("1 more try."));
    assert!(log.at(Severity::Fatal).is_empty());
}

#[tokio::test(start_paused = true)]
async fn non_enrolled_failure_is_not_retried() {
    let log = MemoryLogSink::new();
    let runner = FlakyRunner::new(10, FailureClass::ExitStatus);
    let policy = RetryPolicy::new(2)
        .on([FailureClass::Timeout])
        .with_delay(Duration::from_secs(5));
    let options = opts();

    let started = Instant::now();
    let err = retry(&policy, &log, || runner.exec("exit 1", &options))
        .await
        .expect_err("exit status is not enrolled");

    assert!(matches!(err, RunboundError::ExitStatus { .. }));
    assert_eq!(runner.calls(), 1);
    assert_eq!(started.elapsed(), Duration::ZERO);
    assert!(log.at(Severity::Warn).is_empty());
}

#[tokio::test(start_paused = true)]
async fn exhausted_attempts_return_the_last_failure() {
    let log = MemoryLogSink::new();
    let runner = FlakyRunner::new(10, FailureClass::Timeout);
    let policy = RetryPolicy::new(3)
        .on([FailureClass::Timeout, FailureClass::ExitStatus])
        .with_delay(Duration::from_millis(250));
    let options = opts();

    let err = retry(&policy, &log, || runner.exec("sleep 99", &options))
        .await
        .expect_err("never succeeds");

    match err {
        RunboundError::Timeout { timeout } => assert_eq!(timeout, options.timeout),
        other => panic!("expected the caught Timeout, got {other:?}"),
    }
    assert_eq!(runner.calls(), 3);

    let fatal = log.at(Severity::Fatal);
    assert_eq!(fatal.len(), 1);
    assert!(fatal[0].contains("no more tries left"));
}

#[tokio::test(start_paused = true)]
async fn single_try_never_sleeps() {
    let log = MemoryLogSink::new();
    let runner = FlakyRunner::new(1, FailureClass::Io);
    let policy = RetryPolicy::default();
    let options = opts();

    let started = Instant::now();
    let err = retry(&policy, &log, || runner.exec("x", &options))
        .await
        .unwrap_err();

    assert!(matches!(err, RunboundError::Io(_)));
    assert_eq!(runner.calls(), 1);
    assert_eq!(started.elapsed(), Duration::ZERO);
}

#[tokio::test]
async fn zero_tries_is_a_usage_failure() {
    let log = MemoryLogSink::new();
    let runner = FlakyRunner::new(0, FailureClass::Timeout);
    let policy = RetryPolicy::new(0);
    let options = opts();

    let err = retry(&policy, &log, || runner.exec("echo", &options))
        .await
        .unwrap_err();

    assert!(matches!(err, RunboundError::Usage(_)));
    assert_eq!(runner.calls(), 0);
    assert_eq!(log.count_containing("EXCEPTION: usage"), 1);
}

#[cfg(unix)]
#[tokio::test]
async fn retries_a_real_command_until_it_passes() {
    let capture = Capture::new();
    let exec = executor(&capture);
    let dir = tempfile::tempdir().unwrap();
    let marker = dir.path().join("marker");

    let command = format!(
        "if [ -f {m} ]; then echo second; else touch {m}; echo first >&2; exit 1; fi",
        m = marker.display()
    );
    let policy = RetryPolicy::new(2)
        .on([FailureClass::ExitStatus])
        .with_delay(Duration::ZERO);
    let options = opts();

    let result = retry(&policy, &capture.log, || exec.exec(&command, &options))
        .await
        .expect("second attempt passes");

    assert_eq!(result.output_lossy(), "second\n");
    assert_eq!(capture.stderr.contents_lossy(), "first\n");
    assert_eq!(capture.log.count_containing("EXCEPTION: exit_status"), 1);
}
