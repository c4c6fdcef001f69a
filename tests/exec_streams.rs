#![cfg(unix)]

mod common;
use crate::common::{executor, init_tracing, opts};

use runbound::exec::{CommandRunner, Severity};
use runbound_test_utils::sinks::Capture;
use runbound_test_utils::with_timeout;

#[tokio::test]
async fn silence_suppresses_sinks_but_not_logging() {
    init_tracing();
    let capture = Capture::new();
    let exec = executor(&capture);

    let result = with_timeout(exec.exec(
        "echo to-out; sleep 0.1; echo to-err >&2",
        &opts().silence(true),
    ))
    .await
    .unwrap();

    assert!(capture.stdout.contents().is_empty());
    assert!(capture.stderr.contents().is_empty());
    assert_eq!(result.output_lossy(), "to-out\nto-err\n");

    assert!(
        capture
            .log
            .at(Severity::Debug)
            .iter()
            .any(|m| m == "to-out\n")
    );
    assert!(
        capture
            .log
            .at(Severity::Warn)
            .iter()
            .any(|m| m == "to-err\n")
    );
}

#[tokio::test]
async fn header_emitted_on_each_origin_switch() {
    init_tracing();
    let capture = Capture::new();
    let exec = executor(&capture);

    with_timeout(exec.exec(
        "printf 'a\\n'; sleep 0.2; printf 'b\\n' >&2; sleep 0.2; printf 'c\\n'",
        &opts(),
    ))
    .await
    .unwrap();

    assert_eq!(capture.log.count_containing("[ STDOUT ]"), 2);
    assert_eq!(capture.log.count_containing("[ STDERR ]"), 1);

    // Headers share the level of the data they announce.
    let warn_headers = capture
        .log
        .at(Severity::Warn)
        .into_iter()
        .filter(|m| m.contains("[ STDERR ]"))
        .count();
    assert_eq!(warn_headers, 1);

    // Order: header, data, header, data, header, data.
    let stream_entries: Vec<String> = capture
        .log
        .entries()
        .into_iter()
        .map(|(_, m)| m)
        .filter(|m| m.contains("[ STDOUT ]") || m.contains("[ STDERR ]") || m.len() == 2)
        .collect();
    assert_eq!(stream_entries.len(), 6);
    assert!(stream_entries[0].contains("[ STDOUT ]"));
    assert_eq!(stream_entries[1], "a\n");
    assert!(stream_entries[2].contains("[ STDERR ]"));
    assert_eq!(stream_entries[3], "b\n");
    assert!(stream_entries[4].contains("[ STDOUT ]"));
    assert_eq!(stream_entries[5], "c\n");
}

#[tokio::test]
async fn consecutive_chunks_from_one_origin_share_a_header() {
    let capture = Capture::new();
    let exec = executor(&capture);

    with_timeout(exec.exec("echo first; sleep 0.2; echo second", &opts()))
        .await
        .unwrap();

    assert_eq!(capture.log.count_containing("[ STDOUT ]"), 1);
    assert_eq!(capture.log.count_containing("[ STDERR ]"), 0);
    assert_eq!(capture.stdout.contents_lossy(), "first\nsecond\n");
}

#[tokio::test]
async fn header_identifies_the_process() {
    let capture = Capture::new();
    let exec = executor(&capture);

    with_timeout(exec.exec("echo hi", &opts())).await.unwrap();

    let header = capture
        .log
        .entries()
        .into_iter()
        .map(|(_, m)| m)
        .find(|m| m.contains("[ STDOUT ]"))
        .expect("stdout header");
    assert!(header.contains('@'));
    assert!(header.contains("pid="));
}

#[tokio::test]
async fn run_is_framed_by_command_started_stopped_markers() {
    let capture = Capture::new();
    let exec = executor(&capture);

    with_timeout(exec.exec("true", &opts())).await.unwrap();

    let entries: Vec<String> = capture.log.entries().into_iter().map(|(_, m)| m).collect();
    let pos = |needle: &str| {
        entries
            .iter()
            .position(|m| m.contains(needle))
            .unwrap_or_else(|| panic!("missing {needle}"))
    };
    assert!(pos("[ COMMAND ]") < pos("[ STARTED ]"));
    assert!(pos("[ STARTED ]") < pos("[ STOPPED ]"));
    assert!(entries.iter().any(|m| m == "exit_code(0)"));
}

#[tokio::test]
async fn per_origin_sink_order_follows_read_order() {
    let capture = Capture::new();
    let exec = executor(&capture);

    with_timeout(exec.exec(
        "for i in 1 2 3; do echo out$i; echo err$i >&2; done",
        &opts(),
    ))
    .await
    .unwrap();

    assert_eq!(capture.stdout.contents_lossy(), "out1\nout2\nout3\n");
    assert_eq!(capture.stderr.contents_lossy(), "err1\nerr2\nerr3\n");
}
