// src/exec/multiplex.rs

//! Concurrent draining of the child's stdout and stderr.
//!
//! Both pipes and the deadline timer are awaited in a single `select!`, so
//! whichever stream becomes readable first is forwarded first. Forwarding
//! races the same deadline, so a stalled output sink cannot hold the run
//! past it. Each chunk is:
//! - preceded by an origin header when the origin differs from the previous
//!   chunk's,
//! - written to the matching output sink unless silenced,
//! - logged (stdout at debug, stderr at warn),
//! - appended to the combined output buffer.

use tokio::io::{AsyncRead, AsyncReadExt};

use crate::errors::Result;
use crate::exec::deadline::Deadline;
use crate::exec::sink::{LogSink, OutputSinks, Severity};

const READ_CHUNK: usize = 8 * 1024;

/// Which child stream a chunk came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Origin {
    Stdout,
    Stderr,
}

impl Origin {
    pub fn label(self) -> &'static str {
        match self {
            Origin::Stdout => "STDOUT",
            Origin::Stderr => "STDERR",
        }
    }

    /// Log level used for this origin's data and headers.
    pub fn severity(self) -> Severity {
        match self {
            Origin::Stdout => Severity::Debug,
            Origin::Stderr => Severity::Warn,
        }
    }
}

/// Remembers the origin of the previous chunk so a header is only emitted
/// when the stream switches.
#[derive(Debug, Default, Clone)]
pub struct HeaderTracker {
    last: Option<Origin>,
}

impl HeaderTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a chunk from `origin`; true when a header should precede it.
    pub fn switch_to(&mut self, origin: Origin) -> bool {
        let switched = self.last != Some(origin);
        self.last = Some(origin);
        switched
    }
}

/// Section header written to the log around and inside a run.
pub fn log_header(what: &str, tag: &str) -> String {
    let sep = "=".repeat(8);
    format!("{sep}[ {what} ]{sep}[ {tag} ]{sep}[ {what} ]{sep}\n")
}

pub struct Multiplexer<'a> {
    log: &'a dyn LogSink,
    sinks: &'a OutputSinks,
    tag: &'a str,
    silence: bool,
    headers: HeaderTracker,
    output: Vec<u8>,
}

impl<'a> Multiplexer<'a> {
    pub fn new(log: &'a dyn LogSink, sinks: &'a OutputSinks, tag: &'a str, silence: bool) -> Self {
        Self {
            log,
            sinks,
            tag,
            silence,
            headers: HeaderTracker::new(),
            output: Vec::new(),
        }
    }

    /// Pump both readers until each reports EOF, returning the combined
    /// output. Fails with [`RunboundError::Timeout`](crate::errors::RunboundError::Timeout)
    /// if `deadline` passes first.
    pub async fn run<O, E>(mut self, mut stdout: O, mut stderr: E, deadline: Deadline) -> Result<Vec<u8>>
    where
        O: AsyncRead + Unpin,
        E: AsyncRead + Unpin,
    {
        let expired = tokio::time::sleep_until(deadline.instant());
        tokio::pin!(expired);

        let mut out_buf = vec![0u8; READ_CHUNK];
        let mut err_buf = vec![0u8; READ_CHUNK];
        let mut stdout_open = true;
        let mut stderr_open = true;

        while stdout_open || stderr_open {
            tokio::select! {
                read = stdout.read(&mut out_buf), if stdout_open => {
                    match read? {
                        0 => stdout_open = false,
                        n => deadline.bound(self.forward(Origin::Stdout, &out_buf[..n])).await?,
                    }
                }
                read = stderr.read(&mut err_buf), if stderr_open => {
                    match read? {
                        0 => stderr_open = false,
                        n => deadline.bound(self.forward(Origin::Stderr, &err_buf[..n])).await?,
                    }
                }
                () = &mut expired => {
                    return Err(deadline.expired());
                }
            }
        }

        Ok(self.output)
    }

    async fn forward(&mut self, origin: Origin, data: &[u8]) -> Result<()> {
        let severity = origin.severity();

        if self.headers.switch_to(origin) {
            self.log
                .direct(severity, log_header(origin.label(), self.tag).as_bytes());
        }

        if !self.silence {
            match origin {
                Origin::Stdout => self.sinks.write_stdout(data).await?,
                Origin::Stderr => self.sinks.write_stderr(data).await?,
            }
        }

        self.log.direct(severity, data);
        self.output.extend_from_slice(data);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_chunk_always_gets_a_header() {
        let mut t = HeaderTracker::new();
        assert!(t.switch_to(Origin::Stderr));
    }

    #[test]
    fn header_only_on_origin_switch() {
        let mut t = HeaderTracker::new();
        let seq = [
            Origin::Stdout,
            Origin::Stdout,
            Origin::Stderr,
            Origin::Stderr,
            Origin::Stdout,
        ];
        let headers: Vec<bool> = seq.iter().map(|o| t.switch_to(*o)).collect();
        assert_eq!(headers, vec![true, false, true, false, true]);
    }

    #[test]
    fn header_names_origin_and_tag() {
        let h = log_header("STDERR", "deploy@build-01 pid=42");
        assert!(h.starts_with("========[ STDERR ]========"));
        assert!(h.contains("[ deploy@build-01 pid=42 ]"));
        assert!(h.ends_with("========\n"));
    }
}
