// src/exec/sink.rs

//! Logging and output sinks supplied by the caller.
//!
//! The executor never talks to a global logger. It receives:
//! - a [`LogSink`] for leveled log entries and raw stream data, and
//! - an [`OutputSinks`] pair of byte destinations for live stdout/stderr.
//!
//! Level filtering is the sink's business. [`TracingLogSink`] forwards
//! everything to `tracing` and lets the installed subscriber decide.

use std::fmt;
use std::pin::Pin;

use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::Mutex;

/// Severity of a log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Debug,
    Info,
    Warn,
    Error,
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::Debug => "DEBUG",
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
            Severity::Fatal => "FATAL",
        };
        f.write_str(s)
    }
}

/// Leveled logging destination.
pub trait LogSink: Send + Sync {
    /// Record a structured log message.
    fn log(&self, severity: Severity, message: &str);

    /// Record raw data (stream chunks, section headers) verbatim.
    fn direct(&self, severity: Severity, data: &[u8]) {
        self.log(severity, &String::from_utf8_lossy(data));
    }
}

/// [`LogSink`] backed by the global `tracing` subscriber.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogSink;

impl LogSink for TracingLogSink {
    fn log(&self, severity: Severity, message: &str) {
        match severity {
            Severity::Debug => tracing::debug!("{message}"),
            Severity::Info => tracing::info!("{message}"),
            Severity::Warn => tracing::warn!("{message}"),
            Severity::Error => tracing::error!("{message}"),
            Severity::Fatal => tracing::error!(fatal = true, "{message}"),
        }
    }

    fn direct(&self, severity: Severity, data: &[u8]) {
        let text = String::from_utf8_lossy(data);
        let text = text.trim_end_matches('\n');
        match severity {
            Severity::Debug => tracing::debug!(target: "runbound::direct", "{text}"),
            Severity::Info => tracing::info!(target: "runbound::direct", "{text}"),
            Severity::Warn => tracing::warn!(target: "runbound::direct", "{text}"),
            Severity::Error => tracing::error!(target: "runbound::direct", "{text}"),
            Severity::Fatal => {
                tracing::error!(target: "runbound::direct", fatal = true, "{text}")
            }
        }
    }
}

type BoxedWriter = Pin<Box<dyn AsyncWrite + Send>>;

/// The stdout-like and stderr-like destinations for live child output.
///
/// Each destination sits behind its own lock, so executors sharing one
/// `OutputSinks` serialize individual chunk writes but never whole runs.
pub struct OutputSinks {
    stdout: Mutex<BoxedWriter>,
    stderr: Mutex<BoxedWriter>,
}

impl OutputSinks {
    pub fn new<O, E>(stdout: O, stderr: E) -> Self
    where
        O: AsyncWrite + Send + 'static,
        E: AsyncWrite + Send + 'static,
    {
        Self {
            stdout: Mutex::new(Box::pin(stdout)),
            stderr: Mutex::new(Box::pin(stderr)),
        }
    }

    /// The current process' own stdout and stderr.
    pub fn stdio() -> Self {
        Self::new(tokio::io::stdout(), tokio::io::stderr())
    }

    /// Sinks that discard everything.
    pub fn null() -> Self {
        Self::new(tokio::io::sink(), tokio::io::sink())
    }

    pub(crate) async fn write_stdout(&self, data: &[u8]) -> std::io::Result<()> {
        let mut w = self.stdout.lock().await;
        w.write_all(data).await?;
        w.flush().await
    }

    pub(crate) async fn write_stderr(&self, data: &[u8]) -> std::io::Result<()> {
        let mut w = self.stderr.lock().await;
        w.write_all(data).await?;
        w.flush().await
    }
}

impl fmt::Debug for OutputSinks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutputSinks").finish_non_exhaustive()
    }
}
