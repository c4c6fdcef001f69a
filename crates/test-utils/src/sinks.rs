//! In-memory sinks for asserting on what the executor logged and printed.

use std::io;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};

use runbound::exec::{LogSink, OutputSinks, Severity};
use tokio::io::AsyncWrite;

/// A log sink that records every entry.
#[derive(Debug, Default, Clone)]
pub struct MemoryLogSink {
    entries: Arc<Mutex<Vec<(Severity, String)>>>,
}

impl MemoryLogSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<(Severity, String)> {
        self.entries.lock().unwrap().clone()
    }

    /// Entries at exactly `severity`.
    pub fn at(&self, severity: Severity) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter(|(s, _)| *s == severity)
            .map(|(_, m)| m)
            .collect()
    }

    /// Number of entries containing `needle`.
    pub fn count_containing(&self, needle: &str) -> usize {
        self.entries()
            .iter()
            .filter(|(_, m)| m.contains(needle))
            .count()
    }
}

impl LogSink for MemoryLogSink {
    fn log(&self, severity: Severity, message: &str) {
        self.entries
            .lock()
            .unwrap()
            .push((severity, message.to_string()));
    }
}

/// A cloneable byte buffer usable as an output sink.
#[derive(Debug, Default, Clone)]
pub struct SharedBuffer {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> Vec<u8> {
        self.bytes.lock().unwrap().clone()
    }

    pub fn contents_lossy(&self) -> String {
        String::from_utf8_lossy(&self.contents()).into_owned()
    }
}

impl AsyncWrite for SharedBuffer {
    fn poll_write(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        self.bytes.lock().unwrap().extend_from_slice(buf);
        Poll::Ready(Ok(buf.len()))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}

/// An output sink whose every write fails, like a pipe with no reader.
#[derive(Debug, Default, Clone, Copy)]
pub struct BrokenSink;

impl AsyncWrite for BrokenSink {
    fn poll_write(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        _buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        Poll::Ready(Err(io::Error::new(
            io::ErrorKind::BrokenPipe,
            "output sink closed",
        )))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}

/// An output sink that never accepts a byte, like a terminal paused with
/// Ctrl-S.
#[derive(Debug, Default, Clone, Copy)]
pub struct StalledSink;

impl AsyncWrite for StalledSink {
    fn poll_write(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        _buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        Poll::Pending
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Pending
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}

/// Everything a test needs to observe one executor.
pub struct Capture {
    pub log: MemoryLogSink,
    pub stdout: SharedBuffer,
    pub stderr: SharedBuffer,
}

impl Capture {
    pub fn new() -> Self {
        Self {
            log: MemoryLogSink::new(),
            stdout: SharedBuffer::new(),
            stderr: SharedBuffer::new(),
        }
    }

    pub fn output_sinks(&self) -> Arc<OutputSinks> {
        Arc::new(OutputSinks::new(self.stdout.clone(), self.stderr.clone()))
    }

    pub fn log_sink(&self) -> Arc<dyn LogSink> {
        Arc::new(self.log.clone())
    }
}

impl Default for Capture {
    fn default() -> Self {
        Self::new()
    }
}
