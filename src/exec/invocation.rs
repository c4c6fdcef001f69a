// src/exec/invocation.rs

//! Per-call execution options and results.

use std::time::Duration;

/// Default deadline for a whole execution.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(600);

/// Options recognised by a single execution.
///
/// | option               | default |
/// |----------------------|---------|
/// | `timeout`            | 600s    |
/// | `ignore_exit_status` | false   |
/// | `exit_code`          | 0       |
/// | `silence`            | false   |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecOptions {
    /// Maximum wall-clock time spent reading the child's output.
    pub timeout: Duration,

    /// Skip the exit code comparison entirely.
    pub ignore_exit_status: bool,

    /// Exit code treated as success.
    pub exit_code: i32,

    /// Suppress writes to the output sinks. Logging still happens.
    pub silence: bool,
}

impl Default for ExecOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            ignore_exit_status: false,
            exit_code: 0,
            silence: false,
        }
    }
}

impl ExecOptions {
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_exit_code(mut self, exit_code: i32) -> Self {
        self.exit_code = exit_code;
        self
    }

    #[must_use]
    pub fn ignore_exit_status(mut self, ignore: bool) -> Self {
        self.ignore_exit_status = ignore;
        self
    }

    #[must_use]
    pub fn silence(mut self, silence: bool) -> Self {
        self.silence = silence;
        self
    }
}

/// A single requested command execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub command: String,
    pub options: ExecOptions,
}

impl Invocation {
    pub fn new(command: impl Into<String>, options: ExecOptions) -> Self {
        Self {
            command: command.into(),
            options,
        }
    }
}

/// Outcome of an execution whose exit status passed the exit policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    /// Bytes from both streams, in the order they were read.
    pub output: Vec<u8>,

    /// OS exit code, or `-1` when the child was terminated by a signal.
    pub exit_code: i32,
}

impl ExecutionResult {
    /// Output decoded as UTF-8, with invalid sequences replaced.
    pub fn output_lossy(&self) -> String {
        String::from_utf8_lossy(&self.output).into_owned()
    }
}
