// src/exec/runner.rs

//! The local command executor.
//!
//! [`CommandRunner`] is the seam other transports (e.g. a remote session)
//! would implement. [`LocalExecutor`] is the only implementation in this
//! crate: it runs commands through a local shell and does not support file
//! transfer.

use std::fmt;
use std::future::Future;
use std::path::Path;
use std::pin::Pin;
use std::sync::Arc;

use tokio::process::Child;

use crate::errors::{Result, RunboundError, logged};
use crate::exec::exit_policy::check_exit_status;
use crate::exec::deadline::Deadline;
use crate::exec::launcher::{LaunchedChild, launch, replace_current_process};
use crate::exec::multiplex::{Multiplexer, log_header};
use crate::exec::sink::{LogSink, OutputSinks, Severity, TracingLogSink};
use crate::exec::{ExecOptions, ExecutionResult, Invocation};

/// Something that can execute a shell command and move files around.
pub trait CommandRunner: Send + Sync {
    /// Run `command` and return its combined output and exit code.
    fn exec<'a>(
        &'a self,
        command: &'a str,
        options: &'a ExecOptions,
    ) -> Pin<Box<dyn Future<Output = Result<ExecutionResult>> + Send + 'a>>;

    /// Copy a local file to the target.
    fn upload(&self, local: &Path, remote: &Path) -> Result<()>;

    /// Copy a file from the target to the local machine.
    fn download(&self, remote: &Path, local: &Path) -> Result<()>;
}

/// Runs commands as local child processes.
#[derive(Clone)]
pub struct LocalExecutor {
    log: Arc<dyn LogSink>,
    sinks: Arc<OutputSinks>,
    shell: String,
    replace_current_process: bool,
    tag: String,
}

impl LocalExecutor {
    /// Executor logging through `tracing` and writing to the process' own
    /// stdout/stderr.
    pub fn new() -> Self {
        Self {
            log: Arc::new(TracingLogSink),
            sinks: Arc::new(OutputSinks::stdio()),
            shell: "sh".to_string(),
            replace_current_process: false,
            tag: session_tag(),
        }
    }

    pub fn builder() -> LocalExecutorBuilder {
        LocalExecutorBuilder::default()
    }

    pub fn shell(&self) -> &str {
        &self.shell
    }

    /// Execute one invocation end to end.
    ///
    /// Every failure is logged at fatal level with an `EXCEPTION` tag before
    /// it is returned. The timeout covers draining the pipes and the wait for
    /// the exit status; on timeout or a sink failure the child is killed and
    /// reaped.
    pub async fn run(&self, invocation: &Invocation) -> Result<ExecutionResult> {
        let Invocation { command, options } = invocation;
        let log = self.log.as_ref();

        log.log(Severity::Debug, &format!("options={options:?}"));
        log.log(Severity::Info, &format!("command({command:?})"));

        if self.replace_current_process {
            log.log(Severity::Fatal, "REPLACING CURRENT PROCESS - GOODBYE!");
            return Err(logged(log, replace_current_process(&self.shell, command)));
        }

        let LaunchedChild {
            mut child,
            stdout,
            stderr,
        } = launch(&self.shell, command).map_err(|e| logged(log, e))?;

        let tag = match child.id() {
            Some(pid) => format!("{} pid={pid}", self.tag),
            None => self.tag.clone(),
        };

        log.direct(Severity::Debug, log_header("COMMAND", &tag).as_bytes());
        log.direct(Severity::Debug, format!("{command}\n").as_bytes());
        log.direct(Severity::Debug, log_header("STARTED", &tag).as_bytes());

        let deadline = Deadline::after(options.timeout);
        let finished = async {
            let output = Multiplexer::new(log, &self.sinks, &tag, options.silence)
                .run(stdout, stderr, deadline)
                .await?;
            let status = deadline
                .bound(async { child.wait().await.map_err(RunboundError::from) })
                .await?;
            Ok::<_, RunboundError>((output, status))
        }
        .await;

        let (output, status) = match finished {
            Ok(done) => done,
            Err(err) => {
                if matches!(err, RunboundError::Timeout { .. }) {
                    log.direct(Severity::Debug, log_header("TIMEOUT", &tag).as_bytes());
                }
                self.terminate(&mut child).await;
                return Err(logged(log, err));
            }
        };
        let exit_code = status.code().unwrap_or(-1);

        log.direct(Severity::Debug, log_header("STOPPED", &tag).as_bytes());
        log.log(Severity::Debug, &format!("exit_code({exit_code})"));

        check_exit_status(command, options, exit_code).map_err(|e| logged(log, e))?;

        Ok(ExecutionResult { output, exit_code })
    }

    /// Kill and reap a child abandoned mid-run.
    async fn terminate(&self, child: &mut Child) {
        if let Err(e) = child.kill().await {
            self.log.log(
                Severity::Warn,
                &format!("failed to kill child process: {e}"),
            );
        }
    }

    fn unsupported(&self, what: &'static str) -> RunboundError {
        logged(self.log.as_ref(), RunboundError::Unsupported(what))
    }
}

impl Default for LocalExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for LocalExecutor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalExecutor")
            .field("shell", &self.shell)
            .field("replace_current_process", &self.replace_current_process)
            .field("tag", &self.tag)
            .finish_non_exhaustive()
    }
}

impl CommandRunner for LocalExecutor {
    fn exec<'a>(
        &'a self,
        command: &'a str,
        options: &'a ExecOptions,
    ) -> Pin<Box<dyn Future<Output = Result<ExecutionResult>> + Send + 'a>> {
        Box::pin(async move {
            let invocation = Invocation::new(command, options.clone());
            self.run(&invocation).await
        })
    }

    fn upload(&self, _local: &Path, _remote: &Path) -> Result<()> {
        Err(self.unsupported("upload"))
    }

    fn download(&self, _remote: &Path, _local: &Path) -> Result<()> {
        Err(self.unsupported("download"))
    }
}

/// Builder for [`LocalExecutor`].
///
/// A log sink is mandatory; output sinks default to the process' stdio.
#[derive(Default)]
pub struct LocalExecutorBuilder {
    log: Option<Arc<dyn LogSink>>,
    sinks: Option<Arc<OutputSinks>>,
    shell: Option<String>,
    replace_current_process: bool,
}

impl LocalExecutorBuilder {
    #[must_use]
    pub fn log_sink(mut self, log: Arc<dyn LogSink>) -> Self {
        self.log = Some(log);
        self
    }

    #[must_use]
    pub fn output_sinks(mut self, sinks: Arc<OutputSinks>) -> Self {
        self.sinks = Some(sinks);
        self
    }

    #[must_use]
    pub fn shell(mut self, shell: impl Into<String>) -> Self {
        self.shell = Some(shell.into());
        self
    }

    #[must_use]
    pub fn replace_current_process(mut self, replace: bool) -> Self {
        self.replace_current_process = replace;
        self
    }

    pub fn build(self) -> Result<LocalExecutor> {
        let log = self.log.ok_or_else(|| {
            RunboundError::Usage("a log sink is required for direct logging".to_string())
        })?;

        Ok(LocalExecutor {
            log,
            sinks: self.sinks.unwrap_or_else(|| Arc::new(OutputSinks::stdio())),
            shell: self.shell.unwrap_or_else(|| "sh".to_string()),
            replace_current_process: self.replace_current_process,
            tag: session_tag(),
        })
    }
}

/// `user@host` for the current session.
fn session_tag() -> String {
    let user = std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "unknown".to_string());
    let host = hostname::get()
        .map(|h| h.to_string_lossy().into_owned())
        .unwrap_or_else(|_| "localhost".to_string());
    format!("{user}@{host}")
}
