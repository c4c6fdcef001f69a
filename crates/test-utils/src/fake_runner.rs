use std::future::Future;
use std::path::Path;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use runbound::errors::{Result, RunboundError};
use runbound::exec::{CommandRunner, ExecOptions, ExecutionResult};
use runbound::types::FailureClass;

/// A fake runner that:
/// - counts how often `exec` was called
/// - fails the first `failures` calls with an error of class `class`
/// - then succeeds, echoing the command as output.
pub struct FlakyRunner {
    failures: usize,
    class: FailureClass,
    calls: Arc<AtomicUsize>,
}

impl FlakyRunner {
    pub fn new(failures: usize, class: FailureClass) -> Self {
        Self {
            failures,
            class,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn failure(&self, command: &str, options: &ExecOptions) -> RunboundError {
        match self.class {
            FailureClass::Timeout => RunboundError::Timeout {
                timeout: options.timeout,
            },
            FailureClass::ExitStatus => RunboundError::ExitStatus {
                command: command.to_string(),
                options: options.clone(),
                exit_code: 1,
            },
            FailureClass::Launch => RunboundError::Launch {
                command: command.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such shell"),
            },
            FailureClass::Usage => RunboundError::Usage("fake usage failure".to_string()),
            FailureClass::Unsupported => RunboundError::Unsupported("fake operation"),
            FailureClass::Io => RunboundError::Io(std::io::Error::other("fake io failure")),
            FailureClass::Config => RunboundError::Config("fake config failure".to_string()),
            FailureClass::Other => RunboundError::Other(anyhow::anyhow!("fake failure")),
        }
    }
}

impl CommandRunner for FlakyRunner {
    fn exec<'a>(
        &'a self,
        command: &'a str,
        options: &'a ExecOptions,
    ) -> Pin<Box<dyn Future<Output = Result<ExecutionResult>> + Send + 'a>> {
        Box::pin(async move {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            // Yield so paused-clock tests observe real suspension points.
            tokio::time::sleep(Duration::ZERO).await;
            if call < self.failures {
                return Err(self.failure(command, options));
            }
            Ok(ExecutionResult {
                output: command.as_bytes().to_vec(),
                exit_code: 0,
            })
        })
    }

    fn upload(&self, _local: &Path, _remote: &Path) -> Result<()> {
        Err(RunboundError::Unsupported("upload"))
    }

    fn download(&self, _remote: &Path, _local: &Path) -> Result<()> {
        Err(RunboundError::Unsupported("download"))
    }
}
