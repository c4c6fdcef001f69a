// src/exec/launcher.rs

//! Spawning the child process.

use std::process::Stdio;

use tokio::process::{Child, ChildStderr, ChildStdout, Command};

use crate::errors::{Result, RunboundError};

/// A freshly spawned child and the read ends of its output pipes.
///
/// The write ends live only in the child: `tokio::process::Command` drops the
/// parent's copies once `spawn` returns, so EOF on both read ends means the
/// child (and anything it forked that inherited the pipes) has exited.
pub struct LaunchedChild {
    pub child: Child,
    pub stdout: ChildStdout,
    pub stderr: ChildStderr,
}

/// Build a shell command appropriate for the platform.
pub fn shell_command(shell: &str, command: &str) -> Command {
    if cfg!(windows) {
        let mut c = Command::new("cmd");
        c.arg("/C").arg(command);
        c
    } else {
        let mut c = Command::new(shell);
        c.arg("-c").arg(command);
        c
    }
}

/// Spawn `command` through `shell` with both output streams piped and stdin
/// bound to the null device.
pub fn launch(shell: &str, command: &str) -> Result<LaunchedChild> {
    let mut cmd = shell_command(shell, command);
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = cmd.spawn().map_err(|source| RunboundError::Launch {
        command: command.to_string(),
        source,
    })?;

    let (Some(stdout), Some(stderr)) = (child.stdout.take(), child.stderr.take()) else {
        return Err(RunboundError::Launch {
            command: command.to_string(),
            source: std::io::Error::other("child output pipes were not created"),
        });
    };

    Ok(LaunchedChild {
        child,
        stdout,
        stderr,
    })
}

/// Replace the current process image with `shell -c command`.
///
/// Only returns when the replacement itself fails.
#[cfg(unix)]
pub fn replace_current_process(shell: &str, command: &str) -> RunboundError {
    use std::os::unix::process::CommandExt;

    let source = std::process::Command::new(shell)
        .arg("-c")
        .arg(command)
        .exec();

    RunboundError::Launch {
        command: command.to_string(),
        source,
    }
}

#[cfg(not(unix))]
pub fn replace_current_process(_shell: &str, _command: &str) -> RunboundError {
    RunboundError::Unsupported("replacing the current process")
}
