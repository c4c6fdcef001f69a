// src/exec/exit_policy.rs

use crate::errors::{Result, RunboundError};
use crate::exec::ExecOptions;

/// Decide whether `exit_code` is acceptable for a run of `command`.
pub fn check_exit_status(command: &str, options: &ExecOptions, exit_code: i32) -> Result<()> {
    if options.ignore_exit_status || exit_code == options.exit_code {
        return Ok(());
    }

    Err(RunboundError::ExitStatus {
        command: command.to_string(),
        options: options.clone(),
        exit_code,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matching_code_passes() {
        let opts = ExecOptions::default().with_exit_code(2);
        assert!(check_exit_status("false", &opts, 2).is_ok());
    }

    #[test]
    fn mismatch_carries_command_options_and_code() {
        let opts = ExecOptions::default();
        match check_exit_status("exit 3", &opts, 3) {
            Err(RunboundError::ExitStatus {
                command,
                options,
                exit_code,
            }) => {
                assert_eq!(command, "exit 3");
                assert_eq!(options, opts);
                assert_eq!(exit_code, 3);
            }
            other => panic!("expected ExitStatus, got {other:?}"),
        }
    }

    #[test]
    fn ignore_exit_status_accepts_anything() {
        let opts = ExecOptions::default().ignore_exit_status(true);
        assert!(check_exit_status("kill -9 $$", &opts, -1).is_ok());
    }
}
