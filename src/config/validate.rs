// src/config/validate.rs

use std::time::Duration;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{Result, RunboundError};
use crate::exec::ExecOptions;
use crate::retry::RetryPolicy;

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = RunboundError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        let timeout = seconds("[exec].timeout", raw.exec.timeout, false)?;
        let delay = seconds("[retry].delay", raw.retry.delay, true)?;

        if raw.exec.shell.trim().is_empty() {
            return Err(RunboundError::Config(
                "[exec].shell must not be empty".to_string(),
            ));
        }

        if raw.retry.tries == 0 {
            return Err(RunboundError::Config(
                "[retry].tries must be >= 1 (got 0)".to_string(),
            ));
        }

        let exec = ExecOptions {
            timeout,
            ignore_exit_status: raw.exec.ignore_exit_status,
            exit_code: raw.exec.exit_code,
            silence: raw.exec.silence,
        };
        let retry = RetryPolicy {
            tries: raw.retry.tries,
            on: raw.retry.on,
            delay,
        };

        Ok(ConfigFile::new_unchecked(
            exec,
            raw.exec.shell,
            raw.exec.replace_current_process,
            retry,
        ))
    }
}

/// Convert a seconds value from config or CLI into a `Duration`.
///
/// Rejects NaN, infinities and negatives; zero only when `allow_zero`.
pub fn seconds(name: &str, value: f64, allow_zero: bool) -> Result<Duration> {
    if !value.is_finite() || value < 0.0 || (!allow_zero && value == 0.0) {
        let expected = if allow_zero { ">= 0" } else { "> 0" };
        return Err(RunboundError::Config(format!(
            "{name} must be a finite number of seconds {expected} (got {value})"
        )));
    }

    Duration::try_from_secs_f64(value)
        .map_err(|e| RunboundError::Config(format!("{name} is out of range: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        let cfg = ConfigFile::try_from(RawConfigFile::default()).unwrap();
        assert_eq!(cfg, ConfigFile::default());
        assert_eq!(cfg.exec.timeout, Duration::from_secs(600));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let mut raw = RawConfigFile::default();
        raw.exec.timeout = 0.0;
        assert!(matches!(
            ConfigFile::try_from(raw),
            Err(RunboundError::Config(msg)) if msg.contains("[exec].timeout")
        ));
    }

    #[test]
    fn zero_delay_is_allowed() {
        assert_eq!(seconds("d", 0.0, true).unwrap(), Duration::ZERO);
        assert!(seconds("d", -1.0, true).is_err());
        assert!(seconds("d", f64::NAN, true).is_err());
    }

    #[test]
    fn zero_tries_is_rejected() {
        let mut raw = RawConfigFile::default();
        raw.retry.tries = 0;
        assert!(matches!(ConfigFile::try_from(raw), Err(RunboundError::Config(_))));
    }
}
