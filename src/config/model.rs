// src/config/model.rs

use serde::Deserialize;

use crate::exec::ExecOptions;
use crate::retry::RetryPolicy;
use crate::types::RetryOn;

/// Configuration as read from a TOML file.
///
/// ```toml
/// [exec]
/// timeout = 600
/// ignore_exit_status = false
/// exit_code = 0
/// silence = false
/// shell = "sh"
///
/// [retry]
/// tries = 3
/// on = ["timeout"]
/// delay = 1
/// ```
///
/// Every key is optional. Unknown keys are rejected.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct RawConfigFile {
    #[serde(default)]
    pub exec: ExecSection,

    #[serde(default)]
    pub retry: RetrySection,
}

/// `[exec]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExecSection {
    /// Seconds; fractions allowed.
    #[serde(default = "default_timeout")]
    pub timeout: f64,

    #[serde(default)]
    pub ignore_exit_status: bool,

    #[serde(default)]
    pub exit_code: i32,

    #[serde(default)]
    pub silence: bool,

    #[serde(default = "default_shell")]
    pub shell: String,

    /// Unix only: exec the command in place of the current process.
    #[serde(default)]
    pub replace_current_process: bool,
}

fn default_timeout() -> f64 {
    600.0
}

fn default_shell() -> String {
    "sh".to_string()
}

impl Default for ExecSection {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
            ignore_exit_status: false,
            exit_code: 0,
            silence: false,
            shell: default_shell(),
            replace_current_process: false,
        }
    }
}

/// `[retry]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RetrySection {
    #[serde(default = "default_tries")]
    pub tries: u32,

    #[serde(default)]
    pub on: RetryOn,

    /// Seconds between attempts; fractions allowed.
    #[serde(default = "default_delay")]
    pub delay: f64,
}

fn default_tries() -> u32 {
    1
}

fn default_delay() -> f64 {
    1.0
}

impl Default for RetrySection {
    fn default() -> Self {
        Self {
            tries: default_tries(),
            on: RetryOn::Any,
            delay: default_delay(),
        }
    }
}

/// Validated configuration.
///
/// Only constructible through `TryFrom<RawConfigFile>` (see
/// [`validate`](crate::config::validate)) or [`ConfigFile::default`].
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    pub exec: ExecOptions,
    pub shell: String,
    pub replace_current_process: bool,
    pub retry: RetryPolicy,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(
        exec: ExecOptions,
        shell: String,
        replace_current_process: bool,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            exec,
            shell,
            replace_current_process,
            retry,
        }
    }
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self::new_unchecked(
            ExecOptions::default(),
            default_shell(),
            false,
            RetryPolicy::default(),
        )
    }
}
