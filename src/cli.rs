// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

use crate::types::FailureClass;

/// Command-line arguments for `runbound`.
///
/// Flags override the values from the config file.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "runbound",
    version,
    about = "Run a shell command with a deadline, exit-code checking and retries.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Default: `Runbound.toml` in the current working directory, if present.
    #[arg(long, value_name = "PATH")]
    pub config: Option<String>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `RUNBOUND_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Maximum seconds the command may run.
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<f64>,

    /// Exit code treated as success.
    #[arg(long, value_name = "CODE", allow_negative_numbers = true)]
    pub exit_code: Option<i32>,

    /// Accept any exit code.
    #[arg(long)]
    pub ignore_exit_status: bool,

    /// Do not echo the command's output (it is still logged).
    #[arg(long)]
    pub silence: bool,

    /// Shell used to run the command.
    #[arg(long, value_name = "PROGRAM")]
    pub shell: Option<String>,

    /// Total attempts before giving up.
    #[arg(long, value_name = "N")]
    pub tries: Option<u32>,

    /// Failure class to retry on; repeat for several. Default: any.
    #[arg(long = "retry-on", value_name = "CLASS")]
    pub retry_on: Vec<FailureClass>,

    /// Seconds to wait between attempts.
    #[arg(long, value_name = "SECS")]
    pub delay: Option<f64>,

    /// Print the effective invocation and retry policy, but don't run it.
    #[arg(long)]
    pub dry_run: bool,

    /// The command line to run.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "COMMAND")]
    pub command: Vec<String>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
