// src/errors.rs

//! Crate-wide error type and result alias.

use std::time::Duration;

use thiserror::Error;

use crate::exec::{ExecOptions, LogSink, Severity};
use crate::types::FailureClass;

#[derive(Error, Debug)]
pub enum RunboundError {
    #[error("failed to launch `{command}`: {source}")]
    Launch {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("process timed out after {} seconds", .timeout.as_secs_f64())]
    Timeout { timeout: Duration },

    #[error("exec({command:?}, {options:?}) failed! [{exit_code}]")]
    ExitStatus {
        command: String,
        options: ExecOptions,
        exit_code: i32,
    },

    #[error("usage error: {0}")]
    Usage(String),

    #[error("{0} is not supported by the local executor")]
    Unsupported(&'static str),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RunboundError {
    /// Failure class used for retry enrolment.
    pub fn class(&self) -> FailureClass {
        match self {
            RunboundError::Launch { .. } => FailureClass::Launch,
            RunboundError::Timeout { .. } => FailureClass::Timeout,
            RunboundError::ExitStatus { .. } => FailureClass::ExitStatus,
            RunboundError::Usage(_) => FailureClass::Usage,
            RunboundError::Unsupported(_) => FailureClass::Unsupported,
            RunboundError::Io(_) => FailureClass::Io,
            RunboundError::Config(_) | RunboundError::Toml(_) => FailureClass::Config,
            RunboundError::Other(_) => FailureClass::Other,
        }
    }
}

pub type Result<T> = std::result::Result<T, RunboundError>;

/// Log `err` at fatal level with an `EXCEPTION` tag and hand it back.
///
/// Every failure the crate raises passes through here first.
pub fn logged(log: &dyn LogSink, err: RunboundError) -> RunboundError {
    log.log(
        Severity::Fatal,
        &format!("EXCEPTION: {} - {:?}", err.class(), err.to_string()),
    );
    err
}
