// src/exec/mod.rs

//! Process execution layer.
//!
//! - [`invocation`] holds the per-call options and the result type.
//! - [`launcher`] spawns the shell with piped stdout/stderr and null stdin.
//! - [`deadline`] is the wall-clock bound shared by the whole run.
//! - [`multiplex`] drains both pipes concurrently under a deadline, forwarding
//!   chunks to the sinks and emitting origin headers on stream switches.
//! - [`exit_policy`] maps the observed exit code to success or failure.
//! - [`sink`] defines the logging and output sinks supplied by the caller.
//! - [`runner`] ties it together in [`LocalExecutor`], the local
//!   implementation of the [`CommandRunner`] seam.

pub mod deadline;
pub mod exit_policy;
pub mod invocation;
pub mod launcher;
pub mod multiplex;
pub mod runner;
pub mod sink;

pub use deadline::Deadline;
pub use invocation::{DEFAULT_TIMEOUT, ExecOptions, ExecutionResult, Invocation};
pub use multiplex::Origin;
pub use runner::{CommandRunner, LocalExecutor, LocalExecutorBuilder};
pub use sink::{LogSink, OutputSinks, Severity, TracingLogSink};
