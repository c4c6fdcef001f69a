// src/lib.rs

//! Local process execution with deadlines, exit-code policy and retries.
//!
//! The core entry points are [`LocalExecutor::run`](exec::LocalExecutor::run)
//! and [`retry::retry`]. The rest of the crate wires them into a small CLI.

pub mod cli;
pub mod config;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod retry;
pub mod types;

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::{ConfigFile, load_or_default};
use crate::config::validate::seconds;
use crate::errors::{RunboundError, logged};
use crate::exec::{Invocation, LocalExecutor, LogSink, OutputSinks, TracingLogSink};
use crate::retry::retry;
use crate::types::RetryOn;

/// High-level entry point used by `main.rs`.
///
/// Logs through `tracing` and streams the child's output to this process'
/// own stdout/stderr.
pub async fn run(args: CliArgs) -> Result<()> {
    run_with(args, Arc::new(TracingLogSink), Arc::new(OutputSinks::stdio())).await
}

/// Load config, apply CLI overrides, then run the command under the retry
/// policy, logging and printing through the given sinks.
pub async fn run_with(args: CliArgs, log: Arc<dyn LogSink>, sinks: Arc<OutputSinks>) -> Result<()> {
    let sink = log.as_ref();

    let mut cfg = load_or_default(args.config.as_deref().map(Path::new))
        .map_err(|e| logged(sink, e))?;
    apply_cli_overrides(&mut cfg, &args).map_err(|e| logged(sink, e))?;

    let command = args.command.join(" ");
    if command.trim().is_empty() {
        let err = RunboundError::Usage("no command given".to_string());
        return Err(logged(sink, err).into());
    }

    let invocation = Invocation::new(command, cfg.exec.clone());

    if args.dry_run {
        print_dry_run(&cfg, &invocation);
        return Ok(());
    }

    let executor = LocalExecutor::builder()
        .log_sink(Arc::clone(&log))
        .output_sinks(sinks)
        .shell(cfg.shell.clone())
        .replace_current_process(cfg.replace_current_process)
        .build()
        .map_err(|e| logged(sink, e))?;
    debug!(?executor, "executor ready");

    let result = retry(&cfg.retry, sink, || executor.run(&invocation)).await?;

    info!(
        exit_code = result.exit_code,
        output_bytes = result.output.len(),
        "command finished"
    );
    Ok(())
}

/// Merge command-line flags over the loaded configuration.
pub fn apply_cli_overrides(cfg: &mut ConfigFile, args: &CliArgs) -> errors::Result<()> {
    if let Some(timeout) = args.timeout {
        cfg.exec.timeout = seconds("--timeout", timeout, false)?;
    }
    if let Some(code) = args.exit_code {
        cfg.exec.exit_code = code;
    }
    if args.ignore_exit_status {
        cfg.exec.ignore_exit_status = true;
    }
    if args.silence {
        cfg.exec.silence = true;
    }
    if let Some(ref shell) = args.shell {
        if shell.trim().is_empty() {
            return Err(RunboundError::Config("--shell must not be empty".to_string()));
        }
        cfg.shell = shell.clone();
    }
    if let Some(tries) = args.tries {
        if tries == 0 {
            return Err(RunboundError::Config("--tries must be >= 1 (got 0)".to_string()));
        }
        cfg.retry.tries = tries;
    }
    if !args.retry_on.is_empty() {
        cfg.retry.on = RetryOn::Only(args.retry_on.clone());
    }
    if let Some(delay) = args.delay {
        cfg.retry.delay = seconds("--delay", delay, true)?;
    }
    Ok(())
}

/// Process exit code for a failed run.
///
/// An exit-status mismatch passes the child's own code through when it is a
/// valid non-zero status; everything else maps to 1.
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<RunboundError>() {
        Some(RunboundError::ExitStatus { exit_code, .. }) if (1..=255).contains(exit_code) => {
            *exit_code
        }
        _ => 1,
    }
}

fn print_dry_run(cfg: &ConfigFile, invocation: &Invocation) {
    println!("runbound dry-run");
    println!("  command: {}", invocation.command);
    println!("  shell: {}", cfg.shell);
    println!("  timeout: {}s", invocation.options.timeout.as_secs_f64());
    if invocation.options.ignore_exit_status {
        println!("  exit_code: ignored");
    } else {
        println!("  exit_code: {}", invocation.options.exit_code);
    }
    println!("  silence: {}", invocation.options.silence);
    if cfg.replace_current_process {
        println!("  replace_current_process: true");
    }
    println!();

    println!("retry:");
    println!("  tries: {}", cfg.retry.tries);
    match &cfg.retry.on {
        RetryOn::Any => println!("  on: any"),
        RetryOn::Only(classes) => {
            let names: Vec<&str> = classes.iter().map(|c| c.as_str()).collect();
            println!("  on: {}", names.join(", "));
        }
    }
    println!("  delay: {}s", cfg.retry.delay.as_secs_f64());

    debug!("dry-run complete (no execution)");
}
