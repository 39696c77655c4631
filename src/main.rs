//! flowshop-neh command-line entry point.
//!
//! Runs one NEH batch described by a TOML parameter file.
//!
//! # Usage
//!
//! ```bash
//! flowshop-neh params.toml
//! RUST_LOG=debug flowshop-neh params.toml
//! ```
//!
//! The process exits with the batch status code (0 on success).

use std::env;
use std::process::ExitCode;

use anyhow::Context;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

use flowshop_neh::batch::{BatchConfig, BatchRunner, TaskStatus};

fn main() -> ExitCode {
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(false)
        .with_thread_names(true)
        .init();

    let mut args = env::args();
    let program = args.next().unwrap_or_else(|| "flowshop-neh".into());
    let Some(params_file) = args.next() else {
        eprintln!("Error: missing command line parameter.");
        eprintln!("Usage: {program} <params file>");
        return ExitCode::FAILURE;
    };

    match run(&params_file) {
        Ok(status) if status.is_ok() => ExitCode::SUCCESS,
        Ok(status) => ExitCode::from(u8::try_from(status.code()).unwrap_or(1)),
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(params_file: &str) -> anyhow::Result<TaskStatus> {
    let config = BatchConfig::from_file(params_file)
        .with_context(|| format!("loading parameters from {params_file}"))?;
    info!(path = params_file, "Loaded parameters file");

    let outcome = BatchRunner::run(&config).context("running batch")?;
    info!(
        status = %outcome.status,
        attempted = outcome.attempted,
        completed = outcome.table.completed(),
        elapsed_ms = outcome.elapsed.as_millis() as u64,
        "Done"
    );
    Ok(outcome.status)
}
