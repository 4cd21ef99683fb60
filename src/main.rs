// src/main.rs

//! allocgrade
//!
//! Entry point for the allocgrade CLI.
//!
//! This binary scores malloc-lab submissions from captured process output.
//! The enclosing test harness runs the student binary (under callgrind for
//! the performance tests), captures combined output and exit status, and
//! calls this tool to turn one capture into a verdict.
//!
//! Responsibilities of this file:
//! - Initialise logging
//! - Parse CLI arguments
//! - Hand off execution to the runner
//!
//! There is intentionally *no business logic* here.

mod capture;
mod cli;
mod command;
mod config;
mod profiler;
mod runner;
mod scoring;
mod util;
mod validate;
mod verdict;
mod workload;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Program entry point.
///
/// Everything the core does is synchronous: file reads and in-memory text
/// scans. Process execution belongs to the harness, not to this tool.
fn main() -> Result<()> {
    // Diagnostics go to stderr so stdout stays clean for verdict output.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    // Parse CLI arguments (score / validate / list / init)
    let cli = cli::Cli::parse();

    // Delegate execution to the runner
    runner::run(cli)
}
