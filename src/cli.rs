// src/cli.rs

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Malloc-lab grading core (verdicts from captured output).
///
/// `suite.yaml` is the primary source of truth.
/// CLI flags only identify the capture being scored.
#[derive(Parser, Debug)]
#[command(
    name = "allocgrade",
    version,
    disable_help_subcommand = true
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// All supported CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Score one captured execution against one test.
    ///
    /// The harness supplies the capture file (combined stdout+stderr of the
    /// student process) and its exit status; the verdict is printed to
    /// stdout.
    Score {
        /// Path to suite config file
        ///
        /// Defaults to ./suite.yaml
        #[arg(short, long, default_value = "suite.yaml")]
        config: PathBuf,

        /// Name of the test this capture belongs to
        ///
        /// Example:
        /// --test Custom-0
        #[arg(long)]
        test: String,

        /// Path to the captured output file
        #[arg(long)]
        capture: PathBuf,

        /// Exit status of the student process
        #[arg(long)]
        exit_code: i32,

        /// Output mode
        #[arg(long, value_parser = ["simple", "json"], default_value = "simple")]
        output: String,
    },

    /// Validate a suite config without scoring anything.
    ///
    /// Reports coded errors (empty allow-list, unknown executables,
    /// missing workload files) as a JSON blob.
    Validate {
        /// Path to suite config file
        ///
        /// Defaults to ./suite.yaml
        #[arg(short, long, default_value = "suite.yaml")]
        config: PathBuf,
    },

    /// Print the resolved test suite as JSON.
    ///
    /// This is what the harness's scheduler consumes: one entry per test
    /// with its command line, workload file, and the profiler wrapper the
    /// performance tests run under.
    List {
        /// Path to suite config file
        ///
        /// Defaults to ./suite.yaml
        #[arg(short, long, default_value = "suite.yaml")]
        config: PathBuf,
    },

    /// Initialise a suite scaffold.
    ///
    /// Creates:
    /// - suite.yaml
    Init,
}
