// src/capture.rs

//! Captured executions.
//!
//! A `CapturedExecution` is the harness's record of one student-process
//! run: the combined stdout+stderr blob and the exit status. It is produced
//! once per run, consumed exactly once by a scoring policy, and discarded.
//!
//! This tool never spawns the student process itself; it only ever sees a
//! capture after that process has terminated.

use crate::util::read_to_string;

use anyhow::Result;
use std::path::Path;

/// One captured student-process run.
#[derive(Debug, Clone)]
pub struct CapturedExecution {
    /// Combined stdout+stderr of the process.
    pub output: String,

    /// Exit status of the process.
    pub exit_code: i32,
}

impl CapturedExecution {
    pub fn new(output: impl Into<String>, exit_code: i32) -> Self {
        Self {
            output: output.into(),
            exit_code,
        }
    }

    /// Load a capture from the file the harness wrote.
    pub fn load(path: &Path, exit_code: i32) -> Result<Self> {
        let output = read_to_string(path)?;
        Ok(Self { output, exit_code })
    }
}
