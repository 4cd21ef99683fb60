// src/validate.rs

//! Suite validation.
//!
//! Lints a suite config before the harness schedules anything, and reports
//! coded errors a machine can act on. Unlike `Config::build_suite`, which
//! stops at the first fatal problem, validation collects everything wrong
//! with the suite in one pass.

use crate::command::CommandDescriptor;
use crate::config::{Config, TestKind};

use serde::Serialize;
use std::collections::HashSet;
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<ValidationError>,
}

#[derive(Debug, Serialize)]
pub struct ValidationError {
    pub code: &'static str,
    pub message: String,
}

impl ValidationResult {
    pub fn ok() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
        }
    }

    pub fn push_error(&mut self, code: &'static str, message: impl Into<String>) {
        self.valid = false;
        self.errors.push(ValidationError {
            code,
            message: message.into(),
        });
    }

    pub fn is_valid(&self) -> bool {
        self.valid && self.errors.is_empty()
    }
}

pub fn validate_config(cfg: &Config) -> ValidationResult {
    let mut result = ValidationResult::ok();

    validate_executables(cfg, &mut result);
    validate_tests(cfg, &mut result);
    validate_custom_commands(cfg, &mut result);

    result
}

/* ---------------- executables ---------------- */

fn validate_executables(cfg: &Config, result: &mut ValidationResult) {
    if cfg.executables.is_empty() {
        result.push_error(
            "EXECUTABLES_EMPTY",
            "At least one permitted executable must be configured",
        );
    }
}

/* ---------------- built-in tests ---------------- */

fn validate_tests(cfg: &Config, result: &mut ValidationResult) {
    let mut seen_names: HashSet<&str> = HashSet::new();

    for def in &cfg.tests {
        if !seen_names.insert(&def.name) {
            result.push_error(
                "TEST_NAME_DUPLICATE",
                format!("Duplicate test name: {}", def.name),
            );
        }

        let command = match CommandDescriptor::parse(&def.name, &def.command) {
            Ok(c) => c,
            Err(e) => {
                result.push_error(
                    "TEST_COMMAND_INVALID",
                    format!("Test {:?}: {}", def.name, e),
                );
                continue;
            }
        };

        if !cfg.executables.iter().any(|x| *x == command.executable) {
            result.push_error(
                "TEST_EXECUTABLE_UNLISTED",
                format!(
                    "Test {:?} invokes {:?}, which is not a permitted executable",
                    def.name, command.executable
                ),
            );
        }

        // Performance tests need a workload file to normalize against.
        if def.kind == TestKind::Perf {
            match command.workload_path() {
                None => {
                    result.push_error(
                        "TEST_WORKLOAD_MISSING",
                        format!("Perf test {:?} names no workload file", def.name),
                    );
                }
                Some(path) if !Path::new(path).exists() => {
                    result.push_error(
                        "WORKLOAD_NOT_FOUND",
                        format!("Workload file not found: {}", path),
                    );
                }
                Some(_) => {}
            }
        }
    }
}

/* ---------------- custom commands ---------------- */

fn validate_custom_commands(cfg: &Config, result: &mut ValidationResult) {
    for (index, line) in cfg.custom_commands.iter().enumerate() {
        let command = match CommandDescriptor::from_custom_line(line, index, &cfg.executables) {
            Ok(c) => c,
            Err(e) => {
                result.push_error("CUSTOM_COMMAND_INVALID", e.to_string());
                continue;
            }
        };

        match command.workload_path() {
            None => {
                result.push_error(
                    "TEST_WORKLOAD_MISSING",
                    format!("Custom command {} names no workload file", index),
                );
            }
            Some(path) if !Path::new(path).exists() => {
                result.push_error(
                    "WORKLOAD_NOT_FOUND",
                    format!("Workload file not found: {}", path),
                );
            }
            Some(_) => {}
        }
    }
}
