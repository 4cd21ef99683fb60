// src/config.rs

use crate::command::CommandDescriptor;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

/// Root configuration loaded from `suite.yaml`.
///
/// This file controls:
/// - Which executables custom commands may invoke (the allow-list)
/// - The built-in tests and their command templates
/// - Per-assignment custom command lines
/// - The profiler wrapper the harness prepends to performance tests
///
/// Course staff editing an assignment only need to touch `suite.yaml`,
/// not this Rust file.
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Executables custom commands are allowed to invoke.
    ///
    /// Injected configuration, deliberately not hard-coded: each
    /// assignment ships its own driver binaries.
    pub executables: Vec<String>,

    /// Profiler wrapper configuration
    #[serde(default)]
    pub profiler: Profiler,

    /// Built-in test definitions
    #[serde(default)]
    pub tests: Vec<TestDef>,

    /// User-authored custom command lines, one test each
    ///
    /// Example:
    /// custom_commands:
    ///   - ./mdriver -q traces/custom1.rep
    #[serde(default)]
    pub custom_commands: Vec<String>,
}

/// One built-in test definition.
///
/// Example in suite.yaml:
///
/// tests:
///   - name: Sanity
///     kind: sanity
///     command: mdriver traces/sanity.rep
#[derive(Debug, Deserialize)]
pub struct TestDef {
    pub name: String,
    pub kind: TestKind,
    pub command: String,
}

/// How a test's capture is scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TestKind {
    /// Functional correctness: exit status + success marker.
    Sanity,

    /// Instruction count per workload request, from profiler output.
    Perf,
}

/// Profiler wrapper configuration.
///
/// The harness prepends this to every performance test's command. The
/// default toggles collection around the allocator entry points so only
/// student code is counted, and discards the callgrind output file (the
/// textual summary is all the grader reads).
#[derive(Debug, Deserialize)]
pub struct Profiler {
    #[serde(default = "default_wrapper")]
    pub wrapper: String,
}

impl Default for Profiler {
    fn default() -> Self {
        Self {
            wrapper: default_wrapper(),
        }
    }
}

fn default_wrapper() -> String {
    "/usr/bin/valgrind --tool=callgrind --toggle-collect=mymalloc \
     --toggle-collect=myrealloc --toggle-collect=myfree \
     --callgrind-out-file=/dev/null"
        .to_string()
}

impl Config {
    /// Load and parse `suite.yaml` from disk.
    ///
    /// This performs:
    /// - File read
    /// - YAML deserialization
    /// - Basic structural validation
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        let cfg: Config =
            serde_yaml::from_str(&raw).context("Failed to parse YAML config")?;

        Ok(cfg)
    }

    /// Resolve the configuration into an immutable test suite.
    ///
    /// All command parsing and custom-command validation happens here,
    /// once, at load time. An invalid custom executable is fatal: setup
    /// halts before any student code is scored.
    pub fn build_suite(&self) -> Result<Suite> {
        let mut tests = Vec::with_capacity(self.tests.len() + self.custom_commands.len());

        for def in &self.tests {
            let command = CommandDescriptor::parse(&def.name, &def.command)?;
            tests.push(TestCase {
                kind: def.kind,
                command,
            });
        }

        for (index, line) in self.custom_commands.iter().enumerate() {
            let command = CommandDescriptor::from_custom_line(line, index, &self.executables)?;
            // Custom tests are performance tests with a user-authored
            // command; scoring is shared with the built-in perf kind.
            tests.push(TestCase {
                kind: TestKind::Perf,
                command,
            });
        }

        Ok(Suite {
            profiler_wrapper: self.profiler.wrapper.clone(),
            tests,
        })
    }
}

/// The resolved, immutable test suite.
///
/// Built once at load time and read many times across many submissions.
#[derive(Debug)]
pub struct Suite {
    pub profiler_wrapper: String,
    pub tests: Vec<TestCase>,
}

/// One test: a scoring kind plus the command its captures come from.
#[derive(Debug)]
pub struct TestCase {
    pub kind: TestKind,
    pub command: CommandDescriptor,
}

impl Suite {
    pub fn find(&self, name: &str) -> Option<&TestCase> {
        self.tests.iter().find(|t| t.command.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_from(yaml: &str) -> Config {
        serde_yaml::from_str(yaml).expect("valid yaml")
    }

    const SUITE_YAML: &str = "\
executables: [mdriver, mdriver-implicit]
tests:
  - name: Sanity
    kind: sanity
    command: mdriver traces/sanity.rep
  - name: Perf-coalesce
    kind: perf
    command: mdriver -q traces/coalesce.rep
custom_commands:
  - ./mdriver -q traces/custom1.rep
";

    #[test]
    fn builds_suite_with_custom_tests_appended() {
        let suite = config_from(SUITE_YAML).build_suite().unwrap();

        assert_eq!(suite.tests.len(), 3);
        assert_eq!(suite.tests[2].command.name, "Custom-0");
        assert_eq!(suite.tests[2].kind, TestKind::Perf);
        assert!(suite.tests[2].command.resolve_via_harness);
        assert!(!suite.tests[0].command.resolve_via_harness);
    }

    #[test]
    fn find_resolves_by_test_name() {
        let suite = config_from(SUITE_YAML).build_suite().unwrap();

        let case = suite.find("Perf-coalesce").unwrap();
        assert_eq!(case.command.workload_path(), Some("traces/coalesce.rep"));
        assert!(suite.find("Perf-missing").is_none());
    }

    #[test]
    fn unlisted_custom_executable_is_fatal_at_load() {
        let cfg = config_from(
            "executables: [mdriver]\ncustom_commands:\n  - rm -rf /\n",
        );

        let err = cfg.build_suite().unwrap_err();
        assert!(err.to_string().contains("rm is not a valid executable choice"));
    }

    #[test]
    fn profiler_wrapper_defaults_to_callgrind() {
        let cfg = config_from("executables: [mdriver]\n");
        assert!(cfg.profiler.wrapper.contains("--tool=callgrind"));
    }
}
