// src/command.rs

//! Command descriptors.
//!
//! Every test carries the command line its capture was produced by. Rather
//! than passing raw template strings around (with sentinel prefixes to mark
//! "run this verbatim"), commands are parsed once at suite load time into a
//! structured value: executable, argument list, and an explicit flag for
//! "resolve through the harness's standard invocation convention".
//!
//! Custom commands are the one place untrusted text enters the suite, so
//! their executable token is validated against the configured allow-list.
//! A bad token is a fatal construction-time error: it must halt suite
//! setup, never reach execution, and never be scored around.

use crate::util::pretty_list;

use anyhow::{bail, Context, Result};

/// One validated, executable test command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandDescriptor {
    /// Test name, e.g. "Sanity" or "Custom-0".
    pub name: String,

    /// First token of the command line ("./" prefix stripped).
    pub executable: String,

    /// Remaining whitespace-delimited tokens.
    pub args: Vec<String>,

    /// Resolve via the harness's standard executable-invocation convention
    /// (true for user-authored custom commands).
    pub resolve_via_harness: bool,
}

impl CommandDescriptor {
    /// Parse a built-in test's command template.
    ///
    /// Built-in commands come from the suite file itself, so no allow-list
    /// gate applies here; `validate` lints them separately.
    pub fn parse(name: &str, line: &str) -> Result<Self> {
        let (executable, args) = split_command_line(line)
            .with_context(|| format!("Test {:?} has an empty command", name))?;

        Ok(Self {
            name: name.to_string(),
            executable,
            args,
            resolve_via_harness: false,
        })
    }

    /// Build a custom test command from one authored line.
    ///
    /// - The test is named "Custom-{index}".
    /// - A leading "./" is cosmetic and stripped ("./mdriver" ≡ "mdriver").
    /// - The executable token must be in `executables`; anything else fails
    ///   construction with a message naming the token and the alternatives.
    pub fn from_custom_line(line: &str, index: usize, executables: &[String]) -> Result<Self> {
        let name = format!("Custom-{}", index);

        let (executable, args) = split_command_line(line)
            .with_context(|| format!("Custom command {} is empty", index))?;

        if !executables.iter().any(|allowed| *allowed == executable) {
            bail!(
                "{} is not a valid executable choice, instead use one of {}",
                executable,
                pretty_list(executables)
            );
        }

        Ok(Self {
            name,
            executable,
            args,
            resolve_via_harness: true,
        })
    }

    /// The workload trace file this command drives: the first argument that
    /// is not a flag (quiet/verbosity flags like "-q" are skipped).
    ///
    /// Returns `None` for commands that name no trace file.
    pub fn workload_path(&self) -> Option<&str> {
        self.args
            .iter()
            .map(String::as_str)
            .find(|arg| !arg.starts_with('-'))
    }

    /// Re-join the command for display and for the `list` surface.
    pub fn command_line(&self) -> String {
        let mut parts = Vec::with_capacity(1 + self.args.len());
        parts.push(self.executable.clone());
        parts.extend(self.args.iter().cloned());
        parts.join(" ")
    }
}

/// Split a one-line command template into (executable, args).
///
/// Returns `None` when the line has no tokens at all.
fn split_command_line(line: &str) -> Option<(String, Vec<String>)> {
    let line = line.trim();
    let line = line.strip_prefix("./").unwrap_or(line);

    let mut tokens = line.split_whitespace();
    let executable = tokens.next()?.to_string();
    let args = tokens.map(str::to_string).collect();

    Some((executable, args))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn allow_list() -> Vec<String> {
        vec!["mytest".to_string(), "other".to_string()]
    }

    #[test]
    fn custom_line_with_dot_slash_prefix_succeeds() {
        let cmd = CommandDescriptor::from_custom_line("./mytest -q", 3, &allow_list()).unwrap();

        assert_eq!(cmd.name, "Custom-3");
        assert_eq!(cmd.executable, "mytest");
        assert_eq!(cmd.args, vec!["-q".to_string()]);
        assert!(cmd.resolve_via_harness);
    }

    #[test]
    fn custom_line_without_prefix_is_equivalent() {
        let with = CommandDescriptor::from_custom_line("./mytest -q t.rep", 0, &allow_list());
        let without = CommandDescriptor::from_custom_line("mytest -q t.rep", 0, &allow_list());
        assert_eq!(with.unwrap(), without.unwrap());
    }

    #[test]
    fn unlisted_executable_fails_construction() {
        let err = CommandDescriptor::from_custom_line("rm -rf /", 0, &allow_list()).unwrap_err();
        let msg = err.to_string();

        assert!(msg.contains("rm is not a valid executable choice"), "{}", msg);
        assert!(msg.contains("mytest, other"), "{}", msg);
    }

    #[test]
    fn empty_custom_line_fails_construction() {
        assert!(CommandDescriptor::from_custom_line("   ", 1, &allow_list()).is_err());
    }

    #[test]
    fn surrounding_whitespace_is_stripped() {
        let cmd = CommandDescriptor::from_custom_line("  mytest traces/a.rep \n", 2, &allow_list())
            .unwrap();
        assert_eq!(cmd.command_line(), "mytest traces/a.rep");
    }

    #[test]
    fn workload_path_skips_flags() {
        let cmd = CommandDescriptor::parse("Perf", "mdriver -q traces/coalesce.rep").unwrap();
        assert_eq!(cmd.workload_path(), Some("traces/coalesce.rep"));
    }

    #[test]
    fn workload_path_is_none_without_trace_arg() {
        let cmd = CommandDescriptor::parse("Perf", "mdriver -q -v").unwrap();
        assert_eq!(cmd.workload_path(), None);
    }

    #[test]
    fn builtin_parse_keeps_flag_off() {
        let cmd = CommandDescriptor::parse("Sanity", "./mdriver traces/sanity.rep").unwrap();
        assert_eq!(cmd.executable, "mdriver");
        assert!(!cmd.resolve_via_harness);
    }
}
