// src/runner.rs

use crate::capture::CapturedExecution;
use crate::cli::{Cli, Command};
use crate::config::{Config, Suite, TestCase};
use crate::scoring::ScoringPolicy;
use crate::validate::validate_config;
use crate::verdict::Verdict;

use anyhow::{Context, Result};
use serde_json::Value;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};

/// Entry point from `main.rs`.
pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Score {
            config,
            test,
            capture,
            exit_code,
            output,
        } => run_score(&config, &test, &capture, exit_code, &output),

        Command::Validate { config } => run_validate(&config),

        Command::List { config } => run_list(&config),

        Command::Init => init_scaffold(),
    }
}

/* ---------------- score ---------------- */

fn run_score(
    config_path: &Path,
    test_name: &str,
    capture_path: &Path,
    exit_code: i32,
    output_mode: &str,
) -> Result<()> {
    let cfg = Config::load(config_path)?;
    let suite = cfg.build_suite()?;

    let case = suite
        .find(test_name)
        .with_context(|| format!("No test named {:?} in suite", test_name))?;

    let execution = CapturedExecution::load(capture_path, exit_code)?;

    tracing::info!(
        test = %case.command.name,
        capture = %capture_path.display(),
        exit_code,
        "scoring capture"
    );

    let verdict = ScoringPolicy::for_kind(case.kind).score(&case.command, &execution);

    let rendered = match output_mode {
        "json" => serde_json::to_string(&build_envelope(case, capture_path, exit_code, &verdict))
            .context("Failed to format verdict as JSON")?,
        _ => format_simple(case, &verdict, should_use_color()),
    };
    println!("{}", rendered);

    // The verdict is data, not a process failure: the harness reads it from
    // stdout, so an Incorrect capture still exits 0.
    Ok(())
}

fn build_envelope(
    case: &TestCase,
    capture_path: &Path,
    exit_code: i32,
    verdict: &Verdict,
) -> Value {
    let mut envelope = serde_json::to_value(verdict).unwrap_or(Value::Null);

    if let Some(map) = envelope.as_object_mut() {
        map.insert(
            "test".to_string(),
            Value::String(case.command.name.clone()),
        );
        map.insert(
            "meta".to_string(),
            serde_json::json!({
                "command": case.command.command_line(),
                "capture": capture_path.display().to_string(),
                "exit_code": exit_code,
                "scored_at": chrono::Utc::now().to_rfc3339(),
            }),
        );
    }

    envelope
}

fn format_simple(case: &TestCase, verdict: &Verdict, use_color: bool) -> String {
    let ok = verdict.is_correct();
    let status = if ok { "CORRECT" } else { "INCORRECT" };
    let status = paint(status, if ok { "32" } else { "31" }, use_color);

    let mut out = String::new();
    out.push_str(&format!("{} {}\n", status, case.command.name));
    out.push_str(&format!("command: {}\n", case.command.command_line()));
    out.push_str(&format!("message: {}", verdict.message()));
    out
}

fn should_use_color() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    std::io::stdout().is_terminal()
}

fn paint(text: &str, color: &str, use_color: bool) -> String {
    if use_color {
        format!("\x1b[{}m{}\x1b[0m", color, text)
    } else {
        text.to_string()
    }
}

/* ---------------- validate ---------------- */

fn run_validate(config_path: &Path) -> Result<()> {
    let cfg = Config::load(config_path)?;
    let result = validate_config(&cfg);

    println!("{}", serde_json::to_string(&result)?);

    if !result.is_valid() {
        anyhow::bail!("Suite config is invalid");
    }
    Ok(())
}

/* ---------------- list ---------------- */

fn run_list(config_path: &Path) -> Result<()> {
    let cfg = Config::load(config_path)?;
    let suite = cfg.build_suite()?;

    println!("{}", serde_json::to_string(&suite_json(&suite))?);
    Ok(())
}

fn suite_json(suite: &Suite) -> Value {
    let tests = suite
        .tests
        .iter()
        .map(|case| {
            serde_json::json!({
                "name": case.command.name,
                "kind": case.kind,
                "command": case.command.command_line(),
                "resolve_via_harness": case.command.resolve_via_harness,
                "workload": case.command.workload_path(),
            })
        })
        .collect::<Vec<_>>();

    serde_json::json!({
        "profiler_wrapper": suite.profiler_wrapper,
        "tests": tests,
    })
}

/* ---------------- init scaffold ---------------- */

fn init_scaffold() -> Result<()> {
    if !Path::new("suite.yaml").exists() {
        std::fs::write("suite.yaml", default_suite_yaml())
            .context("Failed to write suite.yaml")?;
        eprintln!("Created suite.yaml");
    } else {
        eprintln!("suite.yaml already exists (skipping)");
    }

    if !PathBuf::from("traces").exists() {
        std::fs::create_dir_all("traces").context("Failed to create traces directory")?;
        eprintln!("Created traces/");
    }

    Ok(())
}

fn default_suite_yaml() -> &'static str {
    r#"
# Permitted driver executables. Custom commands may only invoke these.
executables:
  - mdriver

# Built-in tests. kind: sanity | perf
tests:
  - name: Sanity
    kind: sanity
    command: mdriver traces/sanity.rep

  - name: Perf-coalesce
    kind: perf
    command: mdriver -q traces/coalesce.rep

# Per-assignment commands, one test each, named Custom-0, Custom-1, ...
# A leading ./ is accepted and ignored.
custom_commands:
  - ./mdriver -q traces/custom1.rep

# Wrapper the harness prepends to perf test commands. The default counts
# instructions only inside the allocator entry points.
# profiler:
#   wrapper: /usr/bin/valgrind --tool=callgrind ...
"#
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::CommandDescriptor;
    use crate::config::TestKind;

    fn case() -> TestCase {
        TestCase {
            kind: TestKind::Perf,
            command: CommandDescriptor::parse("Perf", "mdriver -q traces/a.rep").unwrap(),
        }
    }

    #[test]
    fn envelope_carries_verdict_and_meta() {
        let verdict = Verdict::Correct("ok".to_string());
        let envelope = build_envelope(&case(), Path::new("out.txt"), 0, &verdict);

        assert_eq!(envelope["verdict"], "correct");
        assert_eq!(envelope["message"], "ok");
        assert_eq!(envelope["test"], "Perf");
        assert_eq!(envelope["meta"]["exit_code"], 0);
        assert_eq!(envelope["meta"]["command"], "mdriver -q traces/a.rep");
    }

    #[test]
    fn simple_output_is_plain_without_color() {
        let verdict = Verdict::Incorrect("Unable to scrape performance information".to_string());
        let rendered = format_simple(&case(), &verdict, false);

        assert!(rendered.starts_with("INCORRECT Perf\n"));
        assert!(rendered.ends_with("message: Unable to scrape performance information"));
    }
}
