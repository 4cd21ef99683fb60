// src/scoring.rs

//! Verdict classification.
//!
//! This module is responsible for:
//! - The sanity policy (exit status + success marker)
//! - The instruction-count policy (profiler metrics per workload request)
//!
//! Custom tests delegate to the instruction-count policy; only their
//! command construction differs (see `command`).
//!
//! Failure containment is the contract here: a scoring call is a pure
//! function of the capture and the test's command, and it always returns a
//! Verdict. Any failure while extracting or computing a metric (missing
//! workload file, garbled profiler fields, zero-request division) collapses
//! to Incorrect with one generic diagnostic; nothing propagates to the
//! caller.

use crate::capture::CapturedExecution;
use crate::command::CommandDescriptor;
use crate::config::TestKind;
use crate::profiler;
use crate::verdict::Verdict;
use crate::workload;

use anyhow::{Context, Result};
use std::path::Path;

/// Literal substring the driver prints on a fully passing run.
pub const SUCCESS_MARKER: &str = "successfully";

/// Literal substring the driver prints when instrumentation itself fails.
pub const FAILURE_MARKER: &str = "ALLOCATOR FAILURE";

const ALLOCATOR_FAILURE_MSG: &str =
    "No instruction count, test_harness reported ALLOCATOR FAILURE";
const SCRAPE_FAILED_MSG: &str = "Unable to scrape performance information";

/// The closed set of scoring policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoringPolicy {
    Sanity,
    InstructionCount,
}

impl ScoringPolicy {
    pub fn for_kind(kind: TestKind) -> Self {
        match kind {
            TestKind::Sanity => ScoringPolicy::Sanity,
            TestKind::Perf => ScoringPolicy::InstructionCount,
        }
    }

    /// Grade one captured execution.
    pub fn score(self, command: &CommandDescriptor, execution: &CapturedExecution) -> Verdict {
        match self {
            ScoringPolicy::Sanity => score_sanity(execution),
            ScoringPolicy::InstructionCount => score_instruction_count(command, execution),
        }
    }
}

/* ---------------- sanity ---------------- */

fn score_sanity(execution: &CapturedExecution) -> Verdict {
    let sanitized = sanitize_for_report(&execution.output);

    if execution.exit_code == 0 && sanitized.contains(SUCCESS_MARKER) {
        Verdict::Correct(sanitized)
    } else {
        Verdict::Incorrect(sanitized)
    }
}

/// Trim surrounding whitespace and escape literal percent characters.
///
/// Short messages are later interpolated through a percent-style formatter
/// by the reporting layer, so a literal `%` must arrive as `%%`. No other
/// transformation is applied.
fn sanitize_for_report(output: &str) -> String {
    output.trim().replace('%', "%%")
}

/* ---------------- instruction count ---------------- */

fn score_instruction_count(
    command: &CommandDescriptor,
    execution: &CapturedExecution,
) -> Verdict {
    // Known instrumentation-level crash: checked before any parsing so it
    // gets a more specific diagnostic than the generic catch-all.
    if execution.output.contains(FAILURE_MARKER) {
        return Verdict::Incorrect(ALLOCATOR_FAILURE_MSG.to_string());
    }

    match scrape_performance(command, &execution.output) {
        Ok(message) => Verdict::Correct(message),
        Err(err) => {
            tracing::debug!(test = %command.name, error = %err, "performance scrape failed");
            Verdict::Incorrect(SCRAPE_FAILED_MSG.to_string())
        }
    }
}

/// The fallible extraction pipeline.
///
/// Each step returns a Result; the caller collapses any failure into the
/// single generic diagnostic.
fn scrape_performance(command: &CommandDescriptor, output: &str) -> Result<String> {
    let workload_file = command
        .workload_path()
        .context("Command names no workload file")?;

    let nrequests = workload::count_requests(Path::new(workload_file))?;

    let metrics = profiler::scrape_metrics(output)?;

    // Truncating division; a request-free workload is an error, not a
    // zero-cost run.
    let per_request = metrics
        .total_instruction_refs
        .checked_div(nrequests)
        .context("Workload contains no requests")?;

    tracing::info!(
        test = %command.name,
        refs = metrics.total_instruction_refs,
        nrequests,
        per_request,
        utilization = metrics.utilization_percent,
        "scraped performance figures"
    );

    Ok(format!(
        "Counted {} instructions for {} requests. {} instructions/request, utilization {}%",
        metrics.refs_display, nrequests, per_request, metrics.utilization_percent
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn capture(output: &str, exit_code: i32) -> CapturedExecution {
        CapturedExecution::new(output, exit_code)
    }

    fn perf_command(trace: &Path) -> CommandDescriptor {
        let line = format!("mdriver -q {}", trace.display());
        CommandDescriptor::parse("Perf", &line).unwrap()
    }

    fn trace_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(contents.as_bytes()).expect("write trace");
        file
    }

    fn sanity_command() -> CommandDescriptor {
        CommandDescriptor::parse("Sanity", "mdriver traces/sanity.rep").unwrap()
    }

    /* ---------------- sanity policy ---------------- */

    #[test]
    fn sanity_passes_on_marker_and_zero_exit() {
        let verdict = ScoringPolicy::Sanity.score(
            &sanity_command(),
            &capture("  all traces completed successfully\n", 0),
        );

        assert_eq!(
            verdict,
            Verdict::Correct("all traces completed successfully".to_string())
        );
    }

    #[test]
    fn sanity_fails_on_nonzero_exit_regardless_of_output() {
        let verdict = ScoringPolicy::Sanity.score(
            &sanity_command(),
            &capture("all traces completed successfully", 139),
        );

        assert!(!verdict.is_correct());
        assert_eq!(verdict.message(), "all traces completed successfully");
    }

    #[test]
    fn sanity_fails_without_marker() {
        let verdict =
            ScoringPolicy::Sanity.score(&sanity_command(), &capture("trace 3 failed", 0));
        assert!(!verdict.is_correct());
    }

    #[test]
    fn sanity_escapes_percent_for_the_report_formatter() {
        let verdict = ScoringPolicy::Sanity.score(
            &sanity_command(),
            &capture("utilization 55% achieved successfully", 0),
        );

        assert_eq!(
            verdict.message(),
            "utilization 55%% achieved successfully"
        );
    }

    /* ---------------- instruction-count policy ---------------- */

    fn profiler_output() -> &'static str {
        "Utilization averaged 74%\n==99== I   refs:      1,234,567\n"
    }

    #[test]
    fn perf_reports_per_request_cost_and_utilization() {
        // Four request lines → 1,234,567 / 4 = 308,641 (truncating)
        let trace = trace_file("a 0 16\na 1 32\nf 0\nr 1 64\n");

        let verdict = ScoringPolicy::InstructionCount
            .score(&perf_command(trace.path()), &capture(profiler_output(), 0));

        assert_eq!(
            verdict,
            Verdict::Correct(
                "Counted 1,234,567 instructions for 4 requests. \
                 308641 instructions/request, utilization 74%"
                    .to_string()
            )
        );
    }

    #[test]
    fn allocator_failure_marker_wins_over_valid_metrics() {
        let trace = trace_file("a 0 16\n");
        let output = format!("ALLOCATOR FAILURE\n{}", profiler_output());

        let verdict = ScoringPolicy::InstructionCount
            .score(&perf_command(trace.path()), &capture(&output, 0));

        assert_eq!(
            verdict,
            Verdict::Incorrect(
                "No instruction count, test_harness reported ALLOCATOR FAILURE".to_string()
            )
        );
    }

    #[test]
    fn marker_free_workload_folds_into_generic_failure() {
        // No 'a'/'f'/'r' lines → nrequests = 0 → division is caught, not
        // propagated.
        let trace = trace_file("header only\n");

        let verdict = ScoringPolicy::InstructionCount
            .score(&perf_command(trace.path()), &capture(profiler_output(), 0));

        assert_eq!(
            verdict,
            Verdict::Incorrect("Unable to scrape performance information".to_string())
        );
    }

    #[test]
    fn missing_refs_line_yields_generic_failure() {
        let trace = trace_file("a 0 16\n");

        let verdict = ScoringPolicy::InstructionCount.score(
            &perf_command(trace.path()),
            &capture("Utilization averaged 74%\n", 0),
        );

        assert_eq!(
            verdict,
            Verdict::Incorrect("Unable to scrape performance information".to_string())
        );
    }

    #[test]
    fn missing_workload_file_yields_generic_failure() {
        let command = CommandDescriptor::parse("Perf", "mdriver -q /no/such/file.rep").unwrap();

        let verdict =
            ScoringPolicy::InstructionCount.score(&command, &capture(profiler_output(), 0));

        assert_eq!(
            verdict,
            Verdict::Incorrect("Unable to scrape performance information".to_string())
        );
    }

    #[test]
    fn custom_commands_share_the_perf_policy() {
        let trace = trace_file("a 0 8\nf 0\n");
        let line = format!("./mytest -q {}", trace.path().display());
        let command =
            CommandDescriptor::from_custom_line(&line, 0, &["mytest".to_string()]).unwrap();

        let verdict = ScoringPolicy::for_kind(TestKind::Perf)
            .score(&command, &capture(profiler_output(), 0));

        assert!(verdict.is_correct());
        assert!(verdict.message().contains("for 2 requests"));
    }
}
