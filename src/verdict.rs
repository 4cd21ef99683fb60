// src/verdict.rs

//! Verdicts.
//!
//! The only value that crosses back to the harness. Exactly two outcome
//! kinds, each carrying one short display string; all derived numbers are
//! pre-formatted into the string, so the message doubles as the audit
//! trail.

use serde::Serialize;

/// Outcome of grading one submission against one test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "verdict", content = "message", rename_all = "lowercase")]
pub enum Verdict {
    Correct(String),
    Incorrect(String),
}

impl Verdict {
    pub fn is_correct(&self) -> bool {
        matches!(self, Verdict::Correct(_))
    }

    pub fn message(&self) -> &str {
        match self {
            Verdict::Correct(msg) | Verdict::Incorrect(msg) => msg,
        }
    }
}
