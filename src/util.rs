// src/util.rs

use anyhow::{Context, Result};
use std::path::Path;

/// Read a UTF-8 file into a String with a clear error message.
///
/// This is mainly used for:
/// - captured output files
/// - workload trace files
pub fn read_to_string(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read file {:?}", path))
}

/// Render a list of names for an error message.
///
/// Example:
/// ["mdriver", "mdriver-implicit"] → "mdriver, mdriver-implicit"
pub fn pretty_list(items: &[String]) -> String {
    items.join(", ")
}
