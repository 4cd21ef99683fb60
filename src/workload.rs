// src/workload.rs

//! Workload descriptor reading.
//!
//! A workload trace file lists one allocator request per line, tagged by a
//! leading operation marker:
//! - 'a' = alloc
//! - 'f' = free
//! - 'r' = realloc
//!
//! Only the count of request lines matters here; the per-request fields are
//! the driver's business, not the grader's. Lines with any other leading
//! character (headers, comments, blanks) are ignored.

use crate::util::read_to_string;

use anyhow::Result;
use std::path::Path;

/// Count the requests in a workload trace file.
///
/// A line counts iff its first character is 'a', 'f', or 'r'.
pub fn count_requests(path: &Path) -> Result<u64> {
    let raw = read_to_string(path)?;

    let count = raw
        .lines()
        .filter(|line| matches!(line.as_bytes().first(), Some(b'a' | b'f' | b'r')))
        .count();

    Ok(count as u64)
}
