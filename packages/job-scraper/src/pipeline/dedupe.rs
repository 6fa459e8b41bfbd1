//! Phase 2: fingerprint deduplication.

use serde_json::Value;
use std::collections::HashSet;

use crate::record::{flatten, FlatRow};

/// Content fingerprint used to detect reposted summaries.
pub const FINGERPRINT_KEY: &str = "bulletFields";

/// Flatten summaries and drop repeats of an already-seen fingerprint.
pub fn dedupe(summaries: &[Value]) -> Vec<FlatRow> {
    dedupe_rows(summaries.iter().map(flatten).collect())
}

/// Keep the first row for each fingerprint, preserving order.
///
/// If no row carries the fingerprint field this is a pass-through. Rows
/// missing it in an otherwise fingerprinted set share the null fingerprint.
pub fn dedupe_rows(rows: Vec<FlatRow>) -> Vec<FlatRow> {
    if !rows.iter().any(|row| row.contains_key(FINGERPRINT_KEY)) {
        return rows;
    }

    let mut seen = HashSet::new();
    rows.into_iter()
        .filter(|row| seen.insert(fingerprint(row)))
        .collect()
}

fn fingerprint(row: &FlatRow) -> String {
    row.get(FINGERPRINT_KEY)
        .unwrap_or(&Value::Null)
        .to_string()
}
