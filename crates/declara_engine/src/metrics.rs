//! Per-run timing and count metrics.

use std::time::Instant;

/// Timings and counts collected over one processing run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunMetrics {
    /// Rows after merging (composite) or as supplied (simple).
    pub rows: usize,
    /// Validation errors found.
    pub errors: usize,
    /// Rules skipped during validation.
    pub skipped_rules: usize,
    /// Lookup tables the run failed to load.
    pub unavailable_tables: usize,
    /// Schema and lookup-table loading, milliseconds.
    pub load_ms: u64,
    /// Section merging, milliseconds (zero for simple declarations).
    pub merge_ms: u64,
    /// Validation, milliseconds.
    pub validate_ms: u64,
    /// Encoding, milliseconds (zero when the run stopped before encoding).
    pub encode_ms: u64,
    /// Whole run, milliseconds.
    pub total_ms: u64,
}

/// Stopwatch for one pipeline phase.
pub(crate) fn elapsed_ms(since: Instant) -> u64 {
    since.elapsed().as_millis() as u64
}
