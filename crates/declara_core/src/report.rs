//! Validation report types.
//!
//! A report is produced by the validation engine, never mutated afterwards,
//! and owned by the caller once returned. Skipped rules never affect
//! validity but are always surfaced for operator visibility.

use serde::{Deserialize, Serialize};

/// One validation finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    /// 1-based row number (header offset included); `None` for findings
    /// that concern a whole column rather than one row.
    pub row: Option<usize>,

    /// Technical field code.
    pub field: String,

    /// Rule code that failed.
    pub rule: String,

    /// Populated error message.
    pub message: String,
}

/// A rule that could not be evaluated and was skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedRule {
    /// 1-based row number, `None` when the whole rule was skipped.
    pub row: Option<usize>,

    /// Technical field code.
    pub field: String,

    /// Rule code.
    pub rule: String,

    /// Why the rule was skipped (inactive, evaluation fault, missing
    /// lookup table, ...).
    pub reason: String,
}

/// Summary counts of a validation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationSummary {
    /// Rows examined.
    pub rows: usize,

    /// Total errors found.
    pub total_errors: usize,

    /// Distinct field codes with at least one error, in first-error order.
    pub failing_fields: Vec<String>,
}

/// Structured result of validating a row set against a schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    /// False iff the error list is non-empty.
    pub valid: bool,

    /// Findings in row/field/rule order.
    pub errors: Vec<ValidationError>,

    /// Rules that could not be evaluated.
    pub skipped: Vec<SkippedRule>,

    /// Summary counts.
    pub summary: ValidationSummary,
}

impl ValidationReport {
    /// Creates an empty, passing report for `rows` examined rows.
    pub fn passing(rows: usize) -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            skipped: Vec::new(),
            summary: ValidationSummary {
                rows,
                ..ValidationSummary::default()
            },
        }
    }

    /// Appends an error, flipping validity and updating the summary.
    pub fn add_error(&mut self, error: ValidationError) {
        if !self.summary.failing_fields.iter().any(|f| *f == error.field) {
            self.summary.failing_fields.push(error.field.clone());
        }
        self.errors.push(error);
        self.summary.total_errors = self.errors.len();
        self.valid = false;
    }

    /// Records a skipped rule.
    pub fn add_skipped(&mut self, skipped: SkippedRule) {
        self.skipped.push(skipped);
    }
}

/// Substitutes `{row}`, `{field}` and `{rule}` placeholders in a message
/// template.
pub fn render_message(template: &str, row: Option<usize>, field: &str, rule: &str) -> String {
    let row_text = row.map(|r| r.to_string()).unwrap_or_default();
    template
        .replace("{row}", &row_text)
        .replace("{field}", field)
        .replace("{rule}", rule)
}
