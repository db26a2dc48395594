//! Error taxonomy for declaration processing.
//!
//! Metadata and structural errors abort a run before any row is touched;
//! per-rule evaluation problems never surface here — the validation engine
//! records them as skipped rules inside the report instead.

use thiserror::Error;

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Fatal errors of the processing pipeline.
#[derive(Error, Debug)]
pub enum EngineError {
    /// No declaration with the requested code exists in the metadata store.
    #[error("declaration '{0}' not found")]
    SchemaNotFound(String),

    /// The schema's metadata is malformed and cannot produce a trustworthy
    /// report.
    #[error("invalid schema '{code}': {reason}")]
    InvalidSchema {
        /// Declaration code
        code: String,
        /// What is wrong with the metadata
        reason: String,
    },

    /// Two sections supplied different values for the same field and
    /// record key.
    #[error("merge conflict for record key '{key}': sections disagree on field '{field}'")]
    MergeConflict {
        /// Record key of the conflicting logical row
        key: String,
        /// Field code both sections populate
        field: String,
    },

    /// A section row is missing the record-key column.
    #[error("section '{section}' row {row} is missing the record key column '{key_field}'")]
    MissingRecordKey {
        /// Section tag
        section: String,
        /// 1-based row number inside the section
        row: usize,
        /// Record-key column name
        key_field: String,
    },

    /// A formatted value does not fit its declared width.
    #[error("value for field '{field}' (row {row}) exceeds declared width {width}: '{value}'")]
    FieldOverflow {
        /// Field code
        field: String,
        /// 1-based row number
        row: usize,
        /// Declared width
        width: usize,
        /// The formatted value that did not fit
        value: String,
    },

    /// A value cannot be rendered in the field's data kind or encoding.
    #[error("cannot encode field '{field}' (row {row}): {reason}")]
    Encoding {
        /// Field code
        field: String,
        /// 1-based row number
        row: usize,
        /// Why the value cannot be rendered
        reason: String,
    },

    /// The provider cannot supply a referenced lookup table.
    #[error("lookup table '{0}' unavailable")]
    LookupUnavailable(String),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic error.
    #[error("{0}")]
    Other(String),
}

impl EngineError {
    /// Creates an [`EngineError::InvalidSchema`].
    pub fn invalid_schema(code: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidSchema {
            code: code.into(),
            reason: reason.into(),
        }
    }

    /// Creates an [`EngineError::MergeConflict`].
    pub fn merge_conflict(key: impl Into<String>, field: impl Into<String>) -> Self {
        Self::MergeConflict {
            key: key.into(),
            field: field.into(),
        }
    }

    /// Creates an [`EngineError::Encoding`].
    pub fn encoding(field: impl Into<String>, row: usize, reason: impl Into<String>) -> Self {
        Self::Encoding {
            field: field.into(),
            row,
            reason: reason.into(),
        }
    }
}
