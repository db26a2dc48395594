//! The final encoded artifact.

use chrono::NaiveDateTime;

/// The authority-facing output file: Latin-1 bytes, one fixed-width line
/// per row, no header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedDocument {
    /// Declaration code the document belongs to.
    pub declaration_code: String,

    /// Latin-1 bytes, rows separated (and terminated) by `\n`.
    pub bytes: Vec<u8>,

    /// File extension derived from the declaration code (no leading dot).
    pub extension: String,

    /// Width in characters of every line.
    pub line_width: usize,

    /// Number of encoded rows.
    pub rows: usize,
}

impl EncodedDocument {
    /// Default output name, `DJ{code}_{timestamp}.{ext}`.
    pub fn suggested_file_name(&self, at: NaiveDateTime) -> String {
        format!(
            "DJ{}_{}.{}",
            self.declaration_code,
            at.format("%Y%m%d_%H%M%S"),
            self.extension
        )
    }
}
