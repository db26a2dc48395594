//! Row-set representation of the table being processed.
//!
//! A [`RowSet`] is created per run from input data and, apart from the
//! section merger, treated as immutable once handed to the validation
//! engine.

use std::collections::HashMap;

use chrono::NaiveDate;

/// A scalar value in a row.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Null/missing value.
    Null,
    /// Text value.
    Text(String),
    /// Integer value.
    Int(i64),
    /// Floating point value.
    Float(f64),
    /// Boolean value.
    Bool(bool),
    /// Calendar date.
    Date(NaiveDate),
}

impl Value {
    /// Returns true for null, or for blank text (the metadata store treats
    /// whitespace-only cells as absent).
    pub fn is_null(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Returns the kind name of this value.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Text(_) => "text",
            Value::Int(_) => "integer",
            Value::Float(_) => "float",
            Value::Bool(_) => "boolean",
            Value::Date(_) => "date",
        }
    }

    /// Numeric view of the value, coercing numeric text.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            Value::Text(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
    }

    /// Textual form used by `length()` and lookups; `None` for null.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Value::Null => None,
            Value::Text(s) => Some(s.clone()),
            Value::Int(i) => Some(i.to_string()),
            Value::Float(f) => Some(f.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            Value::Date(d) => Some(d.format("%Y-%m-%d").to_string()),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Value::Date(d)
    }
}

/// A single row: technical field code → value. Absent codes read as null.
pub type Row = HashMap<String, Value>;

/// The working table of a processing run.
#[derive(Debug, Clone, Default)]
pub struct RowSet {
    rows: Vec<Row>,
    header_offset: usize,
}

impl RowSet {
    /// Creates an empty row set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a row set from rows.
    pub fn from_rows(rows: Vec<Row>) -> Self {
        Self {
            rows,
            header_offset: 0,
        }
    }

    /// Declares how many header lines the input source consumed before the
    /// first data row; reported row numbers are shifted by this offset.
    pub fn with_header_offset(mut self, offset: usize) -> Self {
        self.header_offset = offset;
        self
    }

    /// Header offset declared by the input source.
    pub fn header_offset(&self) -> usize {
        self.header_offset
    }

    /// 1-based row number as reported to the operator.
    pub fn display_row(&self, index: usize) -> usize {
        index + 1 + self.header_offset
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the row set holds no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterates rows in input order.
    pub fn rows(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter()
    }

    /// Gets a row by 0-based index.
    pub fn get(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    /// Appends a row.
    pub fn push(&mut self, row: Row) {
        self.rows.push(row);
    }
}

impl FromIterator<Row> for RowSet {
    fn from_iter<T: IntoIterator<Item = Row>>(iter: T) -> Self {
        Self {
            rows: iter.into_iter().collect(),
            header_offset: 0,
        }
    }
}

/// One section's rows of a composite declaration, tagged with the section
/// name declared in the schema.
#[derive(Debug, Clone)]
pub struct SectionRowSet {
    /// Section tag matching the schema's field section tags.
    pub section: String,
    /// The section's rows.
    pub rows: RowSet,
}

impl SectionRowSet {
    /// Creates a tagged section row set.
    pub fn new(section: impl Into<String>, rows: RowSet) -> Self {
        Self {
            section: section.into(),
            rows,
        }
    }
}

/// Convenience for building a row from (code, value) pairs.
pub fn row(pairs: &[(&str, Value)]) -> Row {
    pairs
        .iter()
        .map(|(code, value)| (code.to_string(), value.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn blank_text_is_null() {
        assert!(Value::Null.is_null());
        assert!(Value::Text("   ".into()).is_null());
        assert!(!Value::Text("x".into()).is_null());
        assert!(!Value::Int(0).is_null());
    }

    #[test]
    fn numeric_coercion() {
        assert_eq!(Value::Int(42).as_number(), Some(42.0));
        assert_eq!(Value::Text(" 3.5 ".into()).as_number(), Some(3.5));
        assert_eq!(Value::Text("abc".into()).as_number(), None);
        assert_eq!(Value::Bool(true).as_number(), None);
    }

    #[test]
    fn display_row_honours_header_offset() {
        let rows = RowSet::from_rows(vec![row(&[("C1", Value::Int(1))])]).with_header_offset(1);
        assert_eq!(rows.display_row(0), 2);
    }
}
