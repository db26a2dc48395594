//! Declaration schema types.
//!
//! This module contains the metadata model for a sworn tax declaration
//! (Declaración Jurada): the declaration header, its output fields and the
//! validation rules bound to them. Schemas are read-only snapshots loaded
//! once per processing run from a [`SchemaProvider`](crate::SchemaProvider)
//! and never mutated by the engine.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// How a declaration is assembled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeclarationKind {
    /// One flat table of fields.
    Simple,
    /// Multiple named sections merged by record key.
    Composite,
}

/// Data kind of an output column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataKind {
    /// Free text, emitted as-is.
    Text,
    /// Whole number, no thousands separators.
    Integer,
    /// Fixed-point number; `decimals` digits, separator removed on output.
    Decimal,
    /// Calendar date, emitted as `YYYYMMDD`.
    Date,
}

/// Horizontal alignment of a value inside its fixed-width slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    /// Value left, padding right.
    Left,
    /// Value right, padding left.
    Right,
    /// Padding split, odd remainder on the right.
    Center,
}

fn default_pad() -> char {
    ' '
}

fn default_active() -> bool {
    true
}

/// One output column of a declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldDef {
    /// Technical code (e.g. "C1"), the key under which row values are stored.
    pub code: String,

    /// Human-readable name.
    pub name: String,

    /// Data kind driving formatting and rule coercions.
    pub kind: DataKind,

    /// Fixed output width in characters.
    pub width: usize,

    /// Decimal places; only meaningful for [`DataKind::Decimal`].
    #[serde(default)]
    pub decimals: u8,

    /// Whether the column must be present in the input; a required column
    /// absent from every row is a whole-column validation error.
    #[serde(default)]
    pub required: bool,

    /// 1-based output position; positions are unique and contiguous.
    pub position: usize,

    /// Alignment inside the fixed-width slot.
    pub alignment: Alignment,

    /// Padding character (single char).
    #[serde(default = "default_pad")]
    pub pad: char,

    /// Optional reference table used by lookup rules on this field.
    #[serde(default)]
    pub lookup_table: Option<String>,

    /// Section tag; mandatory on composite declarations.
    #[serde(default)]
    pub section: Option<String>,

    /// Optional free-form description.
    #[serde(default)]
    pub description: Option<String>,
}

/// Kind of a validation rule.
///
/// `Required` rules are evaluated before any other kind on the same field;
/// a failure suppresses the field's remaining rules for that row. All other
/// kinds are independent and always evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleKind {
    Required,
    Range,
    Pattern,
    Lookup,
    Conditional,
}

/// One validation rule bound to a field.
///
/// The `expression` keeps the textual form persisted in the metadata store;
/// it is compiled into the closed rule grammar at schema-load time and a
/// text that does not compile rejects the whole schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleDef {
    /// Technical code of the owning field.
    pub field: String,

    /// Rule code, unique within the declaration (e.g. "H997").
    pub code: String,

    /// Rule kind.
    pub kind: RuleKind,

    /// Rule expression text; ignored for `Required` rules.
    #[serde(default)]
    pub expression: String,

    /// Error message template; `{row}`, `{field}` and `{rule}` placeholders
    /// are substituted when an error is reported.
    pub message: String,

    /// Inactive rules are recorded as skipped, never evaluated.
    #[serde(default = "default_active")]
    pub active: bool,
}

/// A declaration type: header plus ordered fields and rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeclarationSchema {
    /// Stable declaration code (e.g. "1922").
    pub code: String,

    /// Display name.
    pub name: String,

    /// Simple or composite.
    pub kind: DeclarationKind,

    /// Inactive declarations are kept in the store but not processed.
    #[serde(default = "default_active")]
    pub active: bool,

    /// Column holding the record key joining sections; composite only.
    #[serde(default)]
    pub key_field: Option<String>,

    /// Ordered field definitions.
    pub fields: Vec<FieldDef>,

    /// Validation rules, in declared order.
    #[serde(default)]
    pub rules: Vec<RuleDef>,

    /// Optional free-form description.
    #[serde(default)]
    pub description: Option<String>,
}

impl DeclarationSchema {
    /// Checks the structural invariants of the schema.
    ///
    /// Rejects duplicate or non-contiguous field positions, zero widths,
    /// duplicate field or rule codes, rules bound to unknown fields and,
    /// for composite declarations, fields without a section tag or a
    /// missing record-key column.
    pub fn validate(&self) -> Result<()> {
        if self.fields.is_empty() {
            return Err(EngineError::invalid_schema(
                &self.code,
                "schema defines no fields",
            ));
        }

        let mut positions: Vec<usize> = self.fields.iter().map(|f| f.position).collect();
        positions.sort_unstable();
        for (expected, position) in (1..).zip(positions.iter()) {
            if *position != expected {
                return Err(EngineError::invalid_schema(
                    &self.code,
                    format!(
                        "field positions must be unique and contiguous from 1; found {position} where {expected} was expected"
                    ),
                ));
            }
        }

        let mut field_codes = std::collections::HashSet::new();
        for field in &self.fields {
            if !field_codes.insert(field.code.as_str()) {
                return Err(EngineError::invalid_schema(
                    &self.code,
                    format!("duplicate field code '{}'", field.code),
                ));
            }
            if field.width == 0 {
                return Err(EngineError::invalid_schema(
                    &self.code,
                    format!("field '{}' has zero width", field.code),
                ));
            }
            if self.kind == DeclarationKind::Composite
                && field.section.as_deref().unwrap_or("").is_empty()
            {
                return Err(EngineError::invalid_schema(
                    &self.code,
                    format!(
                        "composite declaration requires a section tag on field '{}'",
                        field.code
                    ),
                ));
            }
        }

        if self.kind == DeclarationKind::Composite
            && self.key_field.as_deref().unwrap_or("").is_empty()
        {
            return Err(EngineError::invalid_schema(
                &self.code,
                "composite declaration requires a key_field",
            ));
        }

        let mut rule_codes = std::collections::HashSet::new();
        for rule in &self.rules {
            if !rule_codes.insert(rule.code.as_str()) {
                return Err(EngineError::invalid_schema(
                    &self.code,
                    format!("duplicate rule code '{}'", rule.code),
                ));
            }
            if !field_codes.contains(rule.field.as_str()) {
                return Err(EngineError::invalid_schema(
                    &self.code,
                    format!("rule '{}' references unknown field '{}'", rule.code, rule.field),
                ));
            }
        }

        Ok(())
    }

    /// Looks up a field definition by technical code.
    pub fn field(&self, code: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.code == code)
    }

    /// Fields in ascending output-position order.
    pub fn fields_in_order(&self) -> Vec<&FieldDef> {
        let mut ordered: Vec<&FieldDef> = self.fields.iter().collect();
        ordered.sort_by_key(|f| f.position);
        ordered
    }

    /// Active rules bound to a field, in declared order.
    pub fn rules_for(&self, field_code: &str) -> impl Iterator<Item = &RuleDef> {
        self.rules
            .iter()
            .filter(move |r| r.field == field_code && r.active)
    }

    /// Distinct section tags in ascending order.
    pub fn sections(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = self
            .fields
            .iter()
            .filter_map(|f| f.section.as_deref())
            .collect();
        tags.sort_unstable();
        tags.dedup();
        tags
    }

    /// Total encoded line width: the sum of all field widths.
    pub fn line_width(&self) -> usize {
        self.fields.iter().map(|f| f.width).sum()
    }

    /// Authority-facing file extension: the last three characters of the
    /// declaration code (e.g. "1922" → "922").
    pub fn file_extension(&self) -> &str {
        match self.code.char_indices().rev().nth(2) {
            Some((start, _)) => &self.code[start..],
            None => &self.code,
        }
    }
}
