//! Schema provider seam.
//!
//! The metadata store is external to the engine: any source able to hand
//! out declaration schemas and lookup tables satisfies [`SchemaProvider`].
//! Implementations must be read-only; schemas and tables are immutable
//! snapshots for the duration of a run and safely shareable across runs.

use std::collections::HashMap;

use crate::error::{EngineError, Result};
use crate::schema::DeclarationSchema;

/// A reference table used by lookup rules (e.g. commune codes, currency
/// codes).
#[derive(Debug, Clone)]
pub struct LookupTable {
    /// Table name as referenced by rules.
    pub name: String,
    /// Column names.
    pub columns: Vec<String>,
    /// Row-major cell data, textual form.
    pub rows: Vec<Vec<String>>,
}

impl LookupTable {
    /// Creates a lookup table from columns and rows.
    pub fn new(
        name: impl Into<String>,
        columns: Vec<String>,
        rows: Vec<Vec<String>>,
    ) -> Self {
        Self {
            name: name.into(),
            columns,
            rows,
        }
    }

    fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    /// Finds the first row whose `key_column` cell equals `key` and returns
    /// its `return_column` cell.
    pub fn get(&self, key_column: &str, key: &str, return_column: &str) -> Option<&str> {
        let key_idx = self.column_index(key_column)?;
        let ret_idx = self.column_index(return_column)?;
        self.rows
            .iter()
            .find(|row| row.get(key_idx).is_some_and(|cell| cell == key))
            .and_then(|row| row.get(ret_idx))
            .map(String::as_str)
    }

    /// Membership check on `key_column`.
    pub fn contains(&self, key_column: &str, key: &str) -> bool {
        self.column_index(key_column).is_some_and(|idx| {
            self.rows
                .iter()
                .any(|row| row.get(idx).is_some_and(|cell| cell == key))
        })
    }
}

/// Read-only source of declaration metadata.
pub trait SchemaProvider {
    /// Loads the schema for a declaration code.
    ///
    /// Fails with [`EngineError::SchemaNotFound`] for unknown codes and
    /// [`EngineError::InvalidSchema`] for malformed metadata.
    fn load_schema(&self, code: &str) -> Result<DeclarationSchema>;

    /// Loads a lookup table by name.
    ///
    /// Fails with [`EngineError::LookupUnavailable`] when the table cannot
    /// be supplied.
    fn load_lookup_table(&self, name: &str) -> Result<LookupTable>;
}

/// In-memory provider, the test fixture and smallest useful store.
#[derive(Debug, Default)]
pub struct InMemoryProvider {
    schemas: HashMap<String, DeclarationSchema>,
    tables: HashMap<String, LookupTable>,
}

impl InMemoryProvider {
    /// Creates an empty provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a schema under its declaration code.
    pub fn with_schema(mut self, schema: DeclarationSchema) -> Self {
        self.schemas.insert(schema.code.clone(), schema);
        self
    }

    /// Registers a lookup table under its name.
    pub fn with_table(mut self, table: LookupTable) -> Self {
        self.tables.insert(table.name.clone(), table);
        self
    }
}

impl SchemaProvider for InMemoryProvider {
    fn load_schema(&self, code: &str) -> Result<DeclarationSchema> {
        let schema = self
            .schemas
            .get(code)
            .cloned()
            .ok_or_else(|| EngineError::SchemaNotFound(code.to_string()))?;
        schema.validate()?;
        Ok(schema)
    }

    fn load_lookup_table(&self, name: &str) -> Result<LookupTable> {
        self.tables
            .get(name)
            .cloned()
            .ok_or_else(|| EngineError::LookupUnavailable(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn communes() -> LookupTable {
        LookupTable::new(
            "COMUNAS",
            vec!["codigo".into(), "nombre".into()],
            vec![
                vec!["13101".into(), "Santiago".into()],
                vec!["13123".into(), "Providencia".into()],
            ],
        )
    }

    #[test]
    fn lookup_get_and_contains() {
        let table = communes();
        assert_eq!(table.get("codigo", "13101", "nombre"), Some("Santiago"));
        assert_eq!(table.get("codigo", "99999", "nombre"), None);
        assert!(table.contains("codigo", "13123"));
        assert!(!table.contains("nombre", "13123"));
    }

    #[test]
    fn unknown_schema_is_not_found() {
        let provider = InMemoryProvider::new().with_table(communes());
        assert!(matches!(
            provider.load_schema("9999"),
            Err(EngineError::SchemaNotFound(_))
        ));
        assert!(matches!(
            provider.load_lookup_table("UF"),
            Err(EngineError::LookupUnavailable(_))
        ));
    }
}
