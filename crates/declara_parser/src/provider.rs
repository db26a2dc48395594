//! Filesystem-backed schema provider.
//!
//! Layout: schemas live at the root of the directory as `{code}.yaml`,
//! `{code}.yml` or `{code}.toml`; lookup tables live under `tables/` as
//! `{name}.csv` with a header row.

use std::path::{Path, PathBuf};

use csv::ReaderBuilder;
use declara_core::{DeclarationSchema, EngineError, LookupTable, SchemaProvider};

use crate::parse_file;

/// [`SchemaProvider`] reading schemas and lookup tables from a directory.
#[derive(Debug, Clone)]
pub struct DirectoryProvider {
    root: PathBuf,
}

impl DirectoryProvider {
    /// Creates a provider rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn schema_path(&self, code: &str) -> Option<PathBuf> {
        ["yaml", "yml", "toml"]
            .iter()
            .map(|ext| self.root.join(format!("{code}.{ext}")))
            .find(|p| p.is_file())
    }

    fn table_path(&self, name: &str) -> PathBuf {
        self.root.join("tables").join(format!("{name}.csv"))
    }
}

impl SchemaProvider for DirectoryProvider {
    fn load_schema(&self, code: &str) -> declara_core::Result<DeclarationSchema> {
        let path = self
            .schema_path(code)
            .ok_or_else(|| EngineError::SchemaNotFound(code.to_string()))?;
        parse_file(&path).map_err(|e| match e {
            crate::ParserError::Invalid(inner) => inner,
            other => EngineError::invalid_schema(code, other.to_string()),
        })
    }

    fn load_lookup_table(&self, name: &str) -> declara_core::Result<LookupTable> {
        let path = self.table_path(name);
        read_table(name, &path)
            .map_err(|e| EngineError::LookupUnavailable(format!("{name}: {e}")))
    }
}

fn read_table(name: &str, path: &Path) -> crate::Result<LookupTable> {
    let mut reader = ReaderBuilder::new().trim(csv::Trim::All).from_path(path)?;
    let columns: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.to_string())
        .collect();
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(|cell| cell.to_string()).collect());
    }
    Ok(LookupTable::new(name, columns, rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    fn store_with_schema() -> TempDir {
        let dir = TempDir::new().expect("temp dir");
        fs::write(
            dir.path().join("1879.yaml"),
            r#"
code: "1879"
name: Retenciones sobre honorarios
kind: simple
fields:
  - code: C1
    name: RUT informado
    kind: text
    width: 10
    position: 1
    alignment: left
"#,
        )
        .expect("write schema");
        fs::create_dir(dir.path().join("tables")).expect("tables dir");
        fs::write(
            dir.path().join("tables/COMUNAS.csv"),
            "codigo,nombre\n13101,Santiago\n13123,Providencia\n",
        )
        .expect("write table");
        dir
    }

    #[test]
    fn loads_schema_by_code() {
        let dir = store_with_schema();
        let provider = DirectoryProvider::new(dir.path());
        let schema = provider.load_schema("1879").expect("schema loads");
        assert_eq!(schema.name, "Retenciones sobre honorarios");
    }

    #[test]
    fn unknown_code_is_not_found() {
        let dir = store_with_schema();
        let provider = DirectoryProvider::new(dir.path());
        assert!(matches!(
            provider.load_schema("9999"),
            Err(EngineError::SchemaNotFound(_))
        ));
    }

    #[test]
    fn loads_lookup_table_from_csv() {
        let dir = store_with_schema();
        let provider = DirectoryProvider::new(dir.path());
        let table = provider.load_lookup_table("COMUNAS").expect("table loads");
        assert_eq!(table.columns, vec!["codigo", "nombre"]);
        assert_eq!(table.get("codigo", "13123", "nombre"), Some("Providencia"));
    }

    #[test]
    fn missing_table_is_unavailable() {
        let dir = store_with_schema();
        let provider = DirectoryProvider::new(dir.path());
        assert!(matches!(
            provider.load_lookup_table("UF"),
            Err(EngineError::LookupUnavailable(_))
        ));
    }
}
