//! Loading of declaration schemas (YAML/TOML) and lookup tables (CSV).
//!
//! Parsing is strict: after deserialization the schema's structural
//! invariants are checked and every active rule expression is compiled, so
//! a malformed schema is rejected at load time rather than mid-run.
//!
//! # Example
//!
//! ```rust
//! use declara_parser::parse_yaml;
//!
//! let yaml = r#"
//! code: "1879"
//! name: Retenciones sobre honorarios
//! kind: simple
//! fields:
//!   - code: C1
//!     name: RUT informado
//!     kind: text
//!     width: 10
//!     position: 1
//!     alignment: left
//!   - code: C2
//!     name: Monto retenido
//!     kind: integer
//!     width: 12
//!     position: 2
//!     alignment: right
//!     pad: "0"
//! rules:
//!   - field: C2
//!     code: H100
//!     kind: range
//!     expression: is_null(value) or value >= 0
//!     message: "monto negativo en fila {row}"
//! "#;
//!
//! let schema = parse_yaml(yaml).expect("schema loads");
//! assert_eq!(schema.code, "1879");
//! assert_eq!(schema.line_width(), 22);
//! ```

mod provider;

use std::path::Path;

use declara_core::{DeclarationSchema, EngineError};
use declara_expr::compile_rule;
use thiserror::Error;

pub use provider::DirectoryProvider;

/// Errors that can occur while loading declaration metadata.
#[derive(Debug, Error)]
pub enum ParserError {
    /// YAML parsing or deserialization failed
    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// TOML parsing or deserialization failed
    #[error("failed to parse TOML: {0}")]
    Toml(String),

    /// CSV parsing failed
    #[error("failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),

    /// File I/O error
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Schema deserialized but violates a structural invariant, or a rule
    /// expression does not compile
    #[error(transparent)]
    Invalid(#[from] EngineError),

    /// Unsupported file format
    #[error("unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// Invalid file extension
    #[error("invalid or missing file extension")]
    InvalidExtension,
}

/// Result type alias for parser operations.
pub type Result<T> = std::result::Result<T, ParserError>;

/// Supported schema file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaFormat {
    /// YAML format (.yml, .yaml)
    Yaml,
    /// TOML format (.toml)
    Toml,
}

/// Parses a declaration schema from a YAML string.
pub fn parse_yaml(content: &str) -> Result<DeclarationSchema> {
    let schema: DeclarationSchema = serde_yaml_ng::from_str(content)?;
    verify(schema)
}

/// Parses a declaration schema from a TOML string.
pub fn parse_toml(content: &str) -> Result<DeclarationSchema> {
    let schema: DeclarationSchema =
        toml::from_str(content).map_err(|e| ParserError::Toml(e.to_string()))?;
    verify(schema)
}

/// Detects the schema format from a file path based on its extension.
///
/// # Errors
///
/// Returns [`ParserError::InvalidExtension`] if the file has no extension
/// and [`ParserError::UnsupportedFormat`] if the extension is not
/// recognized.
pub fn detect_format(path: &Path) -> Result<SchemaFormat> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .ok_or(ParserError::InvalidExtension)?;

    match extension.to_lowercase().as_str() {
        "yaml" | "yml" => Ok(SchemaFormat::Yaml),
        "toml" => Ok(SchemaFormat::Toml),
        other => Err(ParserError::UnsupportedFormat(other.to_string())),
    }
}

/// Parses a declaration schema from a file with automatic format
/// detection.
///
/// ```no_run
/// use declara_parser::parse_file;
/// use std::path::Path;
///
/// let schema = parse_file(Path::new("schemas/1922.yaml")).unwrap();
/// println!("loaded declaration {}", schema.code);
/// ```
pub fn parse_file(path: &Path) -> Result<DeclarationSchema> {
    let content = std::fs::read_to_string(path)?;
    match detect_format(path)? {
        SchemaFormat::Yaml => parse_yaml(&content),
        SchemaFormat::Toml => parse_toml(&content),
    }
}

/// Structural validation plus rule compilation.
fn verify(schema: DeclarationSchema) -> Result<DeclarationSchema> {
    schema.validate()?;
    for rule in schema.rules.iter().filter(|r| r.active) {
        compile_rule(rule.clone()).map_err(|e| {
            EngineError::invalid_schema(
                &schema.code,
                format!("rule '{}' does not compile: {e}", rule.code),
            )
        })?;
    }
    Ok(schema)
}

#[cfg(test)]
mod tests {
    use super::*;
    use declara_core::{Alignment, DataKind, DeclarationKind, RuleKind};
    use pretty_assertions::assert_eq;

    const MINIMAL_YAML: &str = r#"
code: "1922"
name: Movimiento Mensual de Ventas
kind: simple
fields:
  - code: C1
    name: RUT informado
    kind: text
    width: 10
    position: 1
    alignment: left
  - code: C2
    name: Monto neto
    kind: integer
    width: 12
    position: 2
    alignment: right
    pad: "0"
"#;

    #[test]
    fn parses_minimal_yaml() {
        let schema = parse_yaml(MINIMAL_YAML).expect("schema loads");

        assert_eq!(schema.code, "1922");
        assert_eq!(schema.kind, DeclarationKind::Simple);
        assert!(schema.active);
        assert_eq!(schema.fields.len(), 2);

        let monto = &schema.fields[1];
        assert_eq!(monto.kind, DataKind::Integer);
        assert_eq!(monto.alignment, Alignment::Right);
        assert_eq!(monto.pad, '0');
        assert!(!monto.required);
    }

    #[test]
    fn parses_yaml_with_rules() {
        let yaml = format!(
            "{MINIMAL_YAML}rules:
  - field: C1
    code: H001
    kind: required
    message: \"RUT obligatorio en fila {{row}}\"
  - field: C2
    code: H002
    kind: range
    expression: is_null(value) or between(value, 0, 999999999999)
    message: \"monto fuera de rango en fila {{row}}\"
"
        );
        let schema = parse_yaml(&yaml).expect("schema loads");

        assert_eq!(schema.rules.len(), 2);
        assert_eq!(schema.rules[0].kind, RuleKind::Required);
        assert!(schema.rules[1].active);
    }

    #[test]
    fn parses_toml() {
        let toml = r#"
code = "1879"
name = "Retenciones sobre honorarios"
kind = "simple"

[[fields]]
code = "C1"
name = "RUT informado"
kind = "text"
width = 10
position = 1
alignment = "left"

[[rules]]
field = "C1"
code = "H001"
kind = "required"
message = "RUT obligatorio en fila {row}"
"#;
        let schema = parse_toml(toml).expect("schema loads");
        assert_eq!(schema.code, "1879");
        assert_eq!(schema.rules.len(), 1);
    }

    #[test]
    fn rejects_schema_with_broken_invariants() {
        // Two fields at position 1.
        let yaml = r#"
code: "1922"
name: Movimiento
kind: simple
fields:
  - code: C1
    name: A
    kind: text
    width: 4
    position: 1
    alignment: left
  - code: C2
    name: B
    kind: text
    width: 4
    position: 1
    alignment: left
"#;
        assert!(matches!(parse_yaml(yaml), Err(ParserError::Invalid(_))));
    }

    #[test]
    fn rejects_rule_that_does_not_compile() {
        let yaml = format!(
            "{MINIMAL_YAML}rules:
  - field: C2
    code: H002
    kind: range
    expression: open('/etc/passwd')
    message: nope
"
        );
        let result = parse_yaml(&yaml);
        assert!(matches!(result, Err(ParserError::Invalid(_))));
        let message = result.unwrap_err().to_string();
        assert!(message.contains("H002"), "unexpected message: {message}");
    }

    #[test]
    fn inactive_rules_are_not_compiled() {
        let yaml = format!(
            "{MINIMAL_YAML}rules:
  - field: C2
    code: H002
    kind: range
    expression: open('/etc/passwd')
    message: nope
    active: false
"
        );
        assert!(parse_yaml(&yaml).is_ok());
    }

    #[test]
    fn rejects_invalid_yaml() {
        let result = parse_yaml("code: [unclosed");
        assert!(matches!(result, Err(ParserError::Yaml(_))));
    }

    #[test]
    fn detects_formats() {
        assert_eq!(
            detect_format(Path::new("1922.yaml")).unwrap(),
            SchemaFormat::Yaml
        );
        assert_eq!(
            detect_format(Path::new("1922.yml")).unwrap(),
            SchemaFormat::Yaml
        );
        assert_eq!(
            detect_format(Path::new("1922.toml")).unwrap(),
            SchemaFormat::Toml
        );
        assert!(matches!(
            detect_format(Path::new("1922.json")),
            Err(ParserError::UnsupportedFormat(_))
        ));
        assert!(matches!(
            detect_format(Path::new("1922")),
            Err(ParserError::InvalidExtension)
        ));
    }
}
