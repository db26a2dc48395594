//! CSV input loading.
//!
//! Input rows arrive as CSV with a header row naming the technical field
//! codes. Cell values are inferred: empty cells become null, integral and
//! decimal cells become numbers, everything else stays text. The header
//! row counts as line 1, so reported row numbers match what the operator
//! sees in a spreadsheet.

use std::path::Path;

use anyhow::{Context, Result, bail};
use csv::ReaderBuilder;
use declara_core::{Row, RowSet, SectionRowSet, Value};

/// Loads one CSV file into a row set.
pub fn read_rows(path: &Path) -> Result<RowSet> {
    let mut reader = ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("cannot open input file {}", path.display()))?;

    let headers: Vec<String> = reader
        .headers()
        .with_context(|| format!("cannot read header row of {}", path.display()))?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record =
            record.with_context(|| format!("cannot read row in {}", path.display()))?;
        let mut row = Row::new();
        for (header, cell) in headers.iter().zip(record.iter()) {
            row.insert(header.clone(), infer_value(cell));
        }
        rows.push(row);
    }

    Ok(RowSet::from_rows(rows).with_header_offset(1))
}

/// Parses repeated `TAG=path.csv` section arguments.
pub fn read_sections(specs: &[String]) -> Result<Vec<SectionRowSet>> {
    let mut sections = Vec::with_capacity(specs.len());
    for spec in specs {
        let Some((tag, path)) = spec.split_once('=') else {
            bail!("invalid section '{spec}', expected TAG=path.csv");
        };
        if tag.is_empty() {
            bail!("invalid section '{spec}', section tag is empty");
        }
        let rows = read_rows(Path::new(path))?;
        sections.push(SectionRowSet::new(tag, rows));
    }
    Ok(sections)
}

fn infer_value(cell: &str) -> Value {
    if cell.is_empty() {
        return Value::Null;
    }
    if let Ok(i) = cell.parse::<i64>() {
        return Value::Int(i);
    }
    if let Ok(f) = cell.parse::<f64>() {
        return Value::Float(f);
    }
    Value::Text(cell.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn reads_csv_with_type_inference() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("input.csv");
        fs::write(&path, "C1,C2,C3\n12345678-5,1500,19.5\n1-9,,\n").unwrap();

        let rows = read_rows(&path).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows.header_offset(), 1);

        let first = rows.get(0).unwrap();
        assert_eq!(first.get("C1"), Some(&Value::Text("12345678-5".into())));
        assert_eq!(first.get("C2"), Some(&Value::Int(1500)));
        assert_eq!(first.get("C3"), Some(&Value::Float(19.5)));

        let second = rows.get(1).unwrap();
        assert_eq!(second.get("C2"), Some(&Value::Null));
    }

    #[test]
    fn section_specs_require_tag_and_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.csv");
        fs::write(&path, "C1\n1-9\n").unwrap();
        let spec = format!("A={}", path.display());

        let sections = read_sections(&[spec]).unwrap();
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].section, "A");
        assert_eq!(sections[0].rows.len(), 1);

        assert!(read_sections(&["no-separator".to_string()]).is_err());
        assert!(read_sections(&["=path.csv".to_string()]).is_err());
    }
}
