//! Section merger for composite declarations.
//!
//! A composite declaration arrives as several section row sets joined by a
//! record key. The merger consolidates them into one flat row set, one row
//! per distinct key, so validation and encoding see the same shape for
//! simple and composite declarations.
//!
//! Sections are folded in ascending section-tag order and record keys are
//! emitted in the order they are first seen under that iteration, so the
//! result does not depend on the order the caller supplied the sections.

use std::collections::HashMap;

use declara_core::{
    DeclarationSchema, EngineError, Row, RowSet, SectionRowSet, Value,
};
use tracing::debug;

/// Consolidates section row sets into one row set keyed by the schema's
/// record key.
///
/// # Errors
///
/// * [`EngineError::InvalidSchema`] when the schema is not composite, has
///   no record key, or a supplied section tag is not declared by any field.
/// * [`EngineError::MissingRecordKey`] when a row carries no key value.
/// * [`EngineError::MergeConflict`] when two sections disagree on a field
///   value for the same record key. Equal duplicate values are fine.
pub fn merge(
    sections: &[SectionRowSet],
    schema: &DeclarationSchema,
) -> Result<RowSet, EngineError> {
    let key_field = schema.key_field.as_deref().filter(|k| !k.is_empty()).ok_or_else(|| {
        EngineError::invalid_schema(&schema.code, "merge requires a composite schema with a key_field")
    })?;

    let declared: Vec<&str> = schema.sections();
    for section in sections {
        if !declared.contains(&section.section.as_str()) {
            return Err(EngineError::invalid_schema(
                &schema.code,
                format!("unknown section '{}'", section.section),
            ));
        }
    }

    // Tag order, not caller order, drives the fold.
    let mut ordered: Vec<&SectionRowSet> = sections.iter().collect();
    ordered.sort_by(|a, b| a.section.cmp(&b.section));

    let mut merged: Vec<(String, Row)> = Vec::new();
    let mut index_by_key: HashMap<String, usize> = HashMap::new();

    for section in ordered {
        for (row_index, row) in section.rows.rows().enumerate() {
            let key = row
                .get(key_field)
                .and_then(Value::as_text)
                .filter(|k| !k.trim().is_empty())
                .ok_or_else(|| EngineError::MissingRecordKey {
                    section: section.section.clone(),
                    row: section.rows.display_row(row_index),
                    key_field: key_field.to_string(),
                })?;

            let slot = match index_by_key.get(&key) {
                Some(&i) => i,
                None => {
                    merged.push((key.clone(), Row::new()));
                    index_by_key.insert(key.clone(), merged.len() - 1);
                    merged.len() - 1
                }
            };

            let target = &mut merged[slot].1;
            for (field, value) in row {
                if value.is_null() {
                    continue;
                }
                match target.get(field) {
                    Some(existing) if existing != value => {
                        return Err(EngineError::merge_conflict(&key, field));
                    }
                    Some(_) => {}
                    None => {
                        target.insert(field.clone(), value.clone());
                    }
                }
            }
        }
    }

    debug!(
        declaration = %schema.code,
        sections = sections.len(),
        records = merged.len(),
        "sections merged"
    );
    Ok(merged.into_iter().map(|(_, row)| row).collect())
}
