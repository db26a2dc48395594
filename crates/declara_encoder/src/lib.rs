//! Fixed-width Latin-1 encoder.
//!
//! Turns a validated row set into the authority-facing output file: one
//! fixed-width line per row, Latin-1 encoded, every line terminated by
//! `\n`, no header. Field slots follow the schema's position order; a
//! value that does not fit its slot or cannot be represented in Latin-1
//! aborts the run rather than emit a corrupt declaration.
//!
//! ```rust
//! use declara_core::rowset::row;
//! use declara_core::{Alignment, DataKind, FieldBuilder, RowSet, SchemaBuilder, Value};
//! use declara_encoder::encode;
//!
//! let schema = SchemaBuilder::new("1922", "Ventas")
//!     .field(FieldBuilder::new("C1", DataKind::Text).width(4).position(1).build())
//!     .field(
//!         FieldBuilder::new("C2", DataKind::Integer)
//!             .width(5)
//!             .position(2)
//!             .alignment(Alignment::Right)
//!             .pad('0')
//!             .build(),
//!     )
//!     .build();
//! let rows = RowSet::from_rows(vec![row(&[
//!     ("C1", Value::Text("ab".into())),
//!     ("C2", Value::Int(42)),
//! ])]);
//!
//! let doc = encode(&schema, &rows).unwrap();
//! assert_eq!(doc.bytes, b"ab  00042\n");
//! ```

mod format;
mod layout;

use declara_core::{DeclarationSchema, EncodedDocument, EngineError, RowSet, Value};
use tracing::debug;

pub use format::{align, format_value};
pub use layout::{FieldSlot, layout};

/// Encodes a row set into the declaration's fixed-width file.
///
/// Rows are emitted in input order, fields in position order. Fails with
/// [`EngineError::FieldOverflow`] when a formatted value exceeds its slot
/// and [`EngineError::Encoding`] when a value cannot be rendered in the
/// field's data kind or contains characters outside Latin-1.
pub fn encode(schema: &DeclarationSchema, rows: &RowSet) -> Result<EncodedDocument, EngineError> {
    let line_width = schema.line_width();
    let fields = schema.fields_in_order();
    let mut bytes = Vec::with_capacity(rows.len() * (line_width + 1));

    for (index, row) in rows.rows().enumerate() {
        let display_row = rows.display_row(index);
        for field in &fields {
            let value = row.get(&field.code).cloned().unwrap_or(Value::Null);
            let formatted = format::format_value(field, &value, display_row)?;
            let slotted = format::align(field, formatted, display_row)?;
            for c in slotted.chars() {
                let code = c as u32;
                if code > 0xFF {
                    return Err(EngineError::encoding(
                        &field.code,
                        display_row,
                        format!("character '{c}' is outside Latin-1"),
                    ));
                }
                bytes.push(code as u8);
            }
        }
        bytes.push(b'\n');
    }

    debug!(
        declaration = %schema.code,
        rows = rows.len(),
        line_width,
        "document encoded"
    );
    Ok(EncodedDocument {
        declaration_code: schema.code.clone(),
        bytes,
        extension: schema.file_extension().to_string(),
        line_width,
        rows: rows.len(),
    })
}
