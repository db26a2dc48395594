//! Line-layout summary derived from a schema.

use declara_core::DeclarationSchema;

/// One field's slot inside the fixed-width line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSlot {
    /// Technical field code.
    pub code: String,
    /// Display name.
    pub name: String,
    /// 1-based first character column.
    pub start: usize,
    /// 1-based last character column.
    pub end: usize,
    /// Slot width.
    pub width: usize,
}

/// Computes the character columns each field occupies, in output order.
pub fn layout(schema: &DeclarationSchema) -> Vec<FieldSlot> {
    let mut slots = Vec::with_capacity(schema.fields.len());
    let mut start = 1;
    for field in schema.fields_in_order() {
        slots.push(FieldSlot {
            code: field.code.clone(),
            name: field.name.clone(),
            start,
            end: start + field.width - 1,
            width: field.width,
        });
        start += field.width;
    }
    slots
}
