//! Builder pattern for schema fixtures.
//!
//! Fluent builders for constructing declaration schemas in code — mainly
//! used by tests and by in-memory providers; production metadata normally
//! arrives through a parser or store.

use crate::schema::{
    Alignment, DataKind, DeclarationKind, DeclarationSchema, FieldDef, RuleDef, RuleKind,
};

/// Builder for a [`DeclarationSchema`].
///
/// # Example
///
/// ```rust
/// use declara_core::{SchemaBuilder, FieldBuilder, DataKind};
///
/// let schema = SchemaBuilder::new("1922", "Movimiento Mensual de Ventas")
///     .field(FieldBuilder::new("C1", DataKind::Text).width(10).position(1).build())
///     .build();
/// assert_eq!(schema.code, "1922");
/// ```
#[derive(Debug)]
pub struct SchemaBuilder {
    schema: DeclarationSchema,
}

impl SchemaBuilder {
    /// Creates a builder for a simple, active declaration.
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            schema: DeclarationSchema {
                code: code.into(),
                name: name.into(),
                kind: DeclarationKind::Simple,
                active: true,
                key_field: None,
                fields: Vec::new(),
                rules: Vec::new(),
                description: None,
            },
        }
    }

    /// Sets the declaration kind.
    pub fn kind(mut self, kind: DeclarationKind) -> Self {
        self.schema.kind = kind;
        self
    }

    /// Sets the record-key column (composite declarations).
    pub fn key_field(mut self, field: impl Into<String>) -> Self {
        self.schema.key_field = Some(field.into());
        self
    }

    /// Sets the active flag.
    pub fn active(mut self, active: bool) -> Self {
        self.schema.active = active;
        self
    }

    /// Sets the description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.schema.description = Some(description.into());
        self
    }

    /// Adds a field.
    pub fn field(mut self, field: FieldDef) -> Self {
        self.schema.fields.push(field);
        self
    }

    /// Adds a rule.
    pub fn rule(mut self, rule: RuleDef) -> Self {
        self.schema.rules.push(rule);
        self
    }

    /// Builds the schema. Structural invariants are checked separately by
    /// [`DeclarationSchema::validate`].
    pub fn build(self) -> DeclarationSchema {
        self.schema
    }
}

/// Builder for a [`FieldDef`].
#[derive(Debug)]
pub struct FieldBuilder {
    field: FieldDef,
}

impl FieldBuilder {
    /// Creates a builder for a left-aligned, space-padded, optional field.
    pub fn new(code: impl Into<String>, kind: DataKind) -> Self {
        let code = code.into();
        Self {
            field: FieldDef {
                name: code.clone(),
                code,
                kind,
                width: 0,
                decimals: 0,
                required: false,
                position: 0,
                alignment: Alignment::Left,
                pad: ' ',
                lookup_table: None,
                section: None,
                description: None,
            },
        }
    }

    /// Sets the display name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.field.name = name.into();
        self
    }

    /// Sets the output width.
    pub fn width(mut self, width: usize) -> Self {
        self.field.width = width;
        self
    }

    /// Sets the decimal places (Decimal fields).
    pub fn decimals(mut self, decimals: u8) -> Self {
        self.field.decimals = decimals;
        self
    }

    /// Marks the field required.
    pub fn required(mut self) -> Self {
        self.field.required = true;
        self
    }

    /// Sets the 1-based output position.
    pub fn position(mut self, position: usize) -> Self {
        self.field.position = position;
        self
    }

    /// Sets the alignment.
    pub fn alignment(mut self, alignment: Alignment) -> Self {
        self.field.alignment = alignment;
        self
    }

    /// Sets the pad character.
    pub fn pad(mut self, pad: char) -> Self {
        self.field.pad = pad;
        self
    }

    /// Sets the reference table used by lookup rules on this field.
    pub fn lookup_table(mut self, table: impl Into<String>) -> Self {
        self.field.lookup_table = Some(table.into());
        self
    }

    /// Sets the section tag (composite declarations).
    pub fn section(mut self, section: impl Into<String>) -> Self {
        self.field.section = Some(section.into());
        self
    }

    /// Builds the field definition.
    pub fn build(self) -> FieldDef {
        self.field
    }
}

/// Builder for a [`RuleDef`].
#[derive(Debug)]
pub struct RuleBuilder {
    rule: RuleDef,
}

impl RuleBuilder {
    /// Creates a builder for an active rule.
    pub fn new(code: impl Into<String>, field: impl Into<String>, kind: RuleKind) -> Self {
        Self {
            rule: RuleDef {
                field: field.into(),
                code: code.into(),
                kind,
                expression: String::new(),
                message: String::new(),
                active: true,
            },
        }
    }

    /// Sets the expression text.
    pub fn expression(mut self, expression: impl Into<String>) -> Self {
        self.rule.expression = expression.into();
        self
    }

    /// Sets the error message template.
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.rule.message = message.into();
        self
    }

    /// Sets the active flag.
    pub fn active(mut self, active: bool) -> Self {
        self.rule.active = active;
        self
    }

    /// Builds the rule definition.
    pub fn build(self) -> RuleDef {
        self.rule
    }
}
