//! Row-set validation engine.
//!
//! The engine compiles a schema's active rules once, then evaluates them
//! against every row of a [`RowSet`]. Rule failures become report errors;
//! rule evaluation faults (type faults, exhausted budgets, missing lookup
//! tables) become skipped-rule entries and never abort the run.

use std::collections::HashMap;

use declara_core::{
    DeclarationSchema, EngineError, LookupTable, RowSet, RuleDef, SkippedRule, ValidationError,
    ValidationReport, Value, render_message,
};
use declara_expr::{CompiledRule, EvalContext, Evaluator, RuleBody, compile_rule};
use tracing::{debug, warn};

/// Validates row sets against one declaration schema.
///
/// # Example
///
/// ```rust
/// use declara_core::{DataKind, FieldBuilder, RowSet, RuleBuilder, RuleKind, SchemaBuilder};
/// use declara_core::rowset::row;
/// use declara_validator::ValidationEngine;
/// use std::collections::HashMap;
///
/// let schema = SchemaBuilder::new("1879", "Retenciones")
///     .field(FieldBuilder::new("C1", DataKind::Text).width(10).position(1).build())
///     .rule(
///         RuleBuilder::new("H001", "C1", RuleKind::Required)
///             .message("RUT obligatorio en fila {row}")
///             .build(),
///     )
///     .build();
///
/// let engine = ValidationEngine::new(&schema, HashMap::new()).unwrap();
/// let rows = RowSet::from_rows(vec![row(&[])]);
/// let report = engine.validate(&rows);
/// assert!(!report.valid);
/// ```
pub struct ValidationEngine {
    schema: DeclarationSchema,
    /// field code → compiled rules, Required first, then declared order.
    rules: HashMap<String, Vec<CompiledRule>>,
    /// Inactive rules, reported once per run as skipped.
    inactive: Vec<RuleDef>,
    lookups: HashMap<String, LookupTable>,
    evaluator: Evaluator,
}

impl ValidationEngine {
    /// Compiles the schema's active rules.
    ///
    /// A rule expression that does not compile rejects the schema with
    /// [`EngineError::InvalidSchema`]. `lookups` holds whatever reference
    /// tables the run managed to load; rules touching an absent table are
    /// skipped per row, not rejected here.
    pub fn new(
        schema: &DeclarationSchema,
        lookups: HashMap<String, LookupTable>,
    ) -> Result<Self, EngineError> {
        schema.validate()?;

        let mut rules: HashMap<String, Vec<CompiledRule>> = HashMap::new();
        let mut inactive = Vec::new();
        for def in &schema.rules {
            if !def.active {
                inactive.push(def.clone());
                continue;
            }
            let compiled = compile_rule(def.clone()).map_err(|e| {
                EngineError::invalid_schema(
                    &schema.code,
                    format!("rule '{}' does not compile: {e}", def.code),
                )
            })?;
            rules.entry(def.field.clone()).or_default().push(compiled);
        }
        // Required rules run first on each field; everything else keeps
        // its declared order.
        for field_rules in rules.values_mut() {
            field_rules.sort_by_key(|r| !matches!(r.body, RuleBody::Required));
        }

        Ok(Self {
            schema: schema.clone(),
            rules,
            inactive,
            lookups,
            evaluator: Evaluator::new(),
        })
    }

    /// Lookup-table names referenced by the compiled rules, deduplicated.
    pub fn referenced_tables(&self) -> Vec<String> {
        let mut tables: Vec<String> = self
            .rules
            .values()
            .flatten()
            .flat_map(|r| r.referenced_tables())
            .collect();
        tables.sort();
        tables.dedup();
        tables
    }

    /// Validates every row, in input order.
    ///
    /// A required field missing from every input row fails first, as one
    /// whole-column finding. Fields are then visited in output-position
    /// order; within a field the Required rules run first and a Required
    /// failure suppresses that field's remaining rules for the row.
    pub fn validate(&self, rows: &RowSet) -> ValidationReport {
        let mut report = ValidationReport::passing(rows.len());
        debug!(
            declaration = %self.schema.code,
            rows = rows.len(),
            "starting validation"
        );

        for def in &self.inactive {
            report.add_skipped(SkippedRule {
                row: None,
                field: def.field.clone(),
                rule: def.code.clone(),
                reason: "rule is inactive".into(),
            });
        }

        if !rows.is_empty() {
            for field in self.schema.fields_in_order() {
                if field.required && !rows.rows().any(|r| r.contains_key(&field.code)) {
                    report.add_error(ValidationError {
                        row: None,
                        field: field.code.clone(),
                        rule: "required_column".into(),
                        message: format!("required column '{}' is missing", field.code),
                    });
                }
            }
        }

        for (index, row) in rows.rows().enumerate() {
            let display_row = rows.display_row(index);
            for field in self.schema.fields_in_order() {
                let Some(field_rules) = self.rules.get(&field.code) else {
                    continue;
                };
                let value = row.get(&field.code).cloned().unwrap_or(Value::Null);
                let mut suppressed = false;

                for rule in field_rules {
                    if suppressed {
                        break;
                    }
                    match &rule.body {
                        RuleBody::Required => {
                            if value.is_null() {
                                report.add_error(self.error(rule, display_row));
                                suppressed = true;
                            }
                        }
                        RuleBody::Expr(expr) => {
                            let ctx = EvalContext {
                                value: &value,
                                row,
                                rows,
                                lookups: &self.lookups,
                            };
                            match self.evaluator.evaluate(expr, &ctx) {
                                Ok(true) => {}
                                Ok(false) => report.add_error(self.error(rule, display_row)),
                                Err(fault) => {
                                    warn!(
                                        declaration = %self.schema.code,
                                        rule = %rule.def.code,
                                        row = display_row,
                                        %fault,
                                        "rule skipped"
                                    );
                                    report.add_skipped(SkippedRule {
                                        row: Some(display_row),
                                        field: field.code.clone(),
                                        rule: rule.def.code.clone(),
                                        reason: fault.to_string(),
                                    });
                                }
                            }
                        }
                    }
                }
            }
        }

        debug!(
            declaration = %self.schema.code,
            errors = report.summary.total_errors,
            skipped = report.skipped.len(),
            "validation finished"
        );
        report
    }

    fn error(&self, rule: &CompiledRule, display_row: usize) -> ValidationError {
        ValidationError {
            row: Some(display_row),
            field: rule.def.field.clone(),
            rule: rule.def.code.clone(),
            message: render_message(
                &rule.def.message,
                Some(display_row),
                &rule.def.field,
                &rule.def.code,
            ),
        }
    }
}
