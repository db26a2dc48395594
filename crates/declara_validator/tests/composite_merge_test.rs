//! Merge-then-validate flow for a composite declaration: two sections
//! joined on the informed RUT, consolidated and validated as one table.

use std::collections::HashMap;

use declara_core::rowset::row;
use declara_core::{
    DataKind, DeclarationKind, FieldBuilder, RowSet, RuleBuilder, RuleKind, SchemaBuilder,
    SectionRowSet, Value,
};
use declara_validator::{ValidationEngine, merge};
use pretty_assertions::assert_eq;

fn salary_schema() -> declara_core::DeclarationSchema {
    SchemaBuilder::new("1887", "Sueldos")
        .kind(DeclarationKind::Composite)
        .key_field("C1")
        .field(
            FieldBuilder::new("C1", DataKind::Text)
                .name("RUT trabajador")
                .width(10)
                .position(1)
                .section("A")
                .build(),
        )
        .field(
            FieldBuilder::new("C2", DataKind::Integer)
                .name("Renta anual")
                .width(12)
                .position(2)
                .section("A")
                .build(),
        )
        .field(
            FieldBuilder::new("C3", DataKind::Integer)
                .name("Impuesto retenido")
                .width(12)
                .position(3)
                .section("B")
                .build(),
        )
        .rule(
            RuleBuilder::new("H001", "C1", RuleKind::Required)
                .message("RUT obligatorio en fila {row}")
                .build(),
        )
        .rule(
            RuleBuilder::new("H002", "C3", RuleKind::Conditional)
                .expression("is_null(value) or is_null(C2) or value <= C2")
                .message("impuesto supera la renta en fila {row}")
                .build(),
        )
        .build()
}

#[test]
fn merged_sections_validate_as_one_table() {
    let sections = vec![
        SectionRowSet::new(
            "A",
            RowSet::from_rows(vec![
                row(&[("C1", Value::Text("1-9".into())), ("C2", Value::Int(12_000_000))]),
                row(&[("C1", Value::Text("2-7".into())), ("C2", Value::Int(8_000_000))]),
            ]),
        ),
        SectionRowSet::new(
            "B",
            RowSet::from_rows(vec![
                row(&[("C1", Value::Text("1-9".into())), ("C3", Value::Int(900_000))]),
                // Cross-section violation: tax above the salary from A.
                row(&[("C1", Value::Text("2-7".into())), ("C3", Value::Int(9_000_000))]),
            ]),
        ),
    ];
    let schema = salary_schema();

    let merged = merge(&sections, &schema).expect("merge");
    assert_eq!(merged.len(), 2);

    let engine = ValidationEngine::new(&schema, HashMap::new()).expect("rules compile");
    let report = engine.validate(&merged);

    assert!(!report.valid);
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].rule, "H002");
    assert_eq!(report.errors[0].row, Some(2));
}

#[test]
fn record_present_in_one_section_only_still_validates() {
    let sections = vec![SectionRowSet::new(
        "A",
        RowSet::from_rows(vec![row(&[
            ("C1", Value::Text("1-9".into())),
            ("C2", Value::Int(100)),
        ])]),
    )];
    let schema = salary_schema();

    let merged = merge(&sections, &schema).expect("merge");
    let engine = ValidationEngine::new(&schema, HashMap::new()).expect("rules compile");
    let report = engine.validate(&merged);

    // C3 is simply absent; the conditional rule tolerates it.
    assert!(report.valid, "unexpected errors: {:?}", report.errors);
}
