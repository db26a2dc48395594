use anyhow::{Context, Result};
use colored::*;
use declara_core::{DeclarationKind, SchemaProvider};
use declara_encoder::layout;
use declara_parser::DirectoryProvider;
use tracing::info;

pub fn execute(code: &str, store: &str) -> Result<()> {
    info!("Loading declaration {} from {}", code, store);

    let provider = DirectoryProvider::new(store);
    let schema = provider
        .load_schema(code)
        .with_context(|| format!("cannot load declaration {code}"))?;

    println!("\n{}", format!("DJ-{} {}", schema.code, schema.name).bold());
    let kind = match schema.kind {
        DeclarationKind::Simple => "simple",
        DeclarationKind::Composite => "composite",
    };
    println!("  Kind:       {kind}");
    if let Some(key) = &schema.key_field {
        println!("  Record key: {key}");
    }
    println!("  Line width: {}", schema.line_width());
    println!("  Extension:  .{}", schema.file_extension());
    if let Some(description) = &schema.description {
        println!("  {description}");
    }

    println!("\n{}", format!("Fields ({}):", schema.fields.len()).bold());
    for slot in layout(&schema) {
        let field = schema
            .field(&slot.code)
            .with_context(|| format!("field {} vanished from schema", slot.code))?;
        let section = field
            .section
            .as_deref()
            .map(|s| format!(" [{s}]"))
            .unwrap_or_default();
        println!(
            "  {:<6} {:>4}-{:<4} {:?}{} {}",
            slot.code, slot.start, slot.end, field.kind, section, slot.name
        );
    }

    let active = schema.rules.iter().filter(|r| r.active).count();
    println!(
        "\n{}",
        format!("Rules ({active} active, {} total):", schema.rules.len()).bold()
    );
    for rule in &schema.rules {
        let state = if rule.active { "" } else { " (inactive)" };
        println!("  {:<6} {:<6} {:?}{state}", rule.code, rule.field, rule.kind);
    }

    Ok(())
}
