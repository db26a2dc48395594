use colored::*;
use declara_core::ValidationReport;
use serde_json::json;

pub fn print_validation_report(report: &ValidationReport, format: &str) {
    match format {
        "json" => print_json_report(report),
        _ => print_text_report(report),
    }
}

fn print_text_report(report: &ValidationReport) {
    println!("\n{}", "═".repeat(60));
    println!("{}", "  VALIDATION REPORT".bold());
    println!("{}", "═".repeat(60));

    if report.valid {
        println!(
            "\n{} {}",
            "✓".green().bold(),
            "Validation PASSED".green().bold()
        );
    } else {
        println!(
            "\n{} {}",
            "✗".red().bold(),
            "Validation FAILED".red().bold()
        );
    }

    if !report.errors.is_empty() {
        println!("\n{}", "Errors:".red().bold());
        for (i, error) in report.errors.iter().enumerate() {
            let row = error
                .row
                .map(|r| format!("row {r}"))
                .unwrap_or_else(|| "column".to_string());
            println!(
                "  {}. [{} {} {}] {}",
                i + 1,
                row,
                error.field,
                error.rule,
                error.message.red()
            );
        }
    }

    if !report.skipped.is_empty() {
        println!("\n{}", "Skipped rules:".yellow().bold());
        for (i, skipped) in report.skipped.iter().enumerate() {
            let row = skipped
                .row
                .map(|r| format!("row {r}"))
                .unwrap_or_else(|| "all rows".to_string());
            println!(
                "  {}. [{} {} {}] {}",
                i + 1,
                row,
                skipped.field,
                skipped.rule,
                skipped.reason.yellow()
            );
        }
    }

    println!("\n{}", "Summary:".bold());
    println!("  Rows examined:  {}", report.summary.rows);
    println!("  Total errors:   {}", report.summary.total_errors);
    println!("  Skipped rules:  {}", report.skipped.len());
    if !report.summary.failing_fields.is_empty() {
        println!(
            "  Failing fields: {}",
            report.summary.failing_fields.join(", ")
        );
    }
    println!("{}", "═".repeat(60));
}

fn print_json_report(report: &ValidationReport) {
    let output = json!({
        "valid": report.valid,
        "errors": report.errors,
        "skipped": report.skipped,
        "summary": report.summary,
    });

    match serde_json::to_string_pretty(&output) {
        Ok(text) => println!("{text}"),
        Err(e) => eprintln!("cannot render JSON report: {e}"),
    }
}

pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message.green());
}

pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}

pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message.red());
}
