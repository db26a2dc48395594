use anyhow::{Context, Result};
use chrono::Local;
use declara_engine::{CompanyContext, Dispatcher, ProcessOptions};
use declara_parser::DirectoryProvider;
use std::path::Path;
use tracing::info;

use crate::commands::validate::build_input;
use crate::output;

#[allow(clippy::too_many_arguments)]
pub fn execute(
    code: &str,
    input_path: Option<&str>,
    sections: &[String],
    store: &str,
    output_dir: &str,
    no_strict: bool,
    rut: &str,
    user: &str,
    format: &str,
) -> Result<()> {
    info!("Generating declaration {}", code);

    let rows = build_input(input_path, sections)?;
    let company = CompanyContext {
        rut: rut.to_string(),
        name: String::new(),
        user: user.to_string(),
    };
    let options = ProcessOptions { strict: !no_strict };

    let dispatcher = Dispatcher::new(DirectoryProvider::new(store));
    let outcome = dispatcher.process(code, rows, &company, &options)?;

    output::print_validation_report(&outcome.report, format);

    if let Some(document) = &outcome.document {
        let name = document.suggested_file_name(Local::now().naive_local());
        let path = Path::new(output_dir).join(&name);
        std::fs::write(&path, &document.bytes)
            .with_context(|| format!("cannot write output file {}", path.display()))?;
        output::print_success(&format!(
            "Wrote {} ({} rows, {} chars per line)",
            path.display(),
            document.rows,
            document.line_width
        ));
    } else if let Some(error) = &outcome.encoding_error {
        output::print_error(&format!("Encoding failed: {error}"));
        output::print_info("No output file was written");
    } else {
        output::print_info("Validation failed; no output file was written");
    }

    if !outcome.success {
        std::process::exit(1);
    }
    Ok(())
}
