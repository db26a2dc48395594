use anyhow::{Result, bail};
use declara_engine::{CompanyContext, DeclarationInput, Dispatcher, ProcessOptions};
use declara_parser::DirectoryProvider;
use std::path::Path;
use tracing::info;

use crate::{input, output};

pub fn execute(
    code: &str,
    input_path: Option<&str>,
    sections: &[String],
    store: &str,
    format: &str,
) -> Result<()> {
    info!("Validating declaration {}", code);

    let rows = build_input(input_path, sections)?;
    let dispatcher = Dispatcher::new(DirectoryProvider::new(store));
    let outcome = dispatcher.process(
        code,
        rows,
        &CompanyContext::default(),
        &ProcessOptions::default(),
    )?;

    output::print_validation_report(&outcome.report, format);
    if let Some(error) = &outcome.encoding_error {
        output::print_error(&format!("Encoding failed: {error}"));
    }

    if !outcome.success {
        std::process::exit(1);
    }
    Ok(())
}

/// Builds the run input from either `--input` or repeated `--section`.
pub fn build_input(
    input_path: Option<&str>,
    sections: &[String],
) -> Result<DeclarationInput> {
    match (input_path, sections.is_empty()) {
        (Some(path), true) => Ok(DeclarationInput::Simple(input::read_rows(Path::new(path))?)),
        (None, false) => Ok(DeclarationInput::Composite(input::read_sections(sections)?)),
        (Some(_), false) => bail!("--input and --section are mutually exclusive"),
        (None, true) => bail!("provide --input for simple or --section for composite declarations"),
    }
}
