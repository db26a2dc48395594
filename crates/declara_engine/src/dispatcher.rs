//! One-declaration processing pipeline.

use std::collections::HashMap;
use std::time::Instant;

use declara_core::{
    DeclarationKind, EncodedDocument, EngineError, LookupTable, RowSet, SchemaProvider,
    SectionRowSet, ValidationReport,
};
use declara_encoder::encode;
use declara_validator::{ValidationEngine, merge};
use tracing::{info, warn};

use crate::metrics::{RunMetrics, elapsed_ms};

/// The declaring company, carried through for traceability.
#[derive(Debug, Clone, Default)]
pub struct CompanyContext {
    /// Company RUT.
    pub rut: String,
    /// Company display name.
    pub name: String,
    /// Operator running the declaration.
    pub user: String,
}

/// Run options.
#[derive(Debug, Clone)]
pub struct ProcessOptions {
    /// Stop before encoding when validation fails. Defaults to true; a
    /// non-strict run still encodes so the operator can inspect the file.
    pub strict: bool,
}

impl Default for ProcessOptions {
    fn default() -> Self {
        Self { strict: true }
    }
}

/// Input rows for one run.
#[derive(Debug, Clone)]
pub enum DeclarationInput {
    /// One flat table, for simple declarations.
    Simple(RowSet),
    /// Tagged section tables, for composite declarations.
    Composite(Vec<SectionRowSet>),
}

/// Result of one processing run.
#[derive(Debug)]
pub struct ProcessOutcome {
    /// True when validation passed and encoding (if reached) succeeded.
    pub success: bool,
    /// The full validation report.
    pub report: ValidationReport,
    /// The encoded output file; `None` when a strict run failed
    /// validation or encoding failed.
    pub document: Option<EncodedDocument>,
    /// Encoding failure, if the encode phase was reached and failed. The
    /// report above is still the full validation result.
    pub encoding_error: Option<EngineError>,
    /// Timings and counts.
    pub metrics: RunMetrics,
}

/// Drives declaration runs against one schema provider.
pub struct Dispatcher<P: SchemaProvider> {
    provider: P,
}

impl<P: SchemaProvider> Dispatcher<P> {
    /// Creates a dispatcher over a provider.
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Processes one declaration: load, merge, validate, encode.
    ///
    /// Fatal conditions (unknown code, malformed schema, merge conflicts,
    /// encoding faults) abort with an error. A failed validation is a
    /// normal outcome: `success` is false and, in strict mode, `document`
    /// is `None`.
    pub fn process(
        &self,
        code: &str,
        input: DeclarationInput,
        company: &CompanyContext,
        options: &ProcessOptions,
    ) -> Result<ProcessOutcome, EngineError> {
        let run_start = Instant::now();
        let mut metrics = RunMetrics::default();
        info!(
            declaration = code,
            company = %company.rut,
            user = %company.user,
            "processing declaration"
        );

        let load_start = Instant::now();
        let schema = self.provider.load_schema(code)?;
        if !schema.active {
            return Err(EngineError::invalid_schema(
                code,
                "declaration is inactive",
            ));
        }

        // Compile once against an empty table set to learn which tables
        // the rules reference, then load those plus per-field tables.
        let probe = ValidationEngine::new(&schema, HashMap::new())?;
        let mut table_names = probe.referenced_tables();
        table_names.extend(
            schema
                .fields
                .iter()
                .filter_map(|f| f.lookup_table.clone()),
        );
        table_names.sort();
        table_names.dedup();

        let mut lookups = HashMap::new();
        for name in &table_names {
            match self.provider.load_lookup_table(name) {
                Ok(table) => {
                    lookups.insert(name.clone(), table);
                }
                // Rules touching the table are reported as skipped during
                // validation; the run itself continues.
                Err(e) => {
                    metrics.unavailable_tables += 1;
                    warn!(declaration = code, table = %name, error = %e, "lookup table unavailable");
                }
            }
        }
        metrics.load_ms = elapsed_ms(load_start);

        let merge_start = Instant::now();
        let rows = match (schema.kind, input) {
            (DeclarationKind::Simple, DeclarationInput::Simple(rows)) => rows,
            (DeclarationKind::Composite, DeclarationInput::Composite(sections)) => {
                merge(&sections, &schema)?
            }
            (DeclarationKind::Simple, DeclarationInput::Composite(_)) => {
                return Err(EngineError::invalid_schema(
                    code,
                    "simple declaration cannot take section input",
                ));
            }
            (DeclarationKind::Composite, DeclarationInput::Simple(_)) => {
                return Err(EngineError::invalid_schema(
                    code,
                    "composite declaration requires section input",
                ));
            }
        };
        metrics.merge_ms = elapsed_ms(merge_start);
        metrics.rows = rows.len();

        let validate_start = Instant::now();
        let engine = ValidationEngine::new(&schema, lookups)?;
        let report = engine.validate(&rows);
        metrics.validate_ms = elapsed_ms(validate_start);
        metrics.errors = report.summary.total_errors;
        metrics.skipped_rules = report.skipped.len();

        // Encoding failure keeps the report: the operator still gets the
        // full validation result alongside the fatal cause.
        let mut encoding_error = None;
        let document = if report.valid || !options.strict {
            let encode_start = Instant::now();
            let doc = match encode(&schema, &rows) {
                Ok(doc) => Some(doc),
                Err(e) => {
                    warn!(declaration = code, error = %e, "encoding failed");
                    encoding_error = Some(e);
                    None
                }
            };
            metrics.encode_ms = elapsed_ms(encode_start);
            doc
        } else {
            info!(
                declaration = code,
                errors = metrics.errors,
                "validation failed, document withheld"
            );
            None
        };

        metrics.total_ms = elapsed_ms(run_start);
        info!(
            declaration = code,
            rows = metrics.rows,
            errors = metrics.errors,
            skipped = metrics.skipped_rules,
            total_ms = metrics.total_ms,
            "run finished"
        );
        Ok(ProcessOutcome {
            success: report.valid && encoding_error.is_none(),
            report,
            document,
            encoding_error,
            metrics,
        })
    }
}
