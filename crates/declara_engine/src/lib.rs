//! Processing dispatcher.
//!
//! The dispatcher drives one declaration run end to end: load the schema
//! from the provider, load the lookup tables its rules reference, merge
//! sections for composite declarations, validate, and encode the output
//! file. In strict mode (the default) a failed validation stops the run
//! before any document is produced.

mod dispatcher;
mod metrics;

pub use dispatcher::{
    CompanyContext, DeclarationInput, Dispatcher, ProcessOptions, ProcessOutcome,
};
pub use metrics::RunMetrics;
