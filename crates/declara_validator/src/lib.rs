//! Validation engine and section merger.
//!
//! This crate takes a loaded [`DeclarationSchema`](declara_core::DeclarationSchema)
//! and a row set and produces a structured
//! [`ValidationReport`](declara_core::ValidationReport). For composite
//! declarations the [`merge`] function first consolidates the per-section
//! row sets into one flat table.

pub mod engine;
pub mod merger;

pub use engine::ValidationEngine;
pub use merger::merge;
