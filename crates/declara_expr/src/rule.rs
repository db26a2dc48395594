//! Rule compilation.
//!
//! Schemas persist rule expressions as text; this module turns a
//! [`RuleDef`] into a [`CompiledRule`] at schema-load time so syntax
//! faults, unknown functions and bad regexes reject the schema before any
//! data is touched.

use declara_core::{RuleDef, RuleKind};

use crate::ast::Expr;
use crate::error::CompileError;
use crate::parser::compile;

/// The executable body of a rule.
#[derive(Debug, Clone)]
pub enum RuleBody {
    /// Presence check; no expression, the engine tests the value directly.
    Required,
    /// Any other kind: a compiled boolean expression.
    Expr(Expr),
}

/// A rule ready for evaluation.
#[derive(Debug, Clone)]
pub struct CompiledRule {
    /// The rule definition as persisted in the metadata store.
    pub def: RuleDef,
    /// Compiled body.
    pub body: RuleBody,
}

impl CompiledRule {
    /// Lookup-table names the rule body references.
    pub fn referenced_tables(&self) -> Vec<String> {
        match &self.body {
            RuleBody::Required => Vec::new(),
            RuleBody::Expr(expr) => expr.referenced_tables(),
        }
    }
}

/// Compiles one rule definition.
///
/// `Required` rules carry no expression; everything else is parsed into
/// the closed grammar.
pub fn compile_rule(def: RuleDef) -> Result<CompiledRule, CompileError> {
    let body = match def.kind {
        RuleKind::Required => RuleBody::Required,
        _ => RuleBody::Expr(compile(&def.expression)?),
    };
    Ok(CompiledRule { def, body })
}
