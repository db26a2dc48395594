//! Error types for rule compilation and evaluation.

use thiserror::Error;

/// Errors raised while compiling rule expression text into the closed
/// grammar. Compilation happens at schema-load time; any failure rejects
/// the schema.
#[derive(Debug, Error)]
pub enum CompileError {
    /// Lexical or syntactic fault in the expression text.
    #[error("syntax error at offset {offset}: {message}")]
    Syntax {
        /// Byte offset into the expression text
        offset: usize,
        /// What went wrong
        message: String,
    },

    /// Call to a function outside the closed builtin library.
    #[error("unknown function '{0}'")]
    UnknownFunction(String),

    /// Builtin called with the wrong number of arguments.
    #[error("'{function}' expects {expected} argument(s), found {found}")]
    Arity {
        function: &'static str,
        expected: usize,
        found: usize,
    },

    /// Regex pattern that does not compile.
    #[error("invalid regex '{pattern}': {error}")]
    InvalidRegex { pattern: String, error: String },

    /// `matches`/`lookup`/`in_table` require literal pattern, table and
    /// column arguments so they can be resolved ahead of evaluation.
    #[error("'{function}' requires a string literal for its {argument} argument")]
    NonLiteralArgument {
        function: &'static str,
        argument: &'static str,
    },

    /// Non-Required rule with empty expression text.
    #[error("rule expression is empty")]
    EmptyExpression,
}

/// Errors raised while evaluating a compiled expression.
///
/// These are per-rule, non-fatal: the validation engine records the rule
/// as skipped and continues.
#[derive(Debug, Error, PartialEq)]
pub enum EvalError {
    /// The step budget ran out.
    #[error("evaluation exceeded the step budget of {0}")]
    BudgetExhausted(usize),

    /// An operator or builtin was applied to an incompatible value.
    #[error("type fault: {0}")]
    TypeFault(String),

    /// Division by zero.
    #[error("division by zero")]
    DivisionByZero,

    /// A lookup table referenced by the expression was not loaded.
    #[error("lookup table '{0}' not available")]
    LookupUnavailable(String),

    /// The top-level result was not a boolean.
    #[error("expression produced a non-boolean result ({0})")]
    NonBoolean(&'static str),
}
