//! Sandboxed rule expression language.
//!
//! Rule expressions persisted in the metadata store are compiled into a
//! closed grammar (comparisons, arithmetic, boolean combinators and a
//! fixed builtin library) and evaluated by a pure tree-walker under a step
//! budget. There is no escape hatch: no host-language evaluation, no I/O,
//! no identifier resolution beyond the current row.
//!
//! ```
//! use declara_core::{RowSet, Value, rowset::row};
//! use declara_expr::{EvalContext, Evaluator, compile};
//! use std::collections::HashMap;
//!
//! let expr = compile("is_number(value) and between(value, 0, 100)").unwrap();
//! let value = Value::Int(42);
//! let current = row(&[]);
//! let rows = RowSet::new();
//! let lookups = HashMap::new();
//! let ctx = EvalContext {
//!     value: &value,
//!     row: &current,
//!     rows: &rows,
//!     lookups: &lookups,
//! };
//! assert_eq!(Evaluator::new().evaluate(&expr, &ctx), Ok(true));
//! ```

pub mod ast;
pub mod error;
pub mod eval;
pub mod parser;
pub mod rule;
mod token;

pub use ast::{BinOp, Call, Expr};
pub use error::{CompileError, EvalError};
pub use eval::{DEFAULT_STEP_BUDGET, EvalContext, Evaluator};
pub use parser::compile;
pub use rule::{CompiledRule, RuleBody, compile_rule};
