//! Tree-walking evaluator for compiled expressions.
//!
//! Evaluation is pure: the context exposes exactly the field value, the
//! current row, the full row set and the loaded lookup tables. Every AST
//! node visit consumes one step from a fixed budget so a pathological
//! expression cannot stall a run.

use std::collections::HashMap;

use declara_core::{LookupTable, Row, RowSet, Value};

use crate::ast::{BinOp, Call, Expr};
use crate::error::EvalError;

/// Default per-evaluation step budget.
pub const DEFAULT_STEP_BUDGET: usize = 10_000;

/// Read-only context one expression evaluates against.
pub struct EvalContext<'a> {
    /// Value of the field under validation.
    pub value: &'a Value,
    /// The full current row, by field code.
    pub row: &'a Row,
    /// The full row set.
    pub rows: &'a RowSet,
    /// Lookup tables loaded for this run.
    pub lookups: &'a HashMap<String, LookupTable>,
}

/// Expression evaluator with a step budget.
#[derive(Debug, Clone, Copy)]
pub struct Evaluator {
    budget: usize,
}

impl Evaluator {
    /// Creates an evaluator with the default budget.
    pub fn new() -> Self {
        Self {
            budget: DEFAULT_STEP_BUDGET,
        }
    }

    /// Creates an evaluator with an explicit step budget.
    pub fn with_budget(budget: usize) -> Self {
        Self { budget }
    }

    /// Evaluates an expression to a boolean.
    ///
    /// A type fault, an exhausted budget, a missing lookup table or a
    /// non-boolean result all fail with [`EvalError`]; the caller records
    /// the rule as skipped.
    pub fn evaluate(&self, expr: &Expr, ctx: &EvalContext<'_>) -> Result<bool, EvalError> {
        let mut steps = self.budget;
        match self.eval(expr, ctx, &mut steps)? {
            Value::Bool(b) => Ok(b),
            other => Err(EvalError::NonBoolean(other.kind_name())),
        }
    }

    fn eval(
        &self,
        expr: &Expr,
        ctx: &EvalContext<'_>,
        steps: &mut usize,
    ) -> Result<Value, EvalError> {
        if *steps == 0 {
            return Err(EvalError::BudgetExhausted(self.budget));
        }
        *steps -= 1;

        match expr {
            Expr::Null => Ok(Value::Null),
            Expr::Bool(b) => Ok(Value::Bool(*b)),
            Expr::Int(i) => Ok(Value::Int(*i)),
            Expr::Float(f) => Ok(Value::Float(*f)),
            Expr::Str(s) => Ok(Value::Text(s.clone())),
            Expr::Ident(name) => Ok(self.resolve(name, ctx)),
            Expr::Not(inner) => match self.eval(inner, ctx, steps)? {
                Value::Bool(b) => Ok(Value::Bool(!b)),
                other => Err(EvalError::TypeFault(format!(
                    "'not' applied to {}",
                    other.kind_name()
                ))),
            },
            Expr::Neg(inner) => {
                let value = self.eval(inner, ctx, steps)?;
                match value {
                    Value::Int(i) => Ok(Value::Int(-i)),
                    Value::Float(f) => Ok(Value::Float(-f)),
                    other => Err(EvalError::TypeFault(format!(
                        "negation applied to {}",
                        other.kind_name()
                    ))),
                }
            }
            Expr::Binary { op, lhs, rhs } => self.binary(*op, lhs, rhs, ctx, steps),
            Expr::Call(call) => self.call(call, ctx, steps),
        }
    }

    fn resolve(&self, name: &str, ctx: &EvalContext<'_>) -> Value {
        if name == "value" {
            return ctx.value.clone();
        }
        ctx.row.get(name).cloned().unwrap_or(Value::Null)
    }

    fn binary(
        &self,
        op: BinOp,
        lhs: &Expr,
        rhs: &Expr,
        ctx: &EvalContext<'_>,
        steps: &mut usize,
    ) -> Result<Value, EvalError> {
        // Boolean combinators short-circuit.
        if matches!(op, BinOp::And | BinOp::Or) {
            let left = expect_bool(self.eval(lhs, ctx, steps)?, "boolean operator")?;
            return match (op, left) {
                (BinOp::And, false) => Ok(Value::Bool(false)),
                (BinOp::Or, true) => Ok(Value::Bool(true)),
                _ => {
                    let right = expect_bool(self.eval(rhs, ctx, steps)?, "boolean operator")?;
                    Ok(Value::Bool(right))
                }
            };
        }

        let left = self.eval(lhs, ctx, steps)?;
        let right = self.eval(rhs, ctx, steps)?;

        match op {
            BinOp::Eq => Ok(Value::Bool(values_equal(&left, &right))),
            BinOp::Ne => Ok(Value::Bool(!values_equal(&left, &right))),
            BinOp::Lt | BinOp::Le | BinOp::Gt | BinOp::Ge => {
                let ordering = match compare(&left, &right)? {
                    Some(ord) => ord,
                    // Comparisons against null are false, not faults: rules
                    // routinely guard with is_null separately.
                    None => return Ok(Value::Bool(false)),
                };
                let result = match op {
                    BinOp::Lt => ordering.is_lt(),
                    BinOp::Le => ordering.is_le(),
                    BinOp::Gt => ordering.is_gt(),
                    _ => ordering.is_ge(),
                };
                Ok(Value::Bool(result))
            }
            BinOp::Add | BinOp::Sub | BinOp::Mul | BinOp::Div => {
                let l = numeric(&left, "arithmetic")?;
                let r = numeric(&right, "arithmetic")?;
                let result = match op {
                    BinOp::Add => l + r,
                    BinOp::Sub => l - r,
                    BinOp::Mul => l * r,
                    _ => {
                        if r == 0.0 {
                            return Err(EvalError::DivisionByZero);
                        }
                        l / r
                    }
                };
                Ok(Value::Float(result))
            }
            BinOp::And | BinOp::Or => unreachable!("handled above"),
        }
    }

    fn call(
        &self,
        call: &Call,
        ctx: &EvalContext<'_>,
        steps: &mut usize,
    ) -> Result<Value, EvalError> {
        match call {
            Call::IsNull(x) => {
                let value = self.eval(x, ctx, steps)?;
                Ok(Value::Bool(value.is_null()))
            }
            Call::IsNumber(x) => {
                let value = self.eval(x, ctx, steps)?;
                let numeric = !matches!(value, Value::Bool(_)) && value.as_number().is_some();
                Ok(Value::Bool(numeric))
            }
            Call::Length(x) => {
                let value = self.eval(x, ctx, steps)?;
                let length = if value.is_null() {
                    0
                } else {
                    value.as_text().map_or(0, |t| t.chars().count())
                };
                Ok(Value::Int(length as i64))
            }
            Call::ValidRut(x) => {
                let value = self.eval(x, ctx, steps)?;
                let valid = value
                    .as_text()
                    .is_some_and(|t| declara_core::rut::is_valid_rut(&t));
                Ok(Value::Bool(valid))
            }
            Call::Between(x, lo, hi) => {
                let x = self.eval(x, ctx, steps)?;
                let lo = numeric(&self.eval(lo, ctx, steps)?, "between")?;
                let hi = numeric(&self.eval(hi, ctx, steps)?, "between")?;
                // Non-numeric subjects are out of range, not faults.
                let inside = x.as_number().is_some_and(|n| lo <= n && n <= hi);
                Ok(Value::Bool(inside))
            }
            Call::Matches(x, regex) => {
                let value = self.eval(x, ctx, steps)?;
                if value.is_null() {
                    return Ok(Value::Bool(false));
                }
                let text = value.as_text().unwrap_or_default();
                Ok(Value::Bool(regex.is_match(&text)))
            }
            Call::Lookup {
                table,
                key_column,
                key,
                return_column,
            } => {
                let key = self.eval(key, ctx, steps)?;
                let table = self.table(table, ctx)?;
                let found = key
                    .as_text()
                    .and_then(|k| table.get(key_column, &k, return_column));
                Ok(found.map_or(Value::Null, |v| Value::Text(v.to_string())))
            }
            Call::InTable {
                table,
                key_column,
                key,
            } => {
                let key = self.eval(key, ctx, steps)?;
                let table = self.table(table, ctx)?;
                let member = key.as_text().is_some_and(|k| table.contains(key_column, &k));
                Ok(Value::Bool(member))
            }
        }
    }

    fn table<'a>(
        &self,
        name: &str,
        ctx: &'a EvalContext<'_>,
    ) -> Result<&'a LookupTable, EvalError> {
        ctx.lookups
            .get(name)
            .ok_or_else(|| EvalError::LookupUnavailable(name.to_string()))
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}

fn expect_bool(value: Value, context: &str) -> Result<bool, EvalError> {
    match value {
        Value::Bool(b) => Ok(b),
        other => Err(EvalError::TypeFault(format!(
            "{context} applied to {}",
            other.kind_name()
        ))),
    }
}

fn numeric(value: &Value, context: &str) -> Result<f64, EvalError> {
    if matches!(value, Value::Bool(_)) {
        return Err(EvalError::TypeFault(format!(
            "{context} applied to boolean"
        )));
    }
    value
        .as_number()
        .ok_or_else(|| EvalError::TypeFault(format!("{context} applied to {}", value.kind_name())))
}

fn values_equal(left: &Value, right: &Value) -> bool {
    if left.is_null() || right.is_null() {
        return left.is_null() && right.is_null();
    }
    if let (Some(l), Some(r)) = (left.as_number(), right.as_number()) {
        return l == r;
    }
    match (left.as_text(), right.as_text()) {
        (Some(l), Some(r)) => l == r,
        _ => false,
    }
}

fn compare(left: &Value, right: &Value) -> Result<Option<std::cmp::Ordering>, EvalError> {
    if left.is_null() || right.is_null() {
        return Ok(None);
    }
    if let (Some(l), Some(r)) = (left.as_number(), right.as_number()) {
        return Ok(l.partial_cmp(&r));
    }
    match (left, right) {
        (Value::Text(l), Value::Text(r)) => Ok(Some(l.cmp(r))),
        (Value::Date(l), Value::Date(r)) => Ok(Some(l.cmp(r))),
        _ => Err(EvalError::TypeFault(format!(
            "cannot order {} against {}",
            left.kind_name(),
            right.kind_name()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::compile;
    use declara_core::rowset::row;
    use pretty_assertions::assert_eq;

    fn check(expr: &str, value: Value) -> Result<bool, EvalError> {
        check_with_row(expr, value, row(&[]))
    }

    fn check_with_row(expr: &str, value: Value, current: Row) -> Result<bool, EvalError> {
        let compiled = compile(expr).expect("expression compiles");
        let rows = RowSet::from_rows(vec![current.clone()]);
        let lookups = HashMap::new();
        let ctx = EvalContext {
            value: &value,
            row: &current,
            rows: &rows,
            lookups: &lookups,
        };
        Evaluator::new().evaluate(&compiled, &ctx)
    }

    #[test]
    fn comparisons_and_arithmetic() {
        assert_eq!(check("value > 0", Value::Int(5)), Ok(true));
        assert_eq!(check("value * 2 == 10", Value::Int(5)), Ok(true));
        assert_eq!(check("value >= 10", Value::Int(5)), Ok(false));
        // Null comparisons are false, not faults.
        assert_eq!(check("value > 0", Value::Null), Ok(false));
    }

    #[test]
    fn row_context_is_visible() {
        let current = row(&[("C2", Value::Int(100)), ("C3", Value::Text("A".into()))]);
        assert_eq!(
            check_with_row("C2 > 50 and C3 == 'A'", Value::Null, current),
            Ok(true)
        );
        // Unknown identifiers resolve to null.
        assert_eq!(check("is_null(C9)", Value::Null), Ok(true));
    }

    #[test]
    fn builtins() {
        assert_eq!(check("is_null(value)", Value::Text("  ".into())), Ok(true));
        assert_eq!(check("is_number(value)", Value::Text("12.5".into())), Ok(true));
        assert_eq!(check("is_number(value)", Value::Text("rut".into())), Ok(false));
        assert_eq!(check("length(value) == 4", Value::Text("abcd".into())), Ok(true));
        assert_eq!(check("length(value) == 0", Value::Null), Ok(true));
        assert_eq!(check("between(value, 0, 100)", Value::Int(100)), Ok(true));
        assert_eq!(check("between(value, 0, 100)", Value::Text("x".into())), Ok(false));
        assert_eq!(
            check("matches(value, '^[0-9]{8}-[0-9K]$')", Value::Text("12345678-5".into())),
            Ok(true)
        );
        assert_eq!(check("matches(value, '^a$')", Value::Null), Ok(false));
        assert_eq!(
            check("valid_rut(value)", Value::Text("12.345.678-5".into())),
            Ok(true)
        );
        assert_eq!(
            check("valid_rut(value)", Value::Text("12345678-9".into())),
            Ok(false)
        );
        assert_eq!(check("valid_rut(value)", Value::Null), Ok(false));
    }

    #[test]
    fn lookup_builtins_use_loaded_tables() {
        let compiled = compile("in_table('COMUNAS', 'codigo', value)").unwrap();
        let value = Value::Text("13101".into());
        let current = row(&[]);
        let rows = RowSet::new();
        let mut lookups = HashMap::new();
        lookups.insert(
            "COMUNAS".to_string(),
            LookupTable::new(
                "COMUNAS",
                vec!["codigo".into(), "nombre".into()],
                vec![vec!["13101".into(), "Santiago".into()]],
            ),
        );
        let ctx = EvalContext {
            value: &value,
            row: &current,
            rows: &rows,
            lookups: &lookups,
        };
        assert_eq!(Evaluator::new().evaluate(&compiled, &ctx), Ok(true));

        // Missing table is an evaluation fault, not a validation failure.
        let empty = HashMap::new();
        let ctx = EvalContext {
            value: &value,
            row: &current,
            rows: &rows,
            lookups: &empty,
        };
        assert!(matches!(
            Evaluator::new().evaluate(&compiled, &ctx),
            Err(EvalError::LookupUnavailable(_))
        ));
    }

    #[test]
    fn non_boolean_result_is_an_error() {
        assert!(matches!(
            check("value + 1", Value::Int(1)),
            Err(EvalError::NonBoolean(_))
        ));
    }

    #[test]
    fn step_budget_is_enforced() {
        let compiled = compile("value + 1 + 2 + 3 + 4 > 0").unwrap();
        let value = Value::Int(1);
        let current = row(&[]);
        let rows = RowSet::new();
        let lookups = HashMap::new();
        let ctx = EvalContext {
            value: &value,
            row: &current,
            rows: &rows,
            lookups: &lookups,
        };
        assert!(matches!(
            Evaluator::with_budget(3).evaluate(&compiled, &ctx),
            Err(EvalError::BudgetExhausted(3))
        ));
        assert_eq!(Evaluator::new().evaluate(&compiled, &ctx), Ok(true));
    }

    #[test]
    fn type_faults_surface() {
        assert!(matches!(
            check("value and true", Value::Int(1)),
            Err(EvalError::TypeFault(_))
        ));
        assert!(matches!(
            check("value / 0 > 1", Value::Int(1)),
            Err(EvalError::DivisionByZero)
        ));
    }
}
