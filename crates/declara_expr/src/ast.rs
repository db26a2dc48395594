//! Compiled expression representation.
//!
//! Expressions are plain data: no code execution is reachable from an
//! [`Expr`], and regex patterns are compiled once, at schema-load time.

use regex::Regex;

/// Binary operators, loosest-binding first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Or,
    And,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Add,
    Sub,
    Mul,
    Div,
}

/// Calls into the closed builtin library.
#[derive(Debug, Clone)]
pub enum Call {
    /// `is_null(x)` — null/absent/blank check.
    IsNull(Box<Expr>),
    /// `is_number(x)` — numeric check.
    IsNumber(Box<Expr>),
    /// `length(x)` — character length of the textual form.
    Length(Box<Expr>),
    /// `valid_rut(x)` — RUT with a correct modulo-11 check digit.
    ValidRut(Box<Expr>),
    /// `between(x, lo, hi)` — inclusive numeric range.
    Between(Box<Expr>, Box<Expr>, Box<Expr>),
    /// `matches(x, 're')` — regex match, pattern compiled ahead of time.
    Matches(Box<Expr>, Regex),
    /// `lookup('table', 'key_col', x, 'ret_col')` — reference-table lookup.
    Lookup {
        table: String,
        key_column: String,
        key: Box<Expr>,
        return_column: String,
    },
    /// `in_table('table', 'key_col', x)` — reference-table membership.
    InTable {
        table: String,
        key_column: String,
        key: Box<Expr>,
    },
}

/// A compiled expression tree.
#[derive(Debug, Clone)]
pub enum Expr {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    /// `value` or a technical field code resolved against the current row.
    Ident(String),
    Not(Box<Expr>),
    Neg(Box<Expr>),
    Binary {
        op: BinOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Call(Call),
}

impl Expr {
    /// Collects the lookup-table names the expression references, so a run
    /// can load them ahead of evaluation.
    pub fn referenced_tables(&self) -> Vec<String> {
        let mut tables = Vec::new();
        self.collect_tables(&mut tables);
        tables.sort();
        tables.dedup();
        tables
    }

    fn collect_tables(&self, out: &mut Vec<String>) {
        match self {
            Expr::Not(inner) | Expr::Neg(inner) => inner.collect_tables(out),
            Expr::Binary { lhs, rhs, .. } => {
                lhs.collect_tables(out);
                rhs.collect_tables(out);
            }
            Expr::Call(call) => match call {
                Call::IsNull(x) | Call::IsNumber(x) | Call::Length(x) | Call::ValidRut(x) => {
                    x.collect_tables(out)
                }
                Call::Between(x, lo, hi) => {
                    x.collect_tables(out);
                    lo.collect_tables(out);
                    hi.collect_tables(out);
                }
                Call::Matches(x, _) => x.collect_tables(out),
                Call::Lookup { table, key, .. } | Call::InTable { table, key, .. } => {
                    out.push(table.clone());
                    key.collect_tables(out);
                }
            },
            _ => {}
        }
    }
}
