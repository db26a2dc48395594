//! Recursive-descent parser for the rule expression grammar.
//!
//! ```text
//! expr    := or
//! or      := and { ("or" | "||") and }
//! and     := not { ("and" | "&&") not }
//! not     := ("not" | "!") not | cmp
//! cmp     := add [ ("==" | "!=" | "<" | "<=" | ">" | ">=") add ]
//! add     := mul { ("+" | "-") mul }
//! mul     := unary { ("*" | "/") unary }
//! unary   := "-" unary | primary
//! primary := literal | ident | ident "(" args ")" | "(" expr ")"
//! ```

use regex::Regex;

use crate::ast::{BinOp, Call, Expr};
use crate::error::CompileError;
use crate::token::{Token, tokenize};

/// Maximum nesting depth; rule texts are short, anything deeper is hostile
/// or broken metadata.
const MAX_DEPTH: usize = 128;

/// Compiles expression text into an [`Expr`].
pub fn compile(text: &str) -> Result<Expr, CompileError> {
    if text.trim().is_empty() {
        return Err(CompileError::EmptyExpression);
    }
    let tokens = tokenize(text)?;
    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };
    let expr = parser.expr()?;
    if parser.pos != parser.tokens.len() {
        let (_, offset) = parser.tokens[parser.pos];
        return Err(CompileError::Syntax {
            offset,
            message: "trailing input after expression".into(),
        });
    }
    Ok(expr)
}

struct Parser {
    tokens: Vec<(Token, usize)>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(t, _)| t)
    }

    fn bump(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).map(|(t, _)| t.clone());
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn offset(&self) -> usize {
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .map_or(0, |(_, o)| *o)
    }

    fn error(&self, message: impl Into<String>) -> CompileError {
        CompileError::Syntax {
            offset: self.offset(),
            message: message.into(),
        }
    }

    fn expect(&mut self, token: Token, what: &str) -> Result<(), CompileError> {
        if self.peek() == Some(&token) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.error(format!("expected {what}")))
        }
    }

    /// Bounds recursion so pathological nesting fails instead of blowing
    /// the stack.
    fn descend(&mut self) -> Result<(), CompileError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            Err(self.error("expression nested too deeply"))
        } else {
            Ok(())
        }
    }

    fn expr(&mut self) -> Result<Expr, CompileError> {
        self.descend()?;
        let result = self.or();
        self.depth -= 1;
        result
    }

    fn or(&mut self) -> Result<Expr, CompileError> {
        let mut lhs = self.and()?;
        while self.peek() == Some(&Token::Or) {
            self.pos += 1;
            let rhs = self.and()?;
            lhs = binary(BinOp::Or, lhs, rhs);
        }
        Ok(lhs)
    }

    fn and(&mut self) -> Result<Expr, CompileError> {
        let mut lhs = self.not()?;
        while self.peek() == Some(&Token::And) {
            self.pos += 1;
            let rhs = self.not()?;
            lhs = binary(BinOp::And, lhs, rhs);
        }
        Ok(lhs)
    }

    fn not(&mut self) -> Result<Expr, CompileError> {
        if self.peek() == Some(&Token::Not) {
            self.pos += 1;
            self.descend()?;
            let inner = self.not();
            self.depth -= 1;
            return Ok(Expr::Not(Box::new(inner?)));
        }
        self.cmp()
    }

    fn cmp(&mut self) -> Result<Expr, CompileError> {
        let lhs = self.add()?;
        let op = match self.peek() {
            Some(Token::Eq) => BinOp::Eq,
            Some(Token::Ne) => BinOp::Ne,
            Some(Token::Lt) => BinOp::Lt,
            Some(Token::Le) => BinOp::Le,
            Some(Token::Gt) => BinOp::Gt,
            Some(Token::Ge) => BinOp::Ge,
            _ => return Ok(lhs),
        };
        self.pos += 1;
        let rhs = self.add()?;
        Ok(binary(op, lhs, rhs))
    }

    fn add(&mut self) -> Result<Expr, CompileError> {
        let mut lhs = self.mul()?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinOp::Add,
                Some(Token::Minus) => BinOp::Sub,
                _ => return Ok(lhs),
            };
            self.pos += 1;
            let rhs = self.mul()?;
            lhs = binary(op, lhs, rhs);
        }
    }

    fn mul(&mut self) -> Result<Expr, CompileError> {
        let mut lhs = self.unary()?;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinOp::Mul,
                Some(Token::Slash) => BinOp::Div,
                _ => return Ok(lhs),
            };
            self.pos += 1;
            let rhs = self.unary()?;
            lhs = binary(op, lhs, rhs);
        }
    }

    fn unary(&mut self) -> Result<Expr, CompileError> {
        if self.peek() == Some(&Token::Minus) {
            self.pos += 1;
            self.descend()?;
            let inner = self.unary();
            self.depth -= 1;
            return Ok(Expr::Neg(Box::new(inner?)));
        }
        self.primary()
    }

    fn primary(&mut self) -> Result<Expr, CompileError> {
        match self.bump() {
            Some(Token::Int(i)) => Ok(Expr::Int(i)),
            Some(Token::Float(f)) => Ok(Expr::Float(f)),
            Some(Token::Str(s)) => Ok(Expr::Str(s)),
            Some(Token::True) => Ok(Expr::Bool(true)),
            Some(Token::False) => Ok(Expr::Bool(false)),
            Some(Token::Null) => Ok(Expr::Null),
            Some(Token::LParen) => {
                let inner = self.expr()?;
                self.expect(Token::RParen, "')'")?;
                Ok(inner)
            }
            Some(Token::Ident(name)) => {
                if self.peek() == Some(&Token::LParen) {
                    self.pos += 1;
                    let args = self.arguments()?;
                    self.call(&name, args)
                } else {
                    Ok(Expr::Ident(name))
                }
            }
            _ => Err(self.error("expected a value, identifier or '('")),
        }
    }

    fn arguments(&mut self) -> Result<Vec<Expr>, CompileError> {
        let mut args = Vec::new();
        if self.peek() == Some(&Token::RParen) {
            self.pos += 1;
            return Ok(args);
        }
        loop {
            args.push(self.expr()?);
            match self.bump() {
                Some(Token::Comma) => continue,
                Some(Token::RParen) => return Ok(args),
                _ => return Err(self.error("expected ',' or ')' in argument list")),
            }
        }
    }

    /// Resolves a call against the closed builtin library.
    fn call(&self, name: &str, mut args: Vec<Expr>) -> Result<Expr, CompileError> {
        let call = match name {
            "is_null" => Call::IsNull(Box::new(one("is_null", args)?)),
            "is_number" => Call::IsNumber(Box::new(one("is_number", args)?)),
            "length" => Call::Length(Box::new(one("length", args)?)),
            "valid_rut" => Call::ValidRut(Box::new(one("valid_rut", args)?)),
            "between" => {
                check_arity("between", 3, &args)?;
                let hi = args.pop().expect("arity checked");
                let lo = args.pop().expect("arity checked");
                let x = args.pop().expect("arity checked");
                Call::Between(Box::new(x), Box::new(lo), Box::new(hi))
            }
            "matches" => {
                check_arity("matches", 2, &args)?;
                let pattern = literal(args.pop().expect("arity checked"), "matches", "pattern")?;
                let regex = Regex::new(&pattern).map_err(|e| CompileError::InvalidRegex {
                    pattern,
                    error: e.to_string(),
                })?;
                Call::Matches(Box::new(args.pop().expect("arity checked")), regex)
            }
            "lookup" => {
                check_arity("lookup", 4, &args)?;
                let return_column = literal(args.pop().expect("arity checked"), "lookup", "return column")?;
                let key = args.pop().expect("arity checked");
                let key_column = literal(args.pop().expect("arity checked"), "lookup", "key column")?;
                let table = literal(args.pop().expect("arity checked"), "lookup", "table")?;
                Call::Lookup {
                    table,
                    key_column,
                    key: Box::new(key),
                    return_column,
                }
            }
            "in_table" => {
                check_arity("in_table", 3, &args)?;
                let key = args.pop().expect("arity checked");
                let key_column = literal(args.pop().expect("arity checked"), "in_table", "key column")?;
                let table = literal(args.pop().expect("arity checked"), "in_table", "table")?;
                Call::InTable {
                    table,
                    key_column,
                    key: Box::new(key),
                }
            }
            other => return Err(CompileError::UnknownFunction(other.to_string())),
        };
        Ok(Expr::Call(call))
    }
}

fn binary(op: BinOp, lhs: Expr, rhs: Expr) -> Expr {
    Expr::Binary {
        op,
        lhs: Box::new(lhs),
        rhs: Box::new(rhs),
    }
}

fn check_arity(
    function: &'static str,
    expected: usize,
    args: &[Expr],
) -> Result<(), CompileError> {
    if args.len() == expected {
        Ok(())
    } else {
        Err(CompileError::Arity {
            function,
            expected,
            found: args.len(),
        })
    }
}

fn one(function: &'static str, mut args: Vec<Expr>) -> Result<Expr, CompileError> {
    check_arity(function, 1, &args)?;
    Ok(args.pop().expect("arity checked"))
}

fn literal(
    expr: Expr,
    function: &'static str,
    argument: &'static str,
) -> Result<String, CompileError> {
    match expr {
        Expr::Str(s) => Ok(s),
        _ => Err(CompileError::NonLiteralArgument { function, argument }),
    }
}
