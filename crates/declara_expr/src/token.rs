//! Tokenizer for rule expression text.

use crate::error::CompileError;

/// A lexical token with its byte offset in the source text.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Int(i64),
    Float(f64),
    Str(String),
    Ident(String),
    True,
    False,
    Null,
    And,
    Or,
    Not,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
    Comma,
}

/// Splits expression text into tokens.
pub fn tokenize(text: &str) -> Result<Vec<(Token, usize)>, CompileError> {
    let bytes = text.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let c = bytes[i] as char;
        match c {
            ' ' | '\t' | '\r' | '\n' => i += 1,
            '(' => {
                tokens.push((Token::LParen, i));
                i += 1;
            }
            ')' => {
                tokens.push((Token::RParen, i));
                i += 1;
            }
            ',' => {
                tokens.push((Token::Comma, i));
                i += 1;
            }
            '+' => {
                tokens.push((Token::Plus, i));
                i += 1;
            }
            '-' => {
                tokens.push((Token::Minus, i));
                i += 1;
            }
            '*' => {
                tokens.push((Token::Star, i));
                i += 1;
            }
            '/' => {
                tokens.push((Token::Slash, i));
                i += 1;
            }
            '=' => {
                if bytes.get(i + 1) == Some(&b'=') {
                    tokens.push((Token::Eq, i));
                    i += 2;
                } else {
                    return Err(syntax(i, "expected '==' (single '=' is not assignment)"));
                }
            }
            '!' => {
                if bytes.get(i + 1) == Some(&b'=') {
                    tokens.push((Token::Ne, i));
                    i += 2;
                } else {
                    tokens.push((Token::Not, i));
                    i += 1;
                }
            }
            '<' => {
                if bytes.get(i + 1) == Some(&b'=') {
                    tokens.push((Token::Le, i));
                    i += 2;
                } else {
                    tokens.push((Token::Lt, i));
                    i += 1;
                }
            }
            '>' => {
                if bytes.get(i + 1) == Some(&b'=') {
                    tokens.push((Token::Ge, i));
                    i += 2;
                } else {
                    tokens.push((Token::Gt, i));
                    i += 1;
                }
            }
            '&' => {
                if bytes.get(i + 1) == Some(&b'&') {
                    tokens.push((Token::And, i));
                    i += 2;
                } else {
                    return Err(syntax(i, "expected '&&'"));
                }
            }
            '|' => {
                if bytes.get(i + 1) == Some(&b'|') {
                    tokens.push((Token::Or, i));
                    i += 2;
                } else {
                    return Err(syntax(i, "expected '||'"));
                }
            }
            '\'' | '"' => {
                let (literal, next) = read_string(text, i, c)?;
                tokens.push((Token::Str(literal), i));
                i = next;
            }
            c if c.is_ascii_digit() => {
                let (token, next) = read_number(text, i)?;
                tokens.push((token, i));
                i = next;
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let start = i;
                while i < bytes.len()
                    && ((bytes[i] as char).is_ascii_alphanumeric() || bytes[i] == b'_')
                {
                    i += 1;
                }
                let word = &text[start..i];
                let token = match word {
                    "and" => Token::And,
                    "or" => Token::Or,
                    "not" => Token::Not,
                    "true" => Token::True,
                    "false" => Token::False,
                    "null" => Token::Null,
                    _ => Token::Ident(word.to_string()),
                };
                tokens.push((token, start));
            }
            other => return Err(syntax(i, format!("unexpected character '{other}'"))),
        }
    }

    Ok(tokens)
}

fn syntax(offset: usize, message: impl Into<String>) -> CompileError {
    CompileError::Syntax {
        offset,
        message: message.into(),
    }
}

fn read_string(text: &str, start: usize, quote: char) -> Result<(String, usize), CompileError> {
    let mut literal = String::new();
    let mut chars = text[start + 1..].char_indices();
    while let Some((offset, c)) = chars.next() {
        if c == quote {
            return Ok((literal, start + 1 + offset + quote.len_utf8()));
        }
        if c == '\\' {
            match chars.next() {
                Some((_, escaped @ ('\\' | '\'' | '"'))) => literal.push(escaped),
                Some((_, escaped)) => {
                    // Leave unknown escapes intact: regex patterns carry
                    // sequences like \d through to the regex compiler.
                    literal.push('\\');
                    literal.push(escaped);
                }
                None => break,
            }
        } else {
            literal.push(c);
        }
    }
    Err(syntax(start, "unterminated string literal"))
}

fn read_number(text: &str, start: usize) -> Result<(Token, usize), CompileError> {
    let bytes = text.as_bytes();
    let mut i = start;
    let mut is_float = false;
    while i < bytes.len() {
        match bytes[i] {
            b'0'..=b'9' => i += 1,
            b'.' if !is_float && bytes.get(i + 1).is_some_and(u8::is_ascii_digit) => {
                is_float = true;
                i += 1;
            }
            _ => break,
        }
    }
    let literal = &text[start..i];
    let token = if is_float {
        Token::Float(
            literal
                .parse()
                .map_err(|_| syntax(start, format!("invalid number '{literal}'")))?,
        )
    } else {
        Token::Int(
            literal
                .parse()
                .map_err(|_| syntax(start, format!("invalid number '{literal}'")))?,
        )
    };
    Ok((token, i))
}
