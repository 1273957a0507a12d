//! Formula tokenizer.
//!
//! Splits formula text (without the leading `=`) into tokens. At every position
//! a single anchored pattern is tried, preferring operators, then the function
//! keywords, numbers, cell references and finally `:` and `,`. Whitespace runs
//! are skipped; anything else is a tokenize error carrying the remaining text.

use regex::{Captures, Regex};
use std::fmt;
use std::sync::OnceLock;

use super::CellRef;
use super::error::{EvalError, Result};

/// Aggregate functions usable as a unary prefix (`sum(A0:A9)`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Function {
    Sum,
    Avg,
    Max,
}

impl Function {
    pub fn name(self) -> &'static str {
        match self {
            Function::Sum => "sum",
            Function::Avg => "avg",
            Function::Max => "max",
        }
    }
}

/// A lexical unit of a formula.
#[derive(Clone, Debug, PartialEq)]
pub enum Token {
    /// Numeric literal, kept as written.
    Number(String),
    Cell(CellRef),
    Function(Function),
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
    Colon,
    Comma,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(literal) => write!(f, "{}", literal),
            Token::Cell(cell) => write!(f, "{}", cell),
            Token::Function(func) => write!(f, "{}", func.name()),
            Token::Plus => write!(f, "+"),
            Token::Minus => write!(f, "-"),
            Token::Star => write!(f, "*"),
            Token::Slash => write!(f, "/"),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::Colon => write!(f, ":"),
            Token::Comma => write!(f, ","),
        }
    }
}

fn token_re() -> &'static Regex {
    static TOKEN_RE: OnceLock<Regex> = OnceLock::new();
    TOKEN_RE.get_or_init(|| {
        Regex::new(concat!(
            r"^(?:(?<op>[-+*/()])",
            r"|(?<func>sum|avg|max)",
            r"|(?<num>[0-9]+(?:\.[0-9]+)?)",
            r"|(?<cell>[A-Z][0-9]+)",
            r"|(?<colon>:)",
            r"|(?<comma>,))",
        ))
        .expect("token regex must compile")
    })
}

fn whitespace_re() -> &'static Regex {
    static WS_RE: OnceLock<Regex> = OnceLock::new();
    WS_RE.get_or_init(|| Regex::new(r"^\s+").expect("whitespace regex must compile"))
}

/// Tokenize formula text into an ordered token sequence.
pub fn tokenize(text: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut rest = text;

    while !rest.is_empty() {
        if let Some(caps) = token_re().captures(rest) {
            let len = caps.get(0).map_or(0, |m| m.len());
            tokens.push(token_from_captures(&caps, rest)?);
            rest = &rest[len..];
        } else if let Some(ws) = whitespace_re().find(rest) {
            rest = &rest[ws.end()..];
        } else {
            return Err(tokenize_error(rest));
        }
    }

    Ok(tokens)
}

fn token_from_captures(caps: &Captures<'_>, rest: &str) -> Result<Token> {
    if let Some(op) = caps.name("op") {
        return Ok(match op.as_str() {
            "+" => Token::Plus,
            "-" => Token::Minus,
            "*" => Token::Star,
            "/" => Token::Slash,
            "(" => Token::LParen,
            _ => Token::RParen,
        });
    }
    if let Some(func) = caps.name("func") {
        return Ok(Token::Function(match func.as_str() {
            "sum" => Function::Sum,
            "avg" => Function::Avg,
            _ => Function::Max,
        }));
    }
    if let Some(num) = caps.name("num") {
        return Ok(Token::Number(num.as_str().to_string()));
    }
    if let Some(cell) = caps.name("cell") {
        // Row digits that overflow usize cannot address a cell.
        return CellRef::parse(cell.as_str())
            .map(Token::Cell)
            .ok_or_else(|| tokenize_error(rest));
    }
    if caps.name("colon").is_some() {
        return Ok(Token::Colon);
    }
    Ok(Token::Comma)
}

fn tokenize_error(rest: &str) -> EvalError {
    EvalError::Tokenize {
        rest: rest.to_string(),
    }
}
