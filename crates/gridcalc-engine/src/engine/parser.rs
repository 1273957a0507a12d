//! Recursive-descent formula parser.
//!
//! Grammar, tightest binding last:
//!
//! ```text
//! Top   := Add (',' Add)?
//! Add   := Mul (('+'|'-') Mul)?
//! Mul   := Unary (('*'|'/') Unary)?
//! Unary := ('-'|'sum'|'avg'|'max') Atom | Atom
//! Atom  := '(' Top ')' | Number | Cell (':' Cell)?
//! ```
//!
//! Each binary level applies at most one operator, so `1+2+3` leaves `+3`
//! unconsumed and is rejected as trailing input. Parenthesize to chain:
//! `(1+2)+3`.

use std::fmt;

use super::CellRef;
use super::error::{ParseError, Result};
use super::token::{Function, Token, tokenize};

/// Prefix operators: negation and the aggregate functions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnaryOp {
    Negate,
    Sum,
    Avg,
    Max,
}

impl UnaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOp::Negate => "-",
            UnaryOp::Sum => "sum",
            UnaryOp::Avg => "avg",
            UnaryOp::Max => "max",
        }
    }
}

impl From<Function> for UnaryOp {
    fn from(func: Function) -> Self {
        match func {
            Function::Sum => UnaryOp::Sum,
            Function::Avg => UnaryOp::Avg,
            Function::Max => UnaryOp::Max,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    /// Operand list separator, flattened away before reduction.
    Comma,
}

impl BinaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Comma => ",",
        }
    }
}

/// Formula expression tree.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Number(String),
    Cell(CellRef),
    /// Rectangular block `start:end`; only valid as an operator argument.
    Range(CellRef, CellRef),
    Unary(UnaryOp, Box<Expr>),
    Binary(BinaryOp, Box<Expr>, Box<Expr>),
}

impl Expr {
    pub fn unary(op: UnaryOp, operand: Expr) -> Expr {
        Expr::Unary(op, Box::new(operand))
    }

    pub fn binary(op: BinaryOp, left: Expr, right: Expr) -> Expr {
        Expr::Binary(op, Box::new(left), Box::new(right))
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Number(literal) => write!(f, "{}", literal),
            Expr::Cell(cell) => write!(f, "{}", cell),
            Expr::Range(start, end) => write!(f, "{}:{}", start, end),
            Expr::Unary(UnaryOp::Negate, operand) => write!(f, "-{}", operand),
            Expr::Unary(op, operand) => write!(f, "{}({})", op.symbol(), operand),
            Expr::Binary(BinaryOp::Comma, left, right) => write!(f, "{}, {}", left, right),
            Expr::Binary(op, left, right) => write!(f, "({} {} {})", left, op.symbol(), right),
        }
    }
}

/// Tokenize and parse formula text (without the leading `=`).
pub fn parse_formula(text: &str) -> Result<Expr> {
    let tokens = tokenize(text)?;
    parse(&tokens)
}

/// Parse a complete token sequence. Leftover tokens are an error.
pub fn parse(tokens: &[Token]) -> Result<Expr> {
    let mut parser = Parser { tokens, pos: 0 };
    let expr = parser.parse_top()?;
    if let Some(token) = parser.peek() {
        return Err(ParseError::TrailingInput(token.to_string()).into());
    }
    Ok(expr)
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<&'a Token> {
        let token = self.tokens.get(self.pos);
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn parse_top(&mut self) -> Result<Expr> {
        let left = self.parse_add()?;
        if self.peek() == Some(&Token::Comma) {
            self.pos += 1;
            let right = self.parse_add()?;
            return Ok(Expr::binary(BinaryOp::Comma, left, right));
        }
        Ok(left)
    }

    fn parse_add(&mut self) -> Result<Expr> {
        let left = self.parse_mul()?;
        let op = match self.peek() {
            Some(Token::Plus) => BinaryOp::Add,
            Some(Token::Minus) => BinaryOp::Sub,
            _ => return Ok(left),
        };
        self.pos += 1;
        let right = self.parse_mul()?;
        Ok(Expr::binary(op, left, right))
    }

    fn parse_mul(&mut self) -> Result<Expr> {
        let left = self.parse_unary()?;
        let op = match self.peek() {
            Some(Token::Star) => BinaryOp::Mul,
            Some(Token::Slash) => BinaryOp::Div,
            _ => return Ok(left),
        };
        self.pos += 1;
        let right = self.parse_unary()?;
        Ok(Expr::binary(op, left, right))
    }

    fn parse_unary(&mut self) -> Result<Expr> {
        let op = match self.peek() {
            None => return Err(ParseError::UnexpectedEnd { expected: "unary" }.into()),
            Some(Token::Minus) => UnaryOp::Negate,
            Some(Token::Function(func)) => UnaryOp::from(*func),
            Some(_) => return self.parse_atom(),
        };
        self.pos += 1;
        let operand = self.parse_atom()?;
        Ok(Expr::unary(op, operand))
    }

    fn parse_atom(&mut self) -> Result<Expr> {
        let Some(token) = self.next() else {
            return Err(ParseError::UnexpectedEnd { expected: "atom" }.into());
        };
        match token {
            Token::LParen => {
                let inner = self.parse_top()?;
                match self.next() {
                    Some(Token::RParen) => Ok(inner),
                    _ => Err(ParseError::UnmatchedParen.into()),
                }
            }
            Token::Number(literal) => Ok(Expr::Number(literal.clone())),
            Token::Cell(start) => {
                if self.peek() != Some(&Token::Colon) {
                    return Ok(Expr::Cell(*start));
                }
                self.pos += 1;
                match self.next() {
                    Some(Token::Cell(end)) => Ok(Expr::Range(*start, *end)),
                    _ => Err(ParseError::InvalidAtom(format!("{}:", start)).into()),
                }
            }
            other => Err(ParseError::InvalidAtom(other.to_string()).into()),
        }
    }
}
