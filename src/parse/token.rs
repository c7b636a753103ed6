use std::fmt;

use crate::{CompareOp, Value};

/// A lexical token of the rule language.
#[derive(Debug, Clone, PartialEq)]
pub enum Token<'a> {
    Ident(&'a str),
    /// A number, quoted string, `true` or `false`.
    Literal(Value),
    Op(CompareOp),
    And,
    Or,
    LParen,
    RParen,
    Eof,
}

/// A token together with the byte offset where it starts.
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned<'a> {
    pub token: Token<'a>,
    pub offset: usize,
}

/// Describes the token the way error messages quote it.
impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Ident(name) => write!(f, "identifier '{name}'"),
            Token::Literal(value @ Value::String(_)) => write!(f, "literal {value}"),
            Token::Literal(value) => write!(f, "literal '{value}'"),
            Token::Op(op) => write!(f, "operator '{op}'"),
            Token::And => f.write_str("'AND'"),
            Token::Or => f.write_str("'OR'"),
            Token::LParen => f.write_str("'('"),
            Token::RParen => f.write_str("')'"),
            Token::Eof => f.write_str("end of input"),
        }
    }
}
