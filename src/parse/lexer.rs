use std::iter::FusedIterator;

use winnow::ascii::digit1;
use winnow::combinator::{alt, opt};
use winnow::error::ModalResult;
use winnow::prelude::*;
use winnow::token::{any, one_of, take_while};

use crate::{CompareOp, Value};

use super::error::{LexError, LexErrorKind};
use super::token::{Spanned, Token};

// -- Token parsers ----------------------------------------------------------

fn whitespace<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    take_while(0.., |c: char| c.is_whitespace()).parse_next(input)
}

fn identifier<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    (
        take_while(1, |c: char| c.is_ascii_alphabetic() || c == '_'),
        take_while(0.., |c: char| c.is_ascii_alphanumeric() || c == '_'),
    )
        .take()
        .parse_next(input)
}

fn number<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    (
        opt('-'),
        digit1,
        opt(('.', digit1)),
        opt((one_of(['e', 'E']), opt(one_of(['+', '-'])), digit1)),
    )
        .take()
        .parse_next(input)
}

fn string_literal(input: &mut &str) -> ModalResult<String> {
    let quote = one_of(['\'', '"']).parse_next(input)?;
    let mut s = String::new();
    loop {
        let ch = any.parse_next(input)?;
        match ch {
            c if c == quote => return Ok(s),
            '\\' => {
                let esc = any.parse_next(input)?;
                match esc {
                    '\'' => s.push('\''),
                    '"' => s.push('"'),
                    '\\' => s.push('\\'),
                    'n' => s.push('\n'),
                    't' => s.push('\t'),
                    other => {
                        s.push('\\');
                        s.push(other);
                    }
                }
            }
            c => s.push(c),
        }
    }
}

fn punct<'i>(input: &mut &'i str) -> ModalResult<Token<'i>> {
    alt((
        '('.value(Token::LParen),
        ')'.value(Token::RParen),
        ">=".value(Token::Op(CompareOp::Gte)),
        '>'.value(Token::Op(CompareOp::Gt)),
        "<=".value(Token::Op(CompareOp::Lte)),
        '<'.value(Token::Op(CompareOp::Lt)),
        "!=".value(Token::Op(CompareOp::Neq)),
        "==".value(Token::Op(CompareOp::Eq)),
        '='.value(Token::Op(CompareOp::Eq)),
    ))
    .parse_next(input)
}

fn keyword(word: &str) -> Option<Token<'static>> {
    match word {
        "AND" | "and" => Some(Token::And),
        "OR" | "or" => Some(Token::Or),
        "true" => Some(Token::Literal(Value::Bool(true))),
        "false" => Some(Token::Literal(Value::Bool(false))),
        _ => None,
    }
}

fn number_value(text: &str) -> Option<Value> {
    if text.contains(|c: char| matches!(c, '.' | 'e' | 'E')) {
        text.parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .map(Value::Float)
    } else {
        text.parse::<i64>().ok().map(Value::Int)
    }
}

// -- Lexer ------------------------------------------------------------------

/// Lazy token stream over a rule string.
///
/// Yields tokens in order and finishes with [`Token::Eof`]. After the first
/// error, or after `Eof`, it yields `None`.
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    source: &'a str,
    rest: &'a str,
    finished: bool,
}

impl<'a> Lexer<'a> {
    #[must_use]
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            rest: source,
            finished: false,
        }
    }

    fn offset(&self) -> usize {
        self.source.len() - self.rest.len()
    }

    fn lex(&mut self, start: char, offset: usize) -> Result<Token<'a>, LexError> {
        let unexpected = |c: char| LexError::new(offset, LexErrorKind::UnexpectedChar(c));
        match start {
            '\'' | '"' => string_literal
                .parse_next(&mut self.rest)
                .map(|s| Token::Literal(Value::String(s)))
                .map_err(|_| LexError::new(offset, LexErrorKind::UnterminatedString)),
            c if c.is_ascii_digit() || c == '-' => {
                let text = number
                    .parse_next(&mut self.rest)
                    .map_err(|_| unexpected(c))?;
                number_value(text).map(Token::Literal).ok_or_else(|| {
                    LexError::new(offset, LexErrorKind::InvalidNumber(text.to_owned()))
                })
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let word = identifier
                    .parse_next(&mut self.rest)
                    .map_err(|_| unexpected(c))?;
                Ok(keyword(word).unwrap_or(Token::Ident(word)))
            }
            c => punct.parse_next(&mut self.rest).map_err(|_| unexpected(c)),
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Result<Spanned<'a>, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        // Zero or more characters, cannot fail.
        let _ = whitespace.parse_next(&mut self.rest);
        let offset = self.offset();

        let Some(start) = self.rest.chars().next() else {
            self.finished = true;
            return Some(Ok(Spanned {
                token: Token::Eof,
                offset,
            }));
        };

        let token = self.lex(start, offset);
        self.finished = token.is_err();
        Some(token.map(|token| Spanned { token, offset }))
    }
}

impl FusedIterator for Lexer<'_> {}

/// Split a rule string into tokens, lazily.
#[must_use]
pub fn tokenize(source: &str) -> Lexer<'_> {
    Lexer::new(source)
}
