use thiserror::Error;

use crate::CompareOp;

/// Input that could not be split into tokens.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("lex error at position {position}: {kind}")]
pub struct LexError {
    position: usize,
    kind: LexErrorKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexErrorKind {
    #[error("unexpected character '{0}'")]
    UnexpectedChar(char),

    #[error("unterminated string literal")]
    UnterminatedString,

    #[error("invalid number literal '{0}'")]
    InvalidNumber(String),
}

impl LexError {
    pub(crate) fn new(position: usize, kind: LexErrorKind) -> Self {
        Self { position, kind }
    }

    /// Byte offset of the offending token in the rule text.
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    #[must_use]
    pub fn kind(&self) -> &LexErrorKind {
        &self.kind
    }
}

/// A token stream that does not form a valid rule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("parse error at position {position}: {kind}")]
pub struct ParseError {
    position: usize,
    kind: ParseErrorKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    #[error("empty input")]
    EmptyInput,

    #[error("missing comparison operator after '{field}', found {found}")]
    MissingOperator { field: String, found: String },

    #[error("missing value after '{field} {op}', found {found}")]
    MissingValue {
        field: String,
        op: CompareOp,
        found: String,
    },

    #[error("expected {expected}, found {found}")]
    Unexpected {
        expected: &'static str,
        found: String,
    },

    #[error("unmatched '('")]
    UnclosedParen,

    #[error("unmatched ')'")]
    UnmatchedCloseParen,

    #[error("unexpected trailing input starting with {found}")]
    TrailingInput { found: String },

    #[error("parentheses nested deeper than {limit} levels")]
    TooDeep { limit: usize },

    #[error("condition tree deeper than {limit} levels")]
    TreeTooDeep { limit: usize },
}

impl ParseError {
    pub(crate) fn new(position: usize, kind: ParseErrorKind) -> Self {
        Self { position, kind }
    }

    /// Byte offset of the token the parser stopped at. For
    /// [`ParseErrorKind::UnclosedParen`] this is the unmatched `(`.
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    #[must_use]
    pub fn kind(&self) -> &ParseErrorKind {
        &self.kind
    }
}
