//! Rule text to [`Condition`] trees.
//!
//! ```
//! use ruletree::{field, parse::parse};
//!
//! let condition = parse("(age > 30 AND department = 'Sales')").unwrap();
//! assert_eq!(condition, field("age").gt(30_i64).and(field("department").eq("Sales")));
//! ```

mod error;
mod grammar;
mod lexer;
mod token;

pub use error::{LexError, LexErrorKind, ParseError, ParseErrorKind};
pub use lexer::{tokenize, Lexer};
pub use token::{Spanned, Token};

use crate::config::{DEFAULT_MAX_NESTING_DEPTH, DEFAULT_MAX_TREE_DEPTH};
use crate::{Condition, Error};

/// Parse a rule string into a [`Condition`].
///
/// # Errors
///
/// Returns [`Error::Lex`] if the text contains characters that do not form
/// tokens, or [`Error::Parse`] if the tokens do not form a rule.
pub fn parse(input: &str) -> Result<Condition, Error> {
    parse_with_depth(input, DEFAULT_MAX_NESTING_DEPTH)
}

/// Like [`parse`], with an explicit limit on parenthesis nesting.
///
/// # Errors
///
/// As [`parse`], plus [`ParseErrorKind::TooDeep`] past `max_depth`.
pub fn parse_with_depth(input: &str, max_depth: usize) -> Result<Condition, Error> {
    parse_with_limits(input, max_depth, DEFAULT_MAX_TREE_DEPTH)
}

/// Like [`parse_with_depth`], also bounding the depth of the resulting tree.
///
/// # Errors
///
/// As [`parse_with_depth`], plus [`ParseErrorKind::TreeTooDeep`] once the
/// tree would grow past `max_tree_depth`.
pub fn parse_with_limits(
    input: &str,
    max_depth: usize,
    max_tree_depth: usize,
) -> Result<Condition, Error> {
    grammar::Parser::new(input, max_depth, max_tree_depth)?.parse()
}
