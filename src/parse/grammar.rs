use std::mem;

use crate::{Condition, Error};

use super::error::{ParseError, ParseErrorKind};
use super::lexer::Lexer;
use super::token::{Spanned, Token};

/// Recursive-descent parser pulling tokens from a [`Lexer`] one at a time.
///
/// Precedence, low to high: `OR`, `AND`, primary (comparison or parenthesized
/// expression). Chains fold to the left.
pub(crate) struct Parser<'a> {
    lexer: Lexer<'a>,
    lookahead: Spanned<'a>,
    depth: usize,
    max_depth: usize,
    max_tree_depth: usize,
}

/// A parsed subtree and its height.
struct Node {
    condition: Condition,
    height: usize,
}

impl<'a> Parser<'a> {
    pub(crate) fn new(
        input: &'a str,
        max_depth: usize,
        max_tree_depth: usize,
    ) -> Result<Self, Error> {
        let mut lexer = Lexer::new(input);
        let lookahead = next_token(&mut lexer, input.len())?;
        Ok(Self {
            lexer,
            lookahead,
            depth: 0,
            max_depth,
            max_tree_depth,
        })
    }

    /// Parse a complete rule. The whole input must be consumed.
    pub(crate) fn parse(mut self) -> Result<Condition, Error> {
        if self.lookahead.token == Token::Eof {
            return Err(ParseError::new(0, ParseErrorKind::EmptyInput).into());
        }

        let node = self.or_expr()?;

        match &self.lookahead.token {
            Token::Eof => Ok(node.condition),
            Token::RParen => Err(self.error(ParseErrorKind::UnmatchedCloseParen)),
            other => {
                let found = other.to_string();
                Err(self.error(ParseErrorKind::TrailingInput { found }))
            }
        }
    }

    // -- Token handling ------------------------------------------------------

    fn advance(&mut self) -> Result<Spanned<'a>, Error> {
        let end = self.lookahead.offset;
        let next = next_token(&mut self.lexer, end)?;
        Ok(mem::replace(&mut self.lookahead, next))
    }

    fn error(&self, kind: ParseErrorKind) -> Error {
        ParseError::new(self.lookahead.offset, kind).into()
    }

    fn found(&self) -> String {
        self.lookahead.token.to_string()
    }

    // -- Expressions ---------------------------------------------------------

    fn or_expr(&mut self) -> Result<Node, Error> {
        let mut left = self.and_expr()?;
        while self.lookahead.token == Token::Or {
            let at = self.advance()?.offset;
            let right = self.and_expr()?;
            left = self.join(at, left, right, Condition::or)?;
        }
        Ok(left)
    }

    fn and_expr(&mut self) -> Result<Node, Error> {
        let mut left = self.primary()?;
        while self.lookahead.token == Token::And {
            let at = self.advance()?.offset;
            let right = self.primary()?;
            left = self.join(at, left, right, Condition::and)?;
        }
        Ok(left)
    }

    /// Build a logical node, failing at the operator once the tree would
    /// outgrow `max_tree_depth`.
    fn join(
        &self,
        at: usize,
        left: Node,
        right: Node,
        connect: fn(Condition, Condition) -> Condition,
    ) -> Result<Node, Error> {
        let height = left.height.max(right.height) + 1;
        if height > self.max_tree_depth {
            return Err(ParseError::new(
                at,
                ParseErrorKind::TreeTooDeep {
                    limit: self.max_tree_depth,
                },
            )
            .into());
        }
        Ok(Node {
            condition: connect(left.condition, right.condition),
            height,
        })
    }

    fn primary(&mut self) -> Result<Node, Error> {
        match self.lookahead.token {
            Token::LParen => self.group(),
            Token::Ident(_) => self.comparison(),
            _ => Err(self.error(ParseErrorKind::Unexpected {
                expected: "a comparison or '('",
                found: self.found(),
            })),
        }
    }

    fn group(&mut self) -> Result<Node, Error> {
        if self.depth >= self.max_depth {
            return Err(self.error(ParseErrorKind::TooDeep {
                limit: self.max_depth,
            }));
        }

        let open = self.advance()?;
        self.depth += 1;
        let inner = self.or_expr()?;
        self.depth -= 1;

        match self.lookahead.token {
            Token::RParen => {
                self.advance()?;
                Ok(inner)
            }
            Token::Eof => Err(ParseError::new(open.offset, ParseErrorKind::UnclosedParen).into()),
            _ => Err(self.error(ParseErrorKind::Unexpected {
                expected: "'AND', 'OR' or ')'",
                found: self.found(),
            })),
        }
    }

    fn comparison(&mut self) -> Result<Node, Error> {
        let field = match self.lookahead.token {
            Token::Ident(name) => name.to_owned(),
            _ => {
                return Err(self.error(ParseErrorKind::Unexpected {
                    expected: "a field name",
                    found: self.found(),
                }))
            }
        };
        self.advance()?;

        let op = match self.lookahead.token {
            Token::Op(op) => op,
            _ => {
                return Err(self.error(ParseErrorKind::MissingOperator {
                    field,
                    found: self.found(),
                }))
            }
        };
        self.advance()?;

        let value = match &self.lookahead.token {
            Token::Literal(value) => value.clone(),
            _ => {
                return Err(self.error(ParseErrorKind::MissingValue {
                    field,
                    op,
                    found: self.found(),
                }))
            }
        };
        self.advance()?;

        Ok(Node {
            condition: Condition::Compare { field, op, value },
            height: 1,
        })
    }
}

/// Pull the next token. A lexer that already finished reports `Eof` at `end`.
fn next_token<'a>(lexer: &mut Lexer<'a>, end: usize) -> Result<Spanned<'a>, Error> {
    match lexer.next() {
        Some(Ok(spanned)) => Ok(spanned),
        Some(Err(err)) => Err(err.into()),
        None => Ok(Spanned {
            token: Token::Eof,
            offset: end,
        }),
    }
}
