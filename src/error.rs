use thiserror::Error;

use crate::parse::{LexError, ParseError};
use crate::{EvaluationError, RuleId};

/// Unified error type for every engine operation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("rule {id} not found")]
    NotFound { id: RuleId },

    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error(transparent)]
    Evaluation(#[from] EvaluationError),

    #[cfg(feature = "serde")]
    #[error(transparent)]
    Record(#[from] crate::RecordError),
}

impl Error {
    pub(crate) fn invalid_input(reason: impl Into<String>) -> Self {
        Error::InvalidInput {
            reason: reason.into(),
        }
    }
}
