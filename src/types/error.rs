use thiserror::Error;

use super::value::ValueKind;

/// Why a comparison could not be evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EvaluationErrorKind {
    #[error("not present in record")]
    MissingField,

    #[error("type mismatch, expected {expected} but found {found}")]
    TypeMismatch { expected: ValueKind, found: ValueKind },
}

/// A data error met while walking a condition against a record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("field '{field}': {kind}")]
pub struct EvaluationError {
    pub kind: EvaluationErrorKind,
    pub field: String,
}

impl EvaluationError {
    pub(crate) fn missing_field(field: &str) -> Self {
        Self {
            kind: EvaluationErrorKind::MissingField,
            field: field.to_owned(),
        }
    }

    pub(crate) fn type_mismatch(field: &str, expected: ValueKind, found: ValueKind) -> Self {
        Self {
            kind: EvaluationErrorKind::TypeMismatch { expected, found },
            field: field.to_owned(),
        }
    }
}
