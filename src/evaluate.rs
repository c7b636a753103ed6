use crate::{Condition, EvaluationError, Record};

/// Walk `condition` against `record`.
///
/// Both sides of every AND/OR are evaluated, left first, so a data error
/// anywhere in the tree is reported even when the other side already decides
/// the result.
pub(crate) fn evaluate(condition: &Condition, record: &Record) -> Result<bool, EvaluationError> {
    match condition {
        Condition::Compare { field, op, value } => {
            let actual = record
                .get(field)
                .ok_or_else(|| EvaluationError::missing_field(field))?;
            actual
                .compare(*op, value)
                .ok_or_else(|| EvaluationError::type_mismatch(field, value.kind(), actual.kind()))
        }
        Condition::And(a, b) => {
            let left = evaluate(a, record)?;
            let right = evaluate(b, record)?;
            Ok(left && right)
        }
        Condition::Or(a, b) => {
            let left = evaluate(a, record)?;
            let right = evaluate(b, record)?;
            Ok(left || right)
        }
    }
}
