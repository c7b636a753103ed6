mod condition;
mod error;
mod record;
mod rule;
mod value;

pub use condition::{field, CompareOp, Condition, FieldCondition};
pub use error::{EvaluationError, EvaluationErrorKind};
#[cfg(feature = "serde")]
pub use record::RecordError;
pub use record::Record;
pub use rule::{Rule, RuleId};
pub use value::{Value, ValueKind};
