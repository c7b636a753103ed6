//! Boolean rules over flat records, written as text.
//!
//! Rules like `(age > 30 AND department = 'Sales')` are parsed into
//! [`Condition`] trees, stored in a [`RuleStore`] under numeric ids, combined
//! with AND, and evaluated against [`Record`]s. [`RuleEngine`] wraps all of
//! this behind text-in, verdict-out operations.

mod combine;
mod config;
mod engine;
mod error;
mod evaluate;
pub mod parse;
#[cfg(feature = "snapshot")]
mod snapshot;
mod store;
mod types;

pub use config::EngineConfig;
pub use engine::RuleEngine;
pub use error::Error;
#[cfg(feature = "snapshot")]
pub use snapshot::{DeserializeError, SerializeError};
pub use store::RuleStore;
#[cfg(feature = "serde")]
pub use types::RecordError;
pub use types::{
    field, CompareOp, Condition, EvaluationError, EvaluationErrorKind, FieldCondition, Record,
    Rule, RuleId, Value, ValueKind,
};
