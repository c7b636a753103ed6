use std::collections::HashMap;

use super::value::Value;

/// The data a rule is evaluated against: field names mapped to [`Value`]s.
///
/// Values are typed once, when the record is built. The evaluator never
/// reinterprets them, so `"30"` stays a string.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    values: HashMap<String, Value>,
}

impl Record {
    /// Create an empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field, replacing any previous value.
    #[must_use]
    pub fn set(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.insert(field, value.into());
        self
    }

    /// Insert a field (mutable reference version).
    pub fn insert(&mut self, field: &str, value: Value) {
        self.values.insert(field.to_owned(), value);
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.values.get(field)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K, V> FromIterator<(K, V)> for Record
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[cfg(feature = "serde")]
mod json {
    use thiserror::Error;

    use super::{Record, Value};

    /// Errors produced when converting a JSON document into a [`Record`].
    #[derive(Debug, Clone, PartialEq, Eq, Error)]
    pub enum RecordError {
        #[error("record must be a JSON object, found {found}")]
        NotAnObject { found: &'static str },

        #[error("field '{field}' holds unsupported JSON {found}")]
        UnsupportedValue { field: String, found: &'static str },
    }

    fn json_type_name(value: &serde_json::Value) -> &'static str {
        match value {
            serde_json::Value::Null => "null",
            serde_json::Value::Bool(_) => "boolean",
            serde_json::Value::Number(_) => "number",
            serde_json::Value::String(_) => "string",
            serde_json::Value::Array(_) => "array",
            serde_json::Value::Object(_) => "object",
        }
    }

    impl Record {
        /// Build a record from a JSON object.
        ///
        /// Integers that fit in `i64` become [`Value::Int`], other numbers
        /// become [`Value::Float`]. Strings and booleans map directly.
        ///
        /// # Errors
        ///
        /// Returns [`RecordError`] if `json` is not an object or any field is
        /// `null`, an array or a nested object.
        pub fn from_json(json: &serde_json::Value) -> Result<Self, RecordError> {
            let serde_json::Value::Object(map) = json else {
                return Err(RecordError::NotAnObject {
                    found: json_type_name(json),
                });
            };

            let mut record = Record::new();
            for (field, raw) in map {
                let value = match raw {
                    serde_json::Value::Bool(b) => Value::Bool(*b),
                    serde_json::Value::String(s) => Value::String(s.clone()),
                    serde_json::Value::Number(n) => match (n.as_i64(), n.as_f64()) {
                        (Some(i), _) => Value::Int(i),
                        (None, Some(f)) => Value::Float(f),
                        (None, None) => {
                            return Err(RecordError::UnsupportedValue {
                                field: field.clone(),
                                found: "number",
                            })
                        }
                    },
                    other => {
                        return Err(RecordError::UnsupportedValue {
                            field: field.clone(),
                            found: json_type_name(other),
                        })
                    }
                };
                record.insert(field, value);
            }
            Ok(record)
        }
    }

    impl TryFrom<serde_json::Value> for Record {
        type Error = RecordError;

        fn try_from(json: serde_json::Value) -> Result<Self, Self::Error> {
            Record::from_json(&json)
        }
    }

}

#[cfg(feature = "serde")]
pub use json::RecordError;
