use std::fmt;

use super::condition::Condition;

/// Identifier assigned by a [`RuleStore`](crate::RuleStore).
///
/// Ids start at 1, grow monotonically and are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct RuleId(pub u64);

impl From<u64> for RuleId {
    fn from(id: u64) -> Self {
        RuleId(id)
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A stored rule: its parsed condition plus the text it came from.
///
/// For combined rules `source` is synthesized from the parts, e.g.
/// `(age > 20) AND (salary > 30000)`, and parses back to `condition`.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub id: RuleId,
    pub condition: Condition,
    pub source: String,
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rule({}: {})", self.id, self.source)
    }
}
