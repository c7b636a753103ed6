use std::fmt;

use super::record::Record;
use super::value::Value;
use crate::EvaluationError;

/// Comparison operators supported in rule expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    Eq,
    Neq,
    Gt,
    Gte,
    Lt,
    Lte,
}

/// A parsed rule: comparisons at the leaves, binary AND/OR above them.
///
/// Each child is owned by exactly one parent. Longer chains are built from
/// nested binary nodes; the parser and the combiner both fold to the left,
/// so `a AND b AND c` is `And(And(a, b), c)`.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Compare {
        field: String,
        op: CompareOp,
        value: Value,
    },
    And(Box<Condition>, Box<Condition>),
    Or(Box<Condition>, Box<Condition>),
}

impl Condition {
    #[must_use]
    pub fn and(self, other: Condition) -> Condition {
        Condition::And(Box::new(self), Box::new(other))
    }

    #[must_use]
    pub fn or(self, other: Condition) -> Condition {
        Condition::Or(Box::new(self), Box::new(other))
    }

    /// Evaluate this condition against a record.
    ///
    /// # Errors
    ///
    /// Returns [`EvaluationError`] if a referenced field is missing from the
    /// record or holds a value of a different kind than the literal.
    pub fn evaluate(&self, record: &Record) -> Result<bool, EvaluationError> {
        crate::evaluate::evaluate(self, record)
    }

    /// Number of comparison leaves.
    #[must_use]
    pub fn leaf_count(&self) -> usize {
        match self {
            Condition::Compare { .. } => 1,
            Condition::And(a, b) | Condition::Or(a, b) => a.leaf_count() + b.leaf_count(),
        }
    }

    /// Height of the tree; a single comparison has depth 1.
    #[must_use]
    pub fn depth(&self) -> usize {
        match self {
            Condition::Compare { .. } => 1,
            Condition::And(a, b) | Condition::Or(a, b) => 1 + a.depth().max(b.depth()),
        }
    }

    /// Field names referenced by the leaves, left to right, with repeats.
    #[must_use]
    pub fn fields(&self) -> Vec<&str> {
        let mut out = Vec::new();
        collect_fields(self, &mut out);
        out
    }
}

fn collect_fields<'a>(condition: &'a Condition, out: &mut Vec<&'a str>) {
    match condition {
        Condition::Compare { field, .. } => out.push(field),
        Condition::And(a, b) | Condition::Or(a, b) => {
            collect_fields(a, out);
            collect_fields(b, out);
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompareOp::Eq => write!(f, "="),
            CompareOp::Neq => write!(f, "!="),
            CompareOp::Gt => write!(f, ">"),
            CompareOp::Gte => write!(f, ">="),
            CompareOp::Lt => write!(f, "<"),
            CompareOp::Lte => write!(f, "<="),
        }
    }
}

/// Renders the condition back into rule text with only the parentheses the
/// parser needs: an OR operand of an AND, and a logical right operand that
/// would otherwise be folded to the left. Chains print flat, so the output
/// never nests deeper than any text that parses to the same tree.
impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::Compare { field, op, value } => write!(f, "{field} {op} {value}"),
            Condition::And(a, b) => {
                operand(f, a, matches!(**a, Condition::Or(..)))?;
                f.write_str(" AND ")?;
                operand(f, b, !matches!(**b, Condition::Compare { .. }))
            }
            Condition::Or(a, b) => {
                operand(f, a, false)?;
                f.write_str(" OR ")?;
                operand(f, b, matches!(**b, Condition::Or(..)))
            }
        }
    }
}

fn operand(f: &mut fmt::Formatter<'_>, condition: &Condition, grouped: bool) -> fmt::Result {
    if grouped {
        write!(f, "({condition})")
    } else {
        write!(f, "{condition}")
    }
}

/// Intermediate builder for comparison leaves.
/// Created by [`field()`]; requires a comparison method to produce a [`Condition`].
#[derive(Debug, Clone)]
pub struct FieldCondition {
    name: String,
}

impl FieldCondition {
    fn compare(self, op: CompareOp, value: impl Into<Value>) -> Condition {
        Condition::Compare {
            field: self.name,
            op,
            value: value.into(),
        }
    }

    #[must_use]
    pub fn eq(self, value: impl Into<Value>) -> Condition {
        self.compare(CompareOp::Eq, value)
    }

    #[must_use]
    pub fn neq(self, value: impl Into<Value>) -> Condition {
        self.compare(CompareOp::Neq, value)
    }

    #[must_use]
    pub fn gt(self, value: impl Into<Value>) -> Condition {
        self.compare(CompareOp::Gt, value)
    }

    #[must_use]
    pub fn gte(self, value: impl Into<Value>) -> Condition {
        self.compare(CompareOp::Gte, value)
    }

    #[must_use]
    pub fn lt(self, value: impl Into<Value>) -> Condition {
        self.compare(CompareOp::Lt, value)
    }

    #[must_use]
    pub fn lte(self, value: impl Into<Value>) -> Condition {
        self.compare(CompareOp::Lte, value)
    }
}

#[must_use]
pub fn field(name: &str) -> FieldCondition {
    FieldCondition {
        name: name.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_gt_i64() {
        let cond = field("age").gt(30_i64);
        assert_eq!(
            cond,
            Condition::Compare {
                field: "age".to_owned(),
                op: CompareOp::Gt,
                value: Value::Int(30),
            }
        );
    }

    #[test]
    fn field_eq_str() {
        let cond = field("department").eq("Sales");
        assert_eq!(
            cond,
            Condition::Compare {
                field: "department".to_owned(),
                op: CompareOp::Eq,
                value: Value::String("Sales".to_owned()),
            }
        );
    }

    #[test]
    fn all_compare_ops() {
        let ops = vec![
            (field("f").eq(1_i64), CompareOp::Eq),
            (field("f").neq(1_i64), CompareOp::Neq),
            (field("f").gt(1_i64), CompareOp::Gt),
            (field("f").gte(1_i64), CompareOp::Gte),
            (field("f").lt(1_i64), CompareOp::Lt),
            (field("f").lte(1_i64), CompareOp::Lte),
        ];
        for (cond, expected_op) in ops {
            match cond {
                Condition::Compare { op, .. } => assert_eq!(op, expected_op),
                other => panic!("expected Compare, got {other:?}"),
            }
        }
    }

    #[test]
    fn and_chaining_is_left_nested() {
        let cond = field("a")
            .eq(1_i64)
            .and(field("b").eq(2_i64))
            .and(field("c").eq(3_i64));

        match &cond {
            Condition::And(left, right) => {
                assert_eq!(**right, field("c").eq(3_i64));
                assert!(matches!(left.as_ref(), Condition::And(_, _)));
            }
            other => panic!("expected outer And, got {other:?}"),
        }
        assert_eq!(cond.leaf_count(), 3);
        assert_eq!(cond.depth(), 3);
        assert_eq!(cond.fields(), vec!["a", "b", "c"]);
    }

    #[test]
    fn or_chaining() {
        let cond = field("x").eq(1_i64).or(field("y").eq(2_i64));
        assert!(matches!(cond, Condition::Or(_, _)));
        assert_eq!(cond.depth(), 2);
    }

    #[test]
    fn display_comparison() {
        assert_eq!(field("age").gte(18_i64).to_string(), "age >= 18");
        assert_eq!(field("dept").neq("HR").to_string(), "dept != 'HR'");
        assert_eq!(field("ratio").lt(0.5_f64).to_string(), "ratio < 0.5");
    }

    #[test]
    fn display_groups_only_where_needed() {
        let cond = field("age")
            .gt(30_i64)
            .and(field("department").eq("Sales"))
            .or(field("salary").gte(50_000_i64));
        assert_eq!(
            cond.to_string(),
            "age > 30 AND department = 'Sales' OR salary >= 50000"
        );

        let or_under_and = field("a")
            .eq(1_i64)
            .or(field("b").eq(2_i64))
            .and(field("c").eq(3_i64));
        assert_eq!(or_under_and.to_string(), "(a = 1 OR b = 2) AND c = 3");

        let right_nested = field("a")
            .eq(1_i64)
            .and(field("b").eq(2_i64).and(field("c").eq(3_i64)));
        assert_eq!(right_nested.to_string(), "a = 1 AND (b = 2 AND c = 3)");

        let and_under_or = field("a")
            .eq(1_i64)
            .or(field("b").eq(2_i64).and(field("c").eq(3_i64)));
        assert_eq!(and_under_or.to_string(), "a = 1 OR b = 2 AND c = 3");
    }

    #[test]
    fn display_prints_chains_flat() {
        let chain = (1..=70_i64).fold(field("a").eq(0_i64), |acc, n| acc.and(field("a").eq(n)));
        let text = chain.to_string();
        assert!(!text.contains('('));
        assert_eq!(text.matches(" AND ").count(), 70);
    }
}
