use proptest::prelude::*;
use ruletree::{field, Condition, Record, Value};

// --- Fixed field schema ---
// age    : i64 (0..=120)
// salary : i64 or f64
// dept   : string, one of DEPTS
// active : bool

pub const FIELDS: &[&str] = &["age", "salary", "dept", "active"];
const DEPTS: &[&str] = &["Sales", "sales", "R&D", "it's", "Ops"];

/// Any literal the rule language can spell, including awkward strings.
pub fn arb_literal() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<i64>().prop_map(Value::Int),
        any::<f64>()
            .prop_filter("must be finite", |f| f.is_finite())
            .prop_map(Value::Float),
        any::<bool>().prop_map(Value::Bool),
        "[a-zA-Z0-9 _'\\\\-]{0,10}".prop_map(Value::String),
    ]
}

/// Any value a record might hold, NaN and infinities included.
pub fn arb_record_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<i64>().prop_map(Value::Int),
        any::<f64>().prop_map(Value::Float),
        any::<bool>().prop_map(Value::Bool),
        ".{0,8}".prop_map(Value::String),
    ]
}

fn arb_field_name() -> impl Strategy<Value = &'static str> {
    prop::sample::select(FIELDS)
}

fn compare(name: &str, op: u8, value: Value) -> Condition {
    let f = field(name);
    match op {
        0 => f.eq(value),
        1 => f.neq(value),
        2 => f.gt(value),
        3 => f.gte(value),
        4 => f.lt(value),
        _ => f.lte(value),
    }
}

/// A comparison on a schema field against any literal, typed or not.
fn arb_leaf() -> impl Strategy<Value = Condition> {
    (arb_field_name(), 0_u8..6, arb_literal())
        .prop_map(|(name, op, value)| compare(name, op, value))
}

/// A comparison whose literal matches the schema type of its field.
fn arb_typed_leaf() -> impl Strategy<Value = Condition> {
    prop_oneof![
        (0_u8..6, 0_i64..=120).prop_map(|(op, v)| compare("age", op, Value::Int(v))),
        (0_u8..6, 0.0_f64..200_000.0).prop_map(|(op, v)| compare("salary", op, Value::Float(v))),
        (0_u8..6, prop::sample::select(DEPTS))
            .prop_map(|(op, v)| compare("dept", op, Value::from(v))),
        (0_u8..2, any::<bool>()).prop_map(|(op, v)| compare("active", op, Value::Bool(v))),
    ]
}

fn tree(
    leaf: impl Strategy<Value = Condition> + 'static,
    depth: u32,
) -> impl Strategy<Value = Condition> {
    leaf.prop_recursive(depth, 32, 2, |inner| {
        prop_oneof![
            (inner.clone(), inner.clone()).prop_map(|(a, b)| a.and(b)),
            (inner.clone(), inner).prop_map(|(a, b)| a.or(b)),
        ]
    })
}

/// A condition tree with arbitrary literals, bounded depth.
pub fn arb_condition() -> impl Strategy<Value = Condition> {
    tree(arb_leaf(), 4)
}

/// Rule text for a long chain of comparisons joined by a random mix of AND
/// and OR, with no parentheses; far longer than the recursive strategies
/// reach.
pub fn arb_chain_text() -> impl Strategy<Value = String> {
    (
        arb_leaf(),
        prop::collection::vec((any::<bool>(), arb_leaf()), 60..200),
    )
        .prop_map(|(first, rest)| {
            rest.into_iter()
                .fold(first.to_string(), |mut text, (and, leaf)| {
                    text.push_str(if and { " AND " } else { " OR " });
                    text.push_str(&leaf.to_string());
                    text
                })
        })
}

/// A condition tree that type-checks against [`arb_record`].
pub fn arb_typed_condition() -> impl Strategy<Value = Condition> {
    tree(arb_typed_leaf(), 3)
}

/// A record matching the fixed schema.
pub fn arb_record() -> impl Strategy<Value = Record> {
    (
        0_i64..=120,
        prop_oneof![
            (0_i64..200_000).prop_map(Value::Int),
            (0.0_f64..200_000.0).prop_map(Value::Float),
        ],
        prop::sample::select(DEPTS),
        any::<bool>(),
    )
        .prop_map(|(age, salary, dept, active)| {
            Record::new()
                .set("age", age)
                .set("salary", salary)
                .set("dept", dept)
                .set("active", active)
        })
}

/// A record with any subset of the schema fields holding any value.
pub fn arb_loose_record() -> impl Strategy<Value = Record> {
    prop::collection::vec(
        (arb_field_name(), arb_record_value()),
        0..=FIELDS.len(),
    )
    .prop_map(|pairs| pairs.into_iter().collect())
}
