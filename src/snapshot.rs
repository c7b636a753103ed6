//! Binary export and import of a [`RuleStore`](crate::RuleStore).
//!
//! A snapshot is a 32-byte fixed header followed by a bincode payload.
//!
//! ## Wire Format
//!
//! ```text
//! Offset  Size  Field
//! 0       4     Magic bytes: b"RTRE"
//! 4       2     Format version (u16, little-endian)
//! 6       2     Engine version (u16, little-endian)
//! 8       4     Flags (u32, reserved)
//! 12      4     Payload length in bytes (u32, little-endian)
//! 16      16    BLAKE3 hash of the payload (truncated to 16 bytes)
//! 32..    var   Bincode-encoded payload
//! ```
//!
//! The payload holds the next id to hand out and every stored rule with its
//! source text and condition tree. Left-nested chains of the same connective
//! are stored as one n-ary group and rebuilt left-nested on load, so the
//! restored tree is identical to the stored one.
//!
//! The format version must match exactly. The engine version is informational.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::store::StoreInner;
use crate::{CompareOp, Condition, Rule, RuleId, Value};

const MAGIC: &[u8; 4] = b"RTRE";
const FORMAT_VERSION: u16 = 1;
const ENGINE_VERSION: u16 = 1;
const HEADER_SIZE: usize = 32;

/// Errors that can occur when writing a snapshot.
#[derive(Debug, Error)]
pub enum SerializeError {
    #[error("failed to encode rule store: {0}")]
    Encode(#[from] bincode::error::EncodeError),

    #[error("snapshot payload of {0} bytes exceeds the 4 GiB format limit")]
    TooLarge(usize),

    #[error("I/O error while writing snapshot: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that can occur when reading a snapshot.
#[derive(Debug, Error)]
pub enum DeserializeError {
    #[error("not a ruletree snapshot: invalid magic bytes")]
    BadMagic,

    #[error("incompatible format version: snapshot is v{blob}, engine supports v{supported}")]
    IncompatibleVersion { blob: u16, supported: u16 },

    #[error("integrity check failed: BLAKE3 checksum mismatch")]
    ChecksumMismatch,

    #[error("payload length mismatch: expected {expected} bytes, got {actual}")]
    LengthMismatch { expected: u32, actual: usize },

    #[error("failed to decode payload: {0}")]
    Decode(#[from] bincode::error::DecodeError),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("I/O error while reading snapshot: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredRules {
    next_id: u64,
    rules: Vec<StoredRule>,
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredRule {
    id: u64,
    source: String,
    condition: StoredExpr,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
enum StoredExpr {
    Compare {
        field: String,
        op: StoredOp,
        value: StoredValue,
    },
    And(Vec<StoredExpr>),
    Or(Vec<StoredExpr>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
enum StoredValue {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
enum StoredOp {
    Eq,
    Neq,
    Gt,
    Gte,
    Lt,
    Lte,
}

impl From<CompareOp> for StoredOp {
    fn from(op: CompareOp) -> Self {
        match op {
            CompareOp::Eq => StoredOp::Eq,
            CompareOp::Neq => StoredOp::Neq,
            CompareOp::Gt => StoredOp::Gt,
            CompareOp::Gte => StoredOp::Gte,
            CompareOp::Lt => StoredOp::Lt,
            CompareOp::Lte => StoredOp::Lte,
        }
    }
}

impl From<StoredOp> for CompareOp {
    fn from(op: StoredOp) -> Self {
        match op {
            StoredOp::Eq => CompareOp::Eq,
            StoredOp::Neq => CompareOp::Neq,
            StoredOp::Gt => CompareOp::Gt,
            StoredOp::Gte => CompareOp::Gte,
            StoredOp::Lt => CompareOp::Lt,
            StoredOp::Lte => CompareOp::Lte,
        }
    }
}

impl From<&Value> for StoredValue {
    fn from(value: &Value) -> Self {
        match value {
            Value::Int(v) => StoredValue::Int(*v),
            Value::Float(v) => StoredValue::Float(*v),
            Value::Bool(v) => StoredValue::Bool(*v),
            Value::String(v) => StoredValue::Str(v.clone()),
        }
    }
}

impl From<StoredValue> for Value {
    fn from(value: StoredValue) -> Self {
        match value {
            StoredValue::Int(v) => Value::Int(v),
            StoredValue::Float(v) => Value::Float(v),
            StoredValue::Bool(v) => Value::Bool(v),
            StoredValue::Str(v) => Value::String(v),
        }
    }
}

fn flatten(condition: &Condition) -> StoredExpr {
    match condition {
        Condition::Compare { field, op, value } => StoredExpr::Compare {
            field: field.clone(),
            op: (*op).into(),
            value: value.into(),
        },
        Condition::And(..) => {
            let mut children = Vec::new();
            collect_and(condition, &mut children);
            StoredExpr::And(children)
        }
        Condition::Or(..) => {
            let mut children = Vec::new();
            collect_or(condition, &mut children);
            StoredExpr::Or(children)
        }
    }
}

// Only the left spine is flattened; a right operand of the same connective
// stays its own group.
fn collect_and(condition: &Condition, out: &mut Vec<StoredExpr>) {
    match condition {
        Condition::And(a, b) => {
            collect_and(a, out);
            out.push(flatten(b));
        }
        other => out.push(flatten(other)),
    }
}

fn collect_or(condition: &Condition, out: &mut Vec<StoredExpr>) {
    match condition {
        Condition::Or(a, b) => {
            collect_or(a, out);
            out.push(flatten(b));
        }
        other => out.push(flatten(other)),
    }
}

fn unflatten(expr: StoredExpr) -> Result<Condition, DeserializeError> {
    match expr {
        StoredExpr::Compare { field, op, value } => Ok(Condition::Compare {
            field,
            op: op.into(),
            value: value.into(),
        }),
        StoredExpr::And(children) => fold_group(children, Condition::and),
        StoredExpr::Or(children) => fold_group(children, Condition::or),
    }
}

fn fold_group(
    children: Vec<StoredExpr>,
    join: fn(Condition, Condition) -> Condition,
) -> Result<Condition, DeserializeError> {
    let mut iter = children.into_iter();
    let first = iter
        .next()
        .ok_or_else(|| DeserializeError::Validation("empty And/Or group".to_owned()))?;
    iter.try_fold(unflatten(first)?, |acc, child| {
        Ok(join(acc, unflatten(child)?))
    })
}

fn validate(stored: &StoredRules) -> Result<(), DeserializeError> {
    // The store hands out `next_id` and then increments it.
    if stored.next_id == 0 || stored.next_id == u64::MAX {
        return Err(DeserializeError::Validation(format!(
            "next id {} is out of range",
            stored.next_id
        )));
    }

    let mut seen = std::collections::HashSet::with_capacity(stored.rules.len());
    for rule in &stored.rules {
        if rule.id == 0 {
            return Err(DeserializeError::Validation(
                "rule id 0 is reserved".to_owned(),
            ));
        }
        if rule.id >= stored.next_id {
            return Err(DeserializeError::Validation(format!(
                "rule id {} is not below next id {}",
                rule.id, stored.next_id
            )));
        }
        if !seen.insert(rule.id) {
            return Err(DeserializeError::Validation(format!(
                "rule id {} appears more than once",
                rule.id
            )));
        }
        validate_expr(&rule.condition)?;
    }
    Ok(())
}

fn validate_expr(expr: &StoredExpr) -> Result<(), DeserializeError> {
    match expr {
        StoredExpr::Compare { .. } => Ok(()),
        StoredExpr::And(children) | StoredExpr::Or(children) => {
            if children.is_empty() {
                return Err(DeserializeError::Validation(
                    "empty And/Or group".to_owned(),
                ));
            }
            children.iter().try_for_each(validate_expr)
        }
    }
}

fn write_header(buf: &mut Vec<u8>, payload: &[u8]) -> Result<(), SerializeError> {
    let payload_len =
        u32::try_from(payload.len()).map_err(|_| SerializeError::TooLarge(payload.len()))?;
    let hash = blake3::hash(payload);

    buf.extend_from_slice(MAGIC);
    buf.extend_from_slice(&FORMAT_VERSION.to_le_bytes());
    buf.extend_from_slice(&ENGINE_VERSION.to_le_bytes());
    buf.extend_from_slice(&0u32.to_le_bytes()); // flags
    buf.extend_from_slice(&payload_len.to_le_bytes());
    buf.extend_from_slice(&hash.as_bytes()[..16]);
    Ok(())
}

#[allow(clippy::cast_possible_truncation)] // HEADER_SIZE is 32
fn read_header(bytes: &[u8]) -> Result<(u16, u32, [u8; 16]), DeserializeError> {
    if bytes.len() < HEADER_SIZE {
        return Err(DeserializeError::LengthMismatch {
            expected: HEADER_SIZE as u32,
            actual: bytes.len(),
        });
    }
    if &bytes[0..4] != MAGIC {
        return Err(DeserializeError::BadMagic);
    }

    let format_version = u16::from_le_bytes([bytes[4], bytes[5]]);
    let payload_len = u32::from_le_bytes([bytes[12], bytes[13], bytes[14], bytes[15]]);
    let mut hash = [0u8; 16];
    hash.copy_from_slice(&bytes[16..32]);

    Ok((format_version, payload_len, hash))
}

pub(crate) fn encode(inner: &StoreInner) -> Result<Vec<u8>, SerializeError> {
    let stored = StoredRules {
        next_id: inner.next_id,
        rules: inner
            .rules
            .values()
            .map(|rule| StoredRule {
                id: rule.id.0,
                source: rule.source.clone(),
                condition: flatten(&rule.condition),
            })
            .collect(),
    };
    let payload = bincode::serde::encode_to_vec(&stored, bincode::config::standard())?;

    let mut buf = Vec::with_capacity(HEADER_SIZE + payload.len());
    write_header(&mut buf, &payload)?;
    buf.extend_from_slice(&payload);
    Ok(buf)
}

pub(crate) fn decode(bytes: &[u8]) -> Result<StoreInner, DeserializeError> {
    let (format_version, payload_len, stored_hash) = read_header(bytes)?;
    if format_version != FORMAT_VERSION {
        return Err(DeserializeError::IncompatibleVersion {
            blob: format_version,
            supported: FORMAT_VERSION,
        });
    }

    let payload = &bytes[HEADER_SIZE..];
    if payload.len() != payload_len as usize {
        return Err(DeserializeError::LengthMismatch {
            expected: payload_len,
            actual: payload.len(),
        });
    }
    if blake3::hash(payload).as_bytes()[..16] != stored_hash {
        return Err(DeserializeError::ChecksumMismatch);
    }

    let (stored, _): (StoredRules, usize) =
        bincode::serde::decode_from_slice(payload, bincode::config::standard())?;
    validate(&stored)?;

    let mut rules = BTreeMap::new();
    for rule in stored.rules {
        let id = RuleId(rule.id);
        let condition = unflatten(rule.condition)?;
        rules.insert(
            id,
            Arc::new(Rule {
                id,
                condition,
                source: rule.source,
            }),
        );
    }

    Ok(StoreInner {
        rules,
        next_id: stored.next_id,
    })
}
