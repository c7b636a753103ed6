use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, info, instrument, warn};

use crate::{Condition, EngineConfig, Error, Rule, RuleId};

/// Thread-safe map from [`RuleId`] to stored [`Rule`]s.
///
/// All writes (create, replace, combine) go through one write lock, so a
/// reader never sees a half-written rule. Readers get an `Arc<Rule>` that
/// stays valid after later writes replace the entry.
///
/// # Example
///
/// ```
/// use ruletree::{parse::parse, Record, RuleStore};
///
/// let store = RuleStore::new();
/// let id = store.create(parse("age > 20").unwrap(), "age > 20");
/// let rule = store.get(id).unwrap();
/// assert_eq!(rule.condition.evaluate(&Record::new().set("age", 30_i64)), Ok(true));
/// ```
#[derive(Debug)]
pub struct RuleStore {
    inner: RwLock<StoreInner>,
}

#[derive(Debug)]
pub(crate) struct StoreInner {
    pub(crate) rules: BTreeMap<RuleId, Arc<Rule>>,
    pub(crate) next_id: u64,
}

impl Default for RuleStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleStore {
    /// Create an empty store. The first id handed out is 1.
    #[must_use]
    pub fn new() -> Self {
        Self::from_inner(StoreInner {
            rules: BTreeMap::new(),
            next_id: 1,
        })
    }

    pub(crate) fn from_inner(inner: StoreInner) -> Self {
        Self {
            inner: RwLock::new(inner),
        }
    }

    /// Store a parsed rule under the next free id.
    pub fn create(&self, condition: Condition, source: impl Into<String>) -> RuleId {
        let mut inner = self.inner.write();
        let id = inner.insert(condition, source.into());
        debug!(rule_id = %id, "rule created");
        id
    }

    /// Look up a rule.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no rule has this id.
    pub fn get(&self, id: RuleId) -> Result<Arc<Rule>, Error> {
        self.inner.read().rules.get(&id).cloned().ok_or_else(|| {
            warn!(rule_id = %id, "rule not found");
            Error::NotFound { id }
        })
    }

    /// Overwrite a rule's condition and source, keeping its id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no rule has this id; nothing is written.
    #[instrument(skip(self, condition, source))]
    pub fn replace(
        &self,
        id: RuleId,
        condition: Condition,
        source: impl Into<String>,
    ) -> Result<(), Error> {
        let mut inner = self.inner.write();
        let Some(slot) = inner.rules.get_mut(&id) else {
            warn!("replace of unknown rule");
            return Err(Error::NotFound { id });
        };
        *slot = Arc::new(Rule {
            id,
            condition,
            source: source.into(),
        });
        info!("rule replaced");
        Ok(())
    }

    /// AND together the rules behind `ids`, in order, and store the result
    /// under a fresh id, using the default [`EngineConfig`] limits.
    ///
    /// # Errors
    ///
    /// As [`combine_within`](Self::combine_within).
    pub fn combine(&self, ids: &[RuleId]) -> Result<RuleId, Error> {
        self.combine_within(ids, &EngineConfig::default())
    }

    /// Like [`combine`](Self::combine), bounded by `config`'s nesting and tree
    /// depth limits so the combined source always parses back.
    ///
    /// Resolution and insertion happen under one write lock. On any failure
    /// nothing is stored and no id is consumed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for an empty list or a result past the
    /// limits, and [`Error::NotFound`] for the first id that does not resolve.
    #[instrument(skip(self, config), fields(parts = ids.len()))]
    pub fn combine_within(&self, ids: &[RuleId], config: &EngineConfig) -> Result<RuleId, Error> {
        let mut inner = self.inner.write();

        let resolved = ids
            .iter()
            .map(|id| {
                inner.rules.get(id).cloned().ok_or_else(|| {
                    warn!(rule_id = %id, "combine references unknown rule");
                    Error::NotFound { id: *id }
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let (condition, source) = crate::combine::combine(&resolved, config)?;
        let id = inner.insert(condition, source);
        info!(rule_id = %id, "rules combined");
        Ok(id)
    }

    /// Number of stored rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.read().rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.read().rules.is_empty()
    }

    /// Stored ids in ascending order.
    #[must_use]
    pub fn ids(&self) -> Vec<RuleId> {
        self.inner.read().rules.keys().copied().collect()
    }

    /// The id the next create or combine will receive.
    #[must_use]
    pub fn next_id(&self) -> RuleId {
        RuleId(self.inner.read().next_id)
    }

}

#[cfg(feature = "snapshot")]
impl RuleStore {
    /// Encode every stored rule and the id counter into a snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`SerializeError`](crate::SerializeError) if encoding fails.
    pub fn to_bytes(&self) -> Result<Vec<u8>, crate::SerializeError> {
        let inner = self.inner.read();
        let bytes = crate::snapshot::encode(&inner)?;
        debug!(rules = inner.rules.len(), bytes = bytes.len(), "store snapshot written");
        Ok(bytes)
    }

    /// Rebuild a store from [`to_bytes`](Self::to_bytes) output. Ids keep
    /// counting from where the snapshotted store left off.
    ///
    /// # Errors
    ///
    /// Returns [`DeserializeError`](crate::DeserializeError) on a bad header,
    /// checksum, payload or failed validation.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, crate::DeserializeError> {
        let inner = crate::snapshot::decode(bytes)?;
        info!(rules = inner.rules.len(), next_id = inner.next_id, "store restored from snapshot");
        Ok(Self::from_inner(inner))
    }

    /// Write a snapshot to a file.
    ///
    /// # Errors
    ///
    /// Returns [`SerializeError`](crate::SerializeError) on encoding or I/O
    /// failure.
    pub fn to_file(&self, path: impl AsRef<std::path::Path>) -> Result<(), crate::SerializeError> {
        std::fs::write(path, self.to_bytes()?)?;
        Ok(())
    }

    /// Read a store back from a snapshot file.
    ///
    /// # Errors
    ///
    /// Returns [`DeserializeError`](crate::DeserializeError) on I/O, format,
    /// integrity or validation failure.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, crate::DeserializeError> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(&bytes)
    }
}

impl StoreInner {
    fn insert(&mut self, condition: Condition, source: String) -> RuleId {
        let id = RuleId(self.next_id);
        self.next_id += 1;
        self.rules.insert(
            id,
            Arc::new(Rule {
                id,
                condition,
                source,
            }),
        );
        id
    }
}

impl fmt::Display for RuleStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.read();
        write!(
            f,
            "RuleStore({} rules, next id {})",
            inner.rules.len(),
            inner.next_id
        )
    }
}
