use std::sync::Arc;

use tracing::{debug, instrument};

use crate::parse::parse_with_limits;
use crate::{Condition, EngineConfig, Error, Record, Rule, RuleId, RuleStore};

/// Text-in, verdict-out service over a [`RuleStore`].
///
/// `RuleEngine` is `Send + Sync`; share it behind an `Arc` to serve several
/// threads.
///
/// # Example
///
/// ```
/// use ruletree::{Record, RuleEngine};
///
/// let engine = RuleEngine::new();
/// let adults = engine.create_rule("(age >= 18)").unwrap();
/// let sales = engine.create_rule("department = 'Sales'").unwrap();
/// let both = engine.combine_rules(&[adults, sales]).unwrap();
///
/// let record = Record::new().set("age", 30_i64).set("department", "Sales");
/// assert!(engine.evaluate_rule(both, &record).unwrap());
/// ```
#[derive(Debug, Default)]
pub struct RuleEngine {
    store: RuleStore,
    config: EngineConfig,
}

impl RuleEngine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            store: RuleStore::new(),
            config,
        }
    }

    /// Wrap an existing store, e.g. one restored from a snapshot.
    #[must_use]
    pub fn from_store(store: RuleStore, config: EngineConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn store(&self) -> &RuleStore {
        &self.store
    }

    /// Parse `rule_text` and store it under a fresh id.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidInput`] if the text exceeds
    /// [`EngineConfig::max_rule_length`], [`Error::Lex`] or [`Error::Parse`]
    /// if it is not a valid rule. No id is consumed on failure.
    #[instrument(level = "debug", skip(self, rule_text), fields(len = rule_text.len()))]
    pub fn create_rule(&self, rule_text: &str) -> Result<RuleId, Error> {
        let condition = self.parse(rule_text)?;
        Ok(self.store.create(condition, rule_text))
    }

    /// AND the given rules together, in order, into a new rule.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidInput`] for an empty list, one longer than
    /// [`EngineConfig::max_combine_rules`], or a result deeper than the
    /// configured limits; [`Error::NotFound`] for the first unknown id.
    #[instrument(level = "debug", skip(self))]
    pub fn combine_rules(&self, ids: &[RuleId]) -> Result<RuleId, Error> {
        if ids.len() > self.config.max_combine_rules {
            return Err(Error::invalid_input(format!(
                "{} rules exceeds the combine limit of {}",
                ids.len(),
                self.config.max_combine_rules
            )));
        }
        self.store.combine_within(ids, &self.config)
    }

    /// Evaluate a stored rule against `record`.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] for an unknown id, [`Error::Evaluation`] when the
    /// record is missing a referenced field or holds a value of the wrong
    /// kind.
    #[instrument(level = "debug", skip(self, record))]
    pub fn evaluate_rule(&self, id: RuleId, record: &Record) -> Result<bool, Error> {
        let rule = self.store.get(id)?;
        rule.condition.evaluate(record).map_err(|err| {
            debug!(error = %err, "evaluation failed");
            Error::from(err)
        })
    }

    /// Replace the rule behind `id` with `new_rule_text`, keeping the id.
    ///
    /// The text is parsed first; if it is invalid the stored rule is left as
    /// it was.
    ///
    /// # Errors
    ///
    /// As [`create_rule`](Self::create_rule), plus [`Error::NotFound`] for an
    /// unknown id.
    #[instrument(level = "debug", skip(self, new_rule_text), fields(len = new_rule_text.len()))]
    pub fn modify_rule(&self, id: RuleId, new_rule_text: &str) -> Result<(), Error> {
        let condition = self.parse(new_rule_text)?;
        self.store.replace(id, condition, new_rule_text)
    }

    /// Fetch a stored rule.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] for an unknown id.
    pub fn get_rule(&self, id: RuleId) -> Result<Arc<Rule>, Error> {
        self.store.get(id)
    }

    fn parse(&self, rule_text: &str) -> Result<Condition, Error> {
        if rule_text.len() > self.config.max_rule_length {
            return Err(Error::invalid_input(format!(
                "rule text is {} bytes, limit is {}",
                rule_text.len(),
                self.config.max_rule_length
            )));
        }
        parse_with_limits(
            rule_text,
            self.config.max_nesting_depth,
            self.config.max_tree_depth,
        )
    }
}
