//! Limits applied by a [`RuleEngine`](crate::RuleEngine).
//!
//! A hosting service can embed [`EngineConfig`] in its own configuration file
//! (with the `serde` feature); every field falls back to its default.
//!
//! ```
//! use ruletree::EngineConfig;
//!
//! let config = EngineConfig::default()
//!     .with_max_rule_length(1024)
//!     .with_max_nesting_depth(16);
//! assert_eq!(config.max_combine_rules, 256);
//! ```

pub(crate) const DEFAULT_MAX_RULE_LENGTH: usize = 4096;
pub(crate) const DEFAULT_MAX_NESTING_DEPTH: usize = 64;
pub(crate) const DEFAULT_MAX_TREE_DEPTH: usize = 512;
pub(crate) const DEFAULT_MAX_COMBINE_RULES: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EngineConfig {
    /// Longest accepted rule text, in bytes.
    pub max_rule_length: usize,
    /// Deepest accepted parenthesis nesting.
    pub max_nesting_depth: usize,
    /// Deepest accepted condition tree, counted as in
    /// [`Condition::depth`](crate::Condition::depth). Long AND/OR chains
    /// count one level per operator.
    pub max_tree_depth: usize,
    /// Most ids accepted by a single combine.
    pub max_combine_rules: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_rule_length: DEFAULT_MAX_RULE_LENGTH,
            max_nesting_depth: DEFAULT_MAX_NESTING_DEPTH,
            max_tree_depth: DEFAULT_MAX_TREE_DEPTH,
            max_combine_rules: DEFAULT_MAX_COMBINE_RULES,
        }
    }
}

impl EngineConfig {
    #[must_use]
    pub fn with_max_rule_length(mut self, bytes: usize) -> Self {
        self.max_rule_length = bytes;
        self
    }

    #[must_use]
    pub fn with_max_nesting_depth(mut self, depth: usize) -> Self {
        self.max_nesting_depth = depth;
        self
    }

    #[must_use]
    pub fn with_max_tree_depth(mut self, depth: usize) -> Self {
        self.max_tree_depth = depth;
        self
    }

    #[must_use]
    pub fn with_max_combine_rules(mut self, count: usize) -> Self {
        self.max_combine_rules = count;
        self
    }
}
