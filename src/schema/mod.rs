//! Declarative validation schemas
//!
//! A [`Schema`] maps field paths to [`FieldRule`]s. Schemas are plain data
//! and can be loaded from JSON, so forms described by a server can be
//! validated the same way as hand-built ones; custom predicates are the
//! only part that has to be attached in code.

mod condition;
mod messages;
mod pattern;
mod predicate;
mod rule;

pub use condition::{Condition, When};
pub use messages::{format_bound, render, Messages};
pub use pattern::PatternCache;
pub use predicate::{async_predicate_fn, predicate_fn, FieldPredicate, ValidationContext};
pub use rule::{as_number, is_blank, FieldRule, RuleOverride, ValueKind};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schema {
    fields: BTreeMap<String, FieldRule>,
    #[serde(skip)]
    patterns: PatternCache,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn field(mut self, path: impl Into<String>, rule: FieldRule) -> Self {
        self.insert(path, rule);
        self
    }

    /// Add or replace the rule for `path`
    pub fn insert(&mut self, path: impl Into<String>, rule: FieldRule) {
        self.fields.insert(path.into(), rule);
    }

    pub fn get(&self, path: &str) -> Option<&FieldRule> {
        self.fields.get(path)
    }

    pub fn get_mut(&mut self, path: &str) -> Option<&mut FieldRule> {
        self.fields.get_mut(path)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldRule)> {
        self.fields.iter().map(|(path, rule)| (path.as_str(), rule))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Compiled regex for a `pattern` rule, compiled once per schema
    pub fn pattern(&self, pattern: &str) -> Result<regex::Regex, regex::Error> {
        self.patterns.get_or_compile(pattern)
    }

    /// Number of distinct patterns compiled so far
    pub fn compiled_patterns(&self) -> usize {
        self.patterns.len()
    }
}
