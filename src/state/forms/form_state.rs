//! Form state and field error collections

use super::field::FieldPath;
use super::values;
use crate::error::FormError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Mapping from field path to a human-readable error message.
///
/// Only failing paths have an entry, and every message is non-empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error for `path`. Empty messages are ignored; the first
    /// message recorded for a path wins.
    pub fn insert(&mut self, path: impl Into<String>, message: impl Into<String>) {
        let message = message.into();
        if message.is_empty() {
            return;
        }
        self.0.entry(path.into()).or_insert(message);
    }

    pub fn get(&self, path: &str) -> Option<&str> {
        self.0.get(path).map(String::as_str)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.0.contains_key(path)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

impl<'a> IntoIterator for &'a FieldErrors {
    type Item = (&'a String, &'a String);
    type IntoIter = std::collections::btree_map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// In-memory state of one mounted form.
///
/// `values` starts out sharing its allocation with `initial_values`; the
/// first write clones it, so the initial snapshot is never touched.
#[derive(Debug, Clone)]
pub struct FormState {
    values: Arc<Value>,
    initial_values: Arc<Value>,
    pub errors: FieldErrors,
    pub is_submitting: bool,
    pub submit_count: u32,
}

impl FormState {
    pub fn new(initial_values: Value) -> Self {
        let initial_values = Arc::new(initial_values);
        Self {
            values: Arc::clone(&initial_values),
            initial_values,
            errors: FieldErrors::new(),
            is_submitting: false,
            submit_count: 0,
        }
    }

    pub fn values(&self) -> &Value {
        &self.values
    }

    pub fn initial_values(&self) -> &Value {
        &self.initial_values
    }

    /// Cheap shared handle to the current values
    pub fn values_snapshot(&self) -> Arc<Value> {
        Arc::clone(&self.values)
    }

    /// Value at `path`, if present
    pub fn field_value(&self, path: &str) -> Option<&Value> {
        let path = FieldPath::parse(path).ok()?;
        values::get(&self.values, &path)
    }

    /// Set a single field, preserving every other path
    pub fn set_field(&mut self, path: &FieldPath, value: Value) -> Result<(), FormError> {
        values::set(Arc::make_mut(&mut self.values), path, value)
    }

    /// Remove a single field (or list element)
    pub fn remove_field(&mut self, path: &FieldPath) -> Option<Value> {
        values::get(&self.values, path)?;
        values::remove(Arc::make_mut(&mut self.values), path)
    }

    /// Replace the whole value tree
    pub fn replace_values(&mut self, next: Value) {
        self.values = Arc::new(next);
    }

    /// Restore the initial snapshot, or install `next` as the new initial
    /// snapshot. Clears errors and the submit count.
    pub fn reset(&mut self, next: Option<Value>) {
        if let Some(next) = next {
            self.initial_values = Arc::new(next);
        }
        self.values = Arc::clone(&self.initial_values);
        self.errors.clear();
        self.submit_count = 0;
    }

    /// Whether the values differ structurally from the initial snapshot
    pub fn is_dirty(&self) -> bool {
        !Arc::ptr_eq(&self.values, &self.initial_values) && self.values != self.initial_values
    }
}

impl Default for FormState {
    fn default() -> Self {
        Self::new(Value::Object(Default::default()))
    }
}
