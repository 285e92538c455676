//! Conditional rules: "when field X has value V, the rule becomes R"

use super::rule::{is_blank, RuleOverride};
use crate::state::{values, FieldPath};
use crate::error::FormError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Test applied to another field's current value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    /// Value equals the given one (a missing field counts as `null`)
    Equals(Value),
    /// Value is any of the given ones
    OneOf(Vec<Value>),
    /// Missing, `null`, blank string or empty list
    Empty,
    NotEmpty,
}

impl Condition {
    pub fn matches(&self, value: Option<&Value>) -> bool {
        let value_or_null = value.unwrap_or(&Value::Null);
        match self {
            Condition::Equals(expected) => value_or_null == expected,
            Condition::OneOf(options) => options.contains(value_or_null),
            Condition::Empty => is_blank(value),
            Condition::NotEmpty => !is_blank(value),
        }
    }
}

/// A rule override that applies depending on another field's value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct When {
    /// Path of the field the condition reads
    pub field: String,
    pub is: Condition,
    #[serde(default)]
    pub then: RuleOverride,
    #[serde(default)]
    pub otherwise: RuleOverride,
}

impl When {
    pub fn new(field: impl Into<String>, is: Condition) -> Self {
        Self {
            field: field.into(),
            is,
            then: RuleOverride::default(),
            otherwise: RuleOverride::default(),
        }
    }

    pub fn then(mut self, rule: RuleOverride) -> Self {
        self.then = rule;
        self
    }

    pub fn otherwise(mut self, rule: RuleOverride) -> Self {
        self.otherwise = rule;
        self
    }

    /// Pick the branch for the current values
    pub fn branch(&self, values: &Value) -> Result<&RuleOverride, FormError> {
        let path = FieldPath::parse(&self.field)?;
        if self.is.matches(values::get(values, &path)) {
            Ok(&self.then)
        } else {
            Ok(&self.otherwise)
        }
    }
}
