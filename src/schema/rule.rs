//! Per-field rule descriptors

use super::condition::When;
use super::predicate::FieldPredicate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Expected shape of a field value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    String,
    Number,
    Boolean,
    Object,
    Array,
}

impl ValueKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Object => "object",
            Self::Array => "array",
        }
    }

    /// Number fields also accept numeric strings, since text inputs
    /// produce strings.
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Number => as_number(value).is_some(),
            Self::Boolean => value.is_boolean(),
            Self::Object => value.is_object(),
            Self::Array => value.is_array(),
        }
    }
}

/// Numeric reading of a value, parsing strings
pub fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    }
}

/// Missing, `null`, whitespace-only string, or empty list
pub fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        Some(_) => false,
    }
}

/// Validation rule for one field path
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FieldRule {
    /// Human label used in default messages; the path is used otherwise
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub required: bool,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<ValueKind>,
    /// Numeric lower bound, or minimum length for strings and lists
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    /// Numeric upper bound, or maximum length for strings and lists
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    /// Regular expression a string value must match
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub one_of: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub when: Vec<When>,
    /// Replaces every default message for this field
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip)]
    pub predicates: Vec<Arc<dyn FieldPredicate>>,
}

impl FieldRule {
    pub fn any() -> Self {
        Self::default()
    }

    pub fn of_kind(kind: ValueKind) -> Self {
        Self {
            kind: Some(kind),
            ..Self::default()
        }
    }

    pub fn string() -> Self {
        Self::of_kind(ValueKind::String)
    }

    pub fn number() -> Self {
        Self::of_kind(ValueKind::Number)
    }

    pub fn boolean() -> Self {
        Self::of_kind(ValueKind::Boolean)
    }

    pub fn object() -> Self {
        Self::of_kind(ValueKind::Object)
    }

    pub fn array() -> Self {
        Self::of_kind(ValueKind::Array)
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    pub fn max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    pub fn one_of<I, V>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.one_of = Some(options.into_iter().map(Into::into).collect());
        self
    }

    pub fn when(mut self, when: When) -> Self {
        self.when.push(when);
        self
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Attach a custom (possibly async) check
    pub fn test(mut self, predicate: Arc<dyn FieldPredicate>) -> Self {
        self.predicates.push(predicate);
        self
    }

    /// Apply a conditional override, returning the resulting rule
    pub fn with_override(&self, over: &RuleOverride) -> Self {
        let mut rule = self.clone();
        if let Some(required) = over.required {
            rule.required = required;
        }
        if over.kind.is_some() {
            rule.kind = over.kind;
        }
        if over.min.is_some() {
            rule.min = over.min;
        }
        if over.max.is_some() {
            rule.max = over.max;
        }
        if over.pattern.is_some() {
            rule.pattern = over.pattern.clone();
        }
        if over.one_of.is_some() {
            rule.one_of = over.one_of.clone();
        }
        if over.message.is_some() {
            rule.message = over.message.clone();
        }
        rule
    }
}

impl fmt::Debug for FieldRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldRule")
            .field("label", &self.label)
            .field("required", &self.required)
            .field("kind", &self.kind)
            .field("min", &self.min)
            .field("max", &self.max)
            .field("pattern", &self.pattern)
            .field("one_of", &self.one_of)
            .field("when", &self.when)
            .field("message", &self.message)
            .field("predicates", &self.predicates.len())
            .finish()
    }
}

/// Partial rule applied by a [`When`] branch. Unset fields keep the base
/// rule's setting.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RuleOverride {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<ValueKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub one_of: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl RuleOverride {
    pub fn required(required: bool) -> Self {
        Self {
            required: Some(required),
            ..Self::default()
        }
    }
}
