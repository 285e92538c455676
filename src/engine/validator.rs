//! Schema evaluation
//!
//! Every path named by the schema is checked independently against one
//! snapshot of the values. A rule that cannot be evaluated (bad path, bad
//! regex, predicate error or panic) produces the generic `invalid` message
//! for its own path and the pass carries on.

use super::panic_message;
use crate::schema::{
    as_number, format_bound, is_blank, render, FieldRule, Messages, Schema, ValidationContext,
    ValueKind,
};
use crate::state::{values, FieldErrors, FieldPath};
use futures::FutureExt;
use serde_json::Value;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use thiserror::Error;

/// A rule that could not be evaluated
#[derive(Debug, Error)]
enum RuleError {
    #[error(transparent)]
    Path(#[from] crate::error::FormError),
    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),
    #[error("predicate failed: {0:#}")]
    Predicate(anyhow::Error),
    #[error("predicate panicked: {0}")]
    Panicked(String),
}

/// Validate `values` against `schema`, returning only failing paths
pub async fn validate(schema: &Schema, values: Arc<Value>, messages: &Messages) -> FieldErrors {
    let mut errors = FieldErrors::new();

    for (path, rule) in schema.iter() {
        let label = rule.label.as_deref().unwrap_or(path);
        match check_field(schema, path, rule, &values, messages, label).await {
            Ok(None) => {}
            Ok(Some(message)) => errors.insert(path, non_empty(message, messages, label)),
            Err(err) => {
                tracing::warn!(path, error = %err, "validation rule failed to evaluate");
                errors.insert(path, non_empty(String::new(), messages, label));
            }
        }
    }

    tracing::debug!(
        fields = schema.len(),
        failed = errors.len(),
        "validation pass finished"
    );
    errors
}

/// A failing field always gets a message, even when the configured one is
/// blank; an empty error map would let the submit through.
fn non_empty(message: String, messages: &Messages, label: &str) -> String {
    if !message.trim().is_empty() {
        return message;
    }
    let generic = render(&messages.invalid, &[("field", label)]);
    if !generic.trim().is_empty() {
        return generic;
    }
    render(&Messages::default().invalid, &[("field", label)])
}

/// Returns the failure message for one field, if any
async fn check_field(
    schema: &Schema,
    path: &str,
    rule: &FieldRule,
    values: &Arc<Value>,
    messages: &Messages,
    label: &str,
) -> Result<Option<String>, RuleError> {
    let field_path = FieldPath::parse(path)?;

    // Conditions read the current values on every pass
    let mut effective = rule.clone();
    for when in &rule.when {
        let branch = when.branch(values)?;
        effective = effective.with_override(branch);
    }

    let value = values::get(values, &field_path);
    let fail = |template: &str, vars: &[(&str, &str)]| -> Option<String> {
        let message = match &effective.message {
            Some(custom) => custom.clone(),
            None => {
                let mut all = vec![("field", label)];
                all.extend_from_slice(vars);
                render(template, &all)
            }
        };
        Some(message)
    };

    if is_blank(value) {
        if effective.required {
            return Ok(fail(messages.required.as_str(), &[]));
        }
    } else if let Some(value) = value {
        if let Some(message) = check_present(schema, &effective, value, messages, &fail)? {
            return Ok(Some(message));
        }
    }

    if !effective.predicates.is_empty() {
        let ctx = ValidationContext {
            path: path.to_string(),
            values: Arc::clone(values),
        };
        for predicate in &effective.predicates {
            let passed = AssertUnwindSafe(predicate.check(value, &ctx))
                .catch_unwind()
                .await
                .map_err(|payload| RuleError::Panicked(panic_message(&*payload)))?
                .map_err(RuleError::Predicate)?;
            if !passed {
                return Ok(Some(
                    effective
                        .message
                        .clone()
                        .unwrap_or_else(|| predicate.message().to_string()),
                ));
            }
        }
    }

    Ok(None)
}

/// Type, bounds, pattern and enumeration checks for a non-blank value
fn check_present<F>(
    schema: &Schema,
    rule: &FieldRule,
    value: &Value,
    messages: &Messages,
    fail: &F,
) -> Result<Option<String>, RuleError>
where
    F: Fn(&str, &[(&str, &str)]) -> Option<String>,
{
    if let Some(kind) = rule.kind {
        if !kind.accepts(value) {
            return Ok(fail(messages.invalid_type.as_str(), &[("type", kind.label())]));
        }
    }

    if let Some(message) = check_bounds(rule, value, messages, fail) {
        return Ok(Some(message));
    }

    if let Some(pattern) = &rule.pattern {
        if let Value::String(text) = value {
            let re = schema.pattern(pattern)?;
            if !re.is_match(text) {
                return Ok(fail(messages.pattern.as_str(), &[]));
            }
        }
    }

    if let Some(options) = &rule.one_of {
        let matches = options
            .iter()
            .any(|option| option == value || loosely_equal(option, value));
        if !matches {
            let listed = options
                .iter()
                .map(|o| match o {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect::<Vec<_>>()
                .join(", ");
            return Ok(fail(messages.one_of.as_str(), &[("options", listed.as_str())]));
        }
    }

    Ok(None)
}

/// Numeric bounds for numbers, length bounds for strings and lists
fn check_bounds<F>(rule: &FieldRule, value: &Value, messages: &Messages, fail: &F) -> Option<String>
where
    F: Fn(&str, &[(&str, &str)]) -> Option<String>,
{
    if rule.min.is_none() && rule.max.is_none() {
        return None;
    }

    let numeric = rule.kind == Some(ValueKind::Number) || value.is_number();
    let (measured, min_template, max_template) = if numeric {
        (
            as_number(value)?,
            messages.min_number.as_str(),
            messages.max_number.as_str(),
        )
    } else {
        let len = match value {
            Value::String(s) => s.chars().count(),
            Value::Array(items) => items.len(),
            _ => return None,
        };
        (
            len as f64,
            messages.min_length.as_str(),
            messages.max_length.as_str(),
        )
    };

    if let Some(min) = rule.min {
        if measured < min {
            let bound = format_bound(min);
            return fail(min_template, &[("min", bound.as_str())]);
        }
    }
    if let Some(max) = rule.max {
        if measured > max {
            let bound = format_bound(max);
            return fail(max_template, &[("max", bound.as_str())]);
        }
    }
    None
}

/// `"80"` matches an option of `80`, since inputs produce strings
fn loosely_equal(option: &Value, value: &Value) -> bool {
    match (option, value) {
        (Value::Number(_), Value::String(_)) => {
            as_number(option).is_some() && as_number(option) == as_number(value)
        }
        _ => false,
    }
}
