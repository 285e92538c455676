//! Default error message templates
//!
//! Templates may use `{field}`, `{min}`, `{max}`, `{type}` and `{options}`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Messages {
    pub required: String,
    pub invalid_type: String,
    pub min_number: String,
    pub max_number: String,
    pub min_length: String,
    pub max_length: String,
    pub pattern: String,
    pub one_of: String,
    /// Reported when a rule itself is broken (bad regex, failing predicate)
    pub invalid: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            required: "{field} is required".to_string(),
            invalid_type: "{field} must be a {type}".to_string(),
            min_number: "{field} must be at least {min}".to_string(),
            max_number: "{field} must be at most {max}".to_string(),
            min_length: "{field} must be at least {min} characters".to_string(),
            max_length: "{field} must be at most {max} characters".to_string(),
            pattern: "{field} has an invalid format".to_string(),
            one_of: "{field} must be one of: {options}".to_string(),
            invalid: "{field} is invalid".to_string(),
        }
    }
}

/// Substitute `{name}` placeholders in one pass over the template.
/// Substituted text is never scanned again, so a label containing `{min}`
/// stays as written.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let value = after.find('}').and_then(|close| {
            let name = &after[..close];
            vars.iter()
                .find(|(var, _)| *var == name)
                .map(|(_, value)| (*value, close))
        });
        match value {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Format a bound without a trailing `.0` for whole numbers
pub fn format_bound(bound: f64) -> String {
    if bound.fract() == 0.0 && bound.abs() < 1e15 {
        format!("{}", bound as i64)
    } else {
        bound.to_string()
    }
}
