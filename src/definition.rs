//! Server-described form definitions
//!
//! A definition bundles the initial values and schema of a form, plus an
//! optional list of edits to apply before submitting. It is what the CLI
//! reads, and what a console receives when a resource type describes its
//! own fields.

use crate::error::FormError;
use crate::schema::Schema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::Path;

/// One pending field edit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldChange {
    pub path: String,
    pub value: Value,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FormDefinition {
    pub initial_values: Value,
    pub schema: Schema,
    pub changes: Vec<FieldChange>,
}

impl FormDefinition {
    pub fn from_json(json: &str) -> Result<Self, FormError> {
        let mut definition: FormDefinition =
            serde_json::from_str(json).map_err(|e| FormError::InvalidDefinition(e.to_string()))?;
        if definition.initial_values.is_null() {
            definition.initial_values = Value::Object(Default::default());
        }
        Ok(definition)
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(Self::from_json(&content)?)
    }
}
