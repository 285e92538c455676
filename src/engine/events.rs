//! UI-boundary event adapters
//!
//! The engine itself only knows `set(path, value)`. These types let input
//! widgets hand over either a raw value or a native-input-shaped event.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Target of a native input event
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputTarget {
    pub value: String,
    /// Set for checkbox-like inputs; wins over `value`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checked: Option<bool>,
}

/// Native input change event
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputEvent {
    pub target: InputTarget,
}

impl InputEvent {
    pub fn text(value: impl Into<String>) -> Self {
        Self {
            target: InputTarget {
                value: value.into(),
                checked: None,
            },
        }
    }

    pub fn checkbox(checked: bool) -> Self {
        Self {
            target: InputTarget {
                value: String::new(),
                checked: Some(checked),
            },
        }
    }
}

/// Either a raw value from a custom widget or a native input event
#[derive(Debug, Clone, PartialEq)]
pub enum ChangeEvent {
    Value(Value),
    Input(InputEvent),
}

impl ChangeEvent {
    /// The value the event carries
    pub fn into_value(self) -> Value {
        match self {
            ChangeEvent::Value(value) => value,
            ChangeEvent::Input(InputEvent {
                target: InputTarget {
                    checked: Some(checked),
                    ..
                },
            }) => Value::Bool(checked),
            ChangeEvent::Input(event) => Value::String(event.target.value),
        }
    }
}

impl From<Value> for ChangeEvent {
    fn from(value: Value) -> Self {
        ChangeEvent::Value(value)
    }
}

impl From<InputEvent> for ChangeEvent {
    fn from(event: InputEvent) -> Self {
        ChangeEvent::Input(event)
    }
}

impl From<&str> for ChangeEvent {
    fn from(value: &str) -> Self {
        ChangeEvent::Value(Value::String(value.to_string()))
    }
}

impl From<String> for ChangeEvent {
    fn from(value: String) -> Self {
        ChangeEvent::Value(Value::String(value))
    }
}

impl From<bool> for ChangeEvent {
    fn from(value: bool) -> Self {
        ChangeEvent::Value(Value::Bool(value))
    }
}

impl From<i64> for ChangeEvent {
    fn from(value: i64) -> Self {
        ChangeEvent::Value(Value::from(value))
    }
}

/// Form submission event. Submitting always suppresses the default action
/// so pressing submit never navigates away.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmitEvent {
    default_prevented: bool,
}

impl SubmitEvent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }
}
