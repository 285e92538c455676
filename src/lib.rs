//! Form Engine - form state, validation and submission for management consoles
//!
//! One [`FormEngine`] per mounted form owns the value tree, validates it
//! against a declarative [`Schema`] and hands valid values to a
//! [`SubmitHandler`]. A [`Wizard`] sequences several forms behind steps.

pub mod config;
pub mod definition;
pub mod engine;
pub mod error;
pub mod schema;
pub mod state;

pub use config::EngineConfig;
pub use definition::{FieldChange, FormDefinition};
pub use engine::{
    submit_fn, ChangeEvent, ChangeHandler, FormEngine, FormOptions, InputEvent, SubmitEvent,
    SubmitHandler, SubmitOutcome,
};
pub use error::{FormError, SubmitError, WizardError};
pub use schema::{Condition, FieldRule, Messages, RuleOverride, Schema, ValueKind, When};
pub use state::{FieldErrors, FieldPath, FormState, Wizard};

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};

    /// Two-step "create database" flow: each step is its own form, and the
    /// wizard only moves when the step's submit succeeds.
    #[tokio::test]
    async fn test_wizard_flow_over_two_forms() {
        let submitted: Arc<Mutex<Vec<Value>>> = Arc::default();
        let record = |sink: Arc<Mutex<Vec<Value>>>| {
            submit_fn(move |values| {
                let sink = Arc::clone(&sink);
                async move {
                    sink.lock().unwrap().push(values.clone());
                    Ok(values)
                }
            })
        };

        let general = FormEngine::new(FormOptions::new(
            json!({"name": "", "type": "postgresql"}),
            Schema::new()
                .field("name", FieldRule::string().required().pattern("^[a-z][a-z0-9-]*$"))
                .field("type", FieldRule::string().one_of(["postgresql", "mysql", "redis"])),
            record(Arc::clone(&submitted)),
        ));
        let resources = FormEngine::new(FormOptions::new(
            json!({"cpu": 250, "memory": 256}),
            Schema::new()
                .field("cpu", FieldRule::number().min(250.0))
                .field("memory", FieldRule::number().min(100.0)),
            record(Arc::clone(&submitted)),
        ));
        let mut wizard = Wizard::new(["General", "Resources", "Review"]);

        let outcome = general.submit(None).await.unwrap();
        assert!(!wizard.advance_with(&outcome));
        assert_eq!(wizard.jump_step(1), Err(WizardError::Unreachable(1)));

        general.set("name", "orders-db").unwrap();
        let outcome = general.submit(None).await.unwrap();
        assert!(wizard.advance_with(&outcome));
        assert_eq!(wizard.current_label(), Some("Resources"));

        resources.set("cpu", "500").unwrap();
        let outcome = resources.submit(None).await.unwrap();
        assert!(wizard.advance_with(&outcome));
        assert_eq!(wizard.current_label(), Some("Review"));

        assert_eq!(wizard.jump_step(0), Ok(0));
        assert_eq!(
            *submitted.lock().unwrap(),
            vec![
                json!({"name": "orders-db", "type": "postgresql"}),
                json!({"cpu": "500", "memory": 256}),
            ]
        );
    }

    #[tokio::test]
    async fn test_definition_drives_engine() {
        let definition = FormDefinition::from_json(
            r#"{
                "initial_values": {"accessKey": "", "secretKey": ""},
                "schema": {
                    "secretKey": {
                        "type": "string",
                        "when": [{"field": "accessKey", "is": "empty", "then": {"required": true}}]
                    }
                },
                "changes": [{"path": "accessKey", "value": "AKIA"}]
            }"#,
        )
        .unwrap();

        let engine = FormEngine::new(FormOptions::new(
            definition.initial_values.clone(),
            definition.schema.clone(),
            submit_fn(|values| async move { Ok(values) }),
        ));
        assert!(engine.validate().await.contains("secretKey"));

        for change in &definition.changes {
            engine.set(&change.path, change.value.clone()).unwrap();
        }
        let outcome = engine.submit(None).await.unwrap();
        assert!(outcome.is_submitted());
    }
}
