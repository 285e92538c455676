//! The form engine handle
//!
//! A [`FormEngine`] is a cheap, cloneable handle to one form's state. Clones
//! share the same state, which is how a UI hands the engine to several
//! input widgets and a submit button. Separate engines share nothing.
//!
//! The state lock is only held for synchronous reads and writes, never
//! across an await, so validation and submit handlers run unlocked.

use super::events::{ChangeEvent, SubmitEvent};
use super::handler::SubmitHandler;
use super::{panic_message, validator};
use crate::error::{FormError, SubmitError};
use crate::schema::{Messages, Schema};
use crate::state::{FieldErrors, FieldPath, FormState};
use futures::FutureExt;
use serde_json::Value;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use uuid::Uuid;

/// Everything needed to mount a form
pub struct FormOptions {
    pub initial_values: Value,
    pub schema: Schema,
    pub on_submit: Arc<dyn SubmitHandler>,
    pub messages: Messages,
}

impl FormOptions {
    pub fn new(initial_values: Value, schema: Schema, on_submit: Arc<dyn SubmitHandler>) -> Self {
        Self {
            initial_values,
            schema,
            on_submit,
            messages: Messages::default(),
        }
    }

    pub fn with_messages(mut self, messages: Messages) -> Self {
        self.messages = messages;
        self
    }
}

/// Result of a submit attempt that did not hit a handler error
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome<T = Value> {
    /// Values were valid and the handler returned this output
    Submitted(T),
    /// Validation failed; the handler was not called
    Rejected(FieldErrors),
    /// Another submit was already in flight, or the form was disposed
    Ignored,
}

impl<T> SubmitOutcome<T> {
    pub fn is_submitted(&self) -> bool {
        matches!(self, SubmitOutcome::Submitted(_))
    }

    pub fn errors(&self) -> Option<&FieldErrors> {
        match self {
            SubmitOutcome::Rejected(errors) => Some(errors),
            _ => None,
        }
    }

    pub fn into_output(self) -> Option<T> {
        match self {
            SubmitOutcome::Submitted(output) => Some(output),
            _ => None,
        }
    }
}

struct Inner {
    id: Uuid,
    schema: Schema,
    messages: Messages,
    on_submit: Arc<dyn SubmitHandler>,
    state: Mutex<FormState>,
    disposed: AtomicBool,
}

/// Ends a submit cycle when dropped, so a cancelled or panicking submit
/// cannot leave the form stuck in the submitting state. Disposed forms
/// stay frozen.
struct SubmittingGuard<'a> {
    engine: &'a FormEngine,
}

impl Drop for SubmittingGuard<'_> {
    fn drop(&mut self) {
        self.engine.mutate(|state| state.is_submitting = false);
    }
}

#[derive(Clone)]
pub struct FormEngine {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for FormEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormEngine")
            .field("id", &self.inner.id)
            .field("state", &*self.lock())
            .field("disposed", &self.is_disposed())
            .finish()
    }
}

impl FormEngine {
    /// Mount a form. Only allocates state; a broken schema surfaces on the
    /// first validation.
    pub fn new(options: FormOptions) -> Self {
        let id = Uuid::new_v4();
        tracing::debug!(form = %id, fields = options.schema.len(), "form created");
        Self {
            inner: Arc::new(Inner {
                id,
                schema: options.schema,
                messages: options.messages,
                on_submit: options.on_submit,
                state: Mutex::new(FormState::new(options.initial_values)),
                disposed: AtomicBool::new(false),
            }),
        }
    }

    pub fn id(&self) -> Uuid {
        self.inner.id
    }

    pub fn schema(&self) -> &Schema {
        &self.inner.schema
    }

    fn lock(&self) -> MutexGuard<'_, FormState> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `f` against the state unless the form has been disposed
    fn mutate<R>(&self, f: impl FnOnce(&mut FormState) -> R) -> Option<R> {
        if self.is_disposed() {
            tracing::debug!(form = %self.inner.id, "dropping update on disposed form");
            return None;
        }
        Some(f(&mut self.lock()))
    }

    // --- reads ---------------------------------------------------------

    /// Snapshot of the whole state
    pub fn state(&self) -> FormState {
        self.lock().clone()
    }

    pub fn values(&self) -> Arc<Value> {
        self.lock().values_snapshot()
    }

    pub fn initial_values(&self) -> Value {
        self.lock().initial_values().clone()
    }

    pub fn field_value(&self, path: &str) -> Option<Value> {
        self.lock().field_value(path).cloned()
    }

    pub fn errors(&self) -> FieldErrors {
        self.lock().errors.clone()
    }

    pub fn field_error(&self, path: &str) -> Option<String> {
        self.lock().errors.get(path).map(str::to_string)
    }

    pub fn is_submitting(&self) -> bool {
        self.lock().is_submitting
    }

    pub fn submit_count(&self) -> u32 {
        self.lock().submit_count
    }

    /// Whether the values differ from the initial snapshot
    pub fn is_dirty(&self) -> bool {
        self.lock().is_dirty()
    }

    pub fn is_disposed(&self) -> bool {
        self.inner.disposed.load(Ordering::Acquire)
    }

    // --- writes --------------------------------------------------------

    /// Set one field, keeping every other path. Does not validate.
    pub fn set(&self, path: &str, value: impl Into<Value>) -> Result<(), FormError> {
        let parsed = FieldPath::parse(path)?;
        let value = value.into();
        self.mutate(|state| state.set_field(&parsed, value))
            .transpose()?;
        tracing::trace!(form = %self.inner.id, path, "field set");
        Ok(())
    }

    /// Remove one field, or one element of a list field
    pub fn remove(&self, path: &str) -> Result<Option<Value>, FormError> {
        let parsed = FieldPath::parse(path)?;
        Ok(self.mutate(|state| state.remove_field(&parsed)).flatten())
    }

    /// Change handler bound to `path`, for input widgets
    pub fn handle_change(&self, path: &str) -> Result<ChangeHandler, FormError> {
        Ok(ChangeHandler {
            engine: self.clone(),
            path: FieldPath::parse(path)?,
        })
    }

    /// Replace all values. The initial snapshot is untouched.
    pub fn set_values(&self, values: Value) {
        self.mutate(|state| state.replace_values(values));
    }

    /// Replace all values with a function of the previous ones
    pub fn update_values(&self, f: impl FnOnce(&Value) -> Value) {
        self.mutate(|state| {
            let next = f(state.values());
            state.replace_values(next);
        });
    }

    /// Back to the initial snapshot, or to `next`, which then becomes the
    /// new initial snapshot. Clears errors and the submit count.
    pub fn reset_values(&self, next: Option<Value>) {
        let resynced = next.is_some();
        if self.mutate(|state| state.reset(next)).is_some() {
            tracing::debug!(form = %self.inner.id, resynced, "form reset");
        }
    }

    /// Mark the form as unmounted. Later writes, and the results of any
    /// validation or submit still in flight, are dropped.
    pub fn dispose(&self) {
        if !self.inner.disposed.swap(true, Ordering::AcqRel) {
            tracing::debug!(form = %self.inner.id, "form disposed");
        }
    }

    // --- validation and submit -----------------------------------------

    /// Validate the current values, store the errors and return them
    pub async fn validate(&self) -> FieldErrors {
        let values = self.values();
        let errors = validator::validate(&self.inner.schema, values, &self.inner.messages).await;
        self.mutate(|state| state.errors = errors.clone());
        errors
    }

    /// Validate and, if everything passes, call the submit handler.
    ///
    /// Validation failures come back as [`SubmitOutcome::Rejected`]; handler
    /// failures, panics included, come back as `Err`. A call made while
    /// another submit is in flight is ignored. Dropping the returned future
    /// ends the cycle.
    pub async fn submit(
        &self,
        event: Option<&mut SubmitEvent>,
    ) -> Result<SubmitOutcome, SubmitError> {
        if let Some(event) = event {
            event.prevent_default();
        }

        let form = self.inner.id;
        let started = self.mutate(|state| {
            if state.is_submitting {
                return None;
            }
            state.is_submitting = true;
            state.submit_count += 1;
            Some((state.values_snapshot(), state.submit_count))
        });
        let Some((values, attempt)) = started.flatten() else {
            tracing::debug!(form = %form, "submit ignored");
            return Ok(SubmitOutcome::Ignored);
        };
        let submitting = SubmittingGuard { engine: self };

        let errors =
            validator::validate(&self.inner.schema, Arc::clone(&values), &self.inner.messages)
                .await;
        if !errors.is_empty() {
            tracing::info!(form = %form, attempt, failed = errors.len(), "submit blocked by validation");
            self.mutate(|state| state.errors = errors.clone());
            return Ok(SubmitOutcome::Rejected(errors));
        }

        self.mutate(|state| state.errors.clear());
        let result = AssertUnwindSafe(self.inner.on_submit.on_submit((*values).clone()))
            .catch_unwind()
            .await
            .unwrap_or_else(|payload| {
                Err(anyhow::anyhow!(
                    "submit handler panicked: {}",
                    panic_message(&*payload)
                ))
            });
        drop(submitting);

        match result {
            Ok(output) => {
                tracing::info!(form = %form, attempt, "form submitted");
                Ok(SubmitOutcome::Submitted(output))
            }
            Err(err) => {
                tracing::warn!(form = %form, attempt, error = %err, "submit handler failed");
                Err(SubmitError::Handler(err))
            }
        }
    }

    /// Event-bound submit
    pub async fn handle_submit(
        &self,
        event: &mut SubmitEvent,
    ) -> Result<SubmitOutcome, SubmitError> {
        self.submit(Some(event)).await
    }
}

/// A change handler bound to one field path
#[derive(Debug, Clone)]
pub struct ChangeHandler {
    engine: FormEngine,
    path: FieldPath,
}

impl ChangeHandler {
    pub fn path(&self) -> &FieldPath {
        &self.path
    }

    /// Apply a change event or raw value
    pub fn call(&self, event: impl Into<ChangeEvent>) {
        let value = event.into().into_value();
        let result = self
            .engine
            .mutate(|state| state.set_field(&self.path, value))
            .transpose();
        if let Err(err) = result {
            tracing::warn!(form = %self.engine.inner.id, error = %err, "change rejected");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::handler::{submit_fn, MockSubmitHandler};
    use crate::schema::{Condition, FieldRule, RuleOverride, When};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::sync::atomic::AtomicUsize;

    fn name_schema() -> Schema {
        Schema::new().field("name", FieldRule::string().required())
    }

    fn engine_with(initial: Value, schema: Schema, handler: Arc<dyn SubmitHandler>) -> FormEngine {
        FormEngine::new(FormOptions::new(initial, schema, handler))
    }

    fn echo_handler() -> Arc<dyn SubmitHandler> {
        submit_fn(|values| async move { Ok(values) })
    }

    /// Handler that counts calls and yields once so concurrent submits
    /// interleave
    fn counting_handler(calls: Arc<AtomicUsize>) -> Arc<dyn SubmitHandler> {
        submit_fn(move |values| {
            let calls = Arc::clone(&calls);
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                tokio::task::yield_now().await;
                Ok(values)
            }
        })
    }

    mod mutation {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_set_preserves_siblings_and_initial_values() {
            let initial = json!({"a": {"b": 1, "c": [1, 2]}, "d": "keep"});
            let engine = engine_with(initial.clone(), Schema::new(), echo_handler());

            engine.set("a.b", "x").unwrap();

            assert_eq!(engine.field_value("a.b"), Some(json!("x")));
            assert_eq!(
                *engine.values(),
                json!({"a": {"b": "x", "c": [1, 2]}, "d": "keep"})
            );
            assert_eq!(engine.initial_values(), initial);
            assert!(engine.is_dirty());
        }

        #[test]
        fn test_set_invalid_path_is_an_error() {
            let engine = engine_with(json!({}), Schema::new(), echo_handler());
            assert!(engine.set("a..b", 1).is_err());
        }

        #[test]
        fn test_handle_change_accepts_raw_values_and_events() {
            let engine = engine_with(json!({"name": ""}), Schema::new(), echo_handler());
            let on_name = engine.handle_change("name").unwrap();
            on_name.call("app-1");
            assert_eq!(engine.field_value("name"), Some(json!("app-1")));

            on_name.call(crate::engine::InputEvent::text("app-2"));
            assert_eq!(engine.field_value("name"), Some(json!("app-2")));

            let on_public = engine.handle_change("spec.public").unwrap();
            on_public.call(crate::engine::InputEvent::checkbox(true));
            assert_eq!(engine.field_value("spec.public"), Some(json!(true)));
        }

        #[test]
        fn test_handle_change_does_not_validate() {
            let engine = engine_with(json!({"name": "x"}), name_schema(), echo_handler());
            engine.handle_change("name").unwrap().call("");
            assert!(engine.errors().is_empty());
        }

        #[test]
        fn test_set_values_and_update_values() {
            let initial = json!({"ports": [80]});
            let engine = engine_with(initial.clone(), Schema::new(), echo_handler());

            engine.update_values(|prev| {
                let mut next = prev.clone();
                if let Some(ports) = next["ports"].as_array_mut() {
                    ports.push(json!(443));
                }
                next
            });
            assert_eq!(*engine.values(), json!({"ports": [80, 443]}));

            engine.set_values(json!({"ports": []}));
            assert_eq!(*engine.values(), json!({"ports": []}));
            assert_eq!(engine.initial_values(), initial);
        }

        #[test]
        fn test_remove_list_element() {
            let engine = engine_with(json!({"ports": [80, 443]}), Schema::new(), echo_handler());
            assert_eq!(engine.remove("ports.0").unwrap(), Some(json!(80)));
            assert_eq!(*engine.values(), json!({"ports": [443]}));
        }

        #[tokio::test]
        async fn test_reset_values() {
            let engine = engine_with(json!({"name": ""}), name_schema(), echo_handler());
            engine.set("name", "").unwrap();
            engine.submit(None).await.unwrap();
            engine.set("name", "changed").unwrap();

            engine.reset_values(None);

            assert_eq!(*engine.values(), engine.initial_values());
            assert!(engine.errors().is_empty());
            assert_eq!(engine.submit_count(), 0);
            assert!(!engine.is_dirty());
        }

        #[test]
        fn test_reset_values_resyncs_to_new_snapshot() {
            let engine = engine_with(json!({"name": "old"}), Schema::new(), echo_handler());
            engine.set("name", "edited").unwrap();
            engine.reset_values(Some(json!({"name": "refetched"})));
            assert_eq!(*engine.values(), json!({"name": "refetched"}));
            assert_eq!(engine.initial_values(), json!({"name": "refetched"}));
            assert!(!engine.is_dirty());
        }

        #[test]
        fn test_engines_are_isolated() {
            let a = engine_with(json!({"name": ""}), Schema::new(), echo_handler());
            let b = engine_with(json!({"name": ""}), Schema::new(), echo_handler());
            a.set("name", "a").unwrap();
            assert_eq!(b.field_value("name"), Some(json!("")));
            assert_ne!(a.id(), b.id());
        }

        #[test]
        fn test_clones_share_state() {
            let engine = engine_with(json!({}), Schema::new(), echo_handler());
            let widget = engine.clone();
            widget.set("name", "shared").unwrap();
            assert_eq!(engine.field_value("name"), Some(json!("shared")));
        }
    }

    mod validation {
        use super::*;
        use pretty_assertions::assert_eq;

        #[tokio::test]
        async fn test_validate_stores_and_returns_errors() {
            let engine = engine_with(json!({"name": ""}), name_schema(), echo_handler());
            let errors = engine.validate().await;
            assert!(errors.contains("name"));
            assert_eq!(engine.errors(), errors);
            assert_eq!(engine.field_error("name").as_deref(), Some("name is required"));
        }

        #[tokio::test]
        async fn test_conditional_rule_follows_current_values() {
            let schema = Schema::new().field(
                "secretKey",
                FieldRule::string().when(
                    When::new("accessKey", Condition::Empty).then(RuleOverride::required(true)),
                ),
            );
            let engine = engine_with(
                json!({"accessKey": "", "secretKey": ""}),
                schema,
                echo_handler(),
            );

            engine.set("accessKey", "AKIA").unwrap();
            assert!(!engine.validate().await.contains("secretKey"));

            engine.set("accessKey", "").unwrap();
            assert!(engine.validate().await.contains("secretKey"));
        }

        #[tokio::test]
        async fn test_custom_messages() {
            let messages = Messages {
                required: "Fill in {field}".to_string(),
                ..Messages::default()
            };
            let engine = FormEngine::new(
                FormOptions::new(json!({}), name_schema(), echo_handler()).with_messages(messages),
            );
            assert_eq!(engine.validate().await.get("name"), Some("Fill in name"));
        }
    }

    mod submit {
        use super::*;
        use pretty_assertions::assert_eq;

        #[tokio::test]
        async fn test_blocked_submit_then_successful_submit() {
            let mut handler = MockSubmitHandler::new();
            handler
                .expect_on_submit()
                .withf(|values| values == &json!({"name": "app-1"}))
                .times(1)
                .returning(|values| Ok(values));
            let engine = engine_with(json!({"name": ""}), name_schema(), Arc::new(handler));

            let outcome = engine.submit(None).await.unwrap();
            assert!(matches!(outcome, SubmitOutcome::Rejected(_)));
            assert!(engine
                .field_error("name")
                .is_some_and(|message| !message.is_empty()));
            assert!(!engine.is_submitting());

            engine.handle_change("name").unwrap().call("app-1");
            let outcome = engine.submit(None).await.unwrap();
            assert_eq!(outcome, SubmitOutcome::Submitted(json!({"name": "app-1"})));
            assert!(engine.errors().is_empty());
            assert_eq!(engine.submit_count(), 2);
        }

        #[tokio::test]
        async fn test_handler_error_propagates_and_clears_submitting() {
            let mut handler = MockSubmitHandler::new();
            handler
                .expect_on_submit()
                .times(1)
                .returning(|_| Err(anyhow::anyhow!("name already taken on server")));
            let engine = engine_with(json!({"name": "db"}), name_schema(), Arc::new(handler));

            let err = engine.submit(None).await.unwrap_err();
            assert!(matches!(err, SubmitError::Handler(_)));
            assert!(err.to_string().contains("name already taken on server"));
            assert!(!engine.is_submitting());
            assert!(engine.errors().is_empty());
            assert_eq!(engine.submit_count(), 1);
        }

        #[tokio::test]
        async fn test_double_click_calls_handler_once() {
            let calls = Arc::new(AtomicUsize::new(0));
            let engine = engine_with(
                json!({"name": "web"}),
                name_schema(),
                counting_handler(Arc::clone(&calls)),
            );

            let (first, second) = tokio::join!(engine.submit(None), engine.submit(None));

            assert!(first.unwrap().is_submitted());
            assert_eq!(second.unwrap(), SubmitOutcome::Ignored);
            assert_eq!(calls.load(Ordering::SeqCst), 1);
            assert_eq!(engine.submit_count(), 1);
            assert!(!engine.is_submitting());
        }

        #[tokio::test]
        async fn test_is_submitting_while_handler_runs() {
            let (release_tx, release_rx) = tokio::sync::oneshot::channel::<()>();
            let release_rx = Arc::new(tokio::sync::Mutex::new(Some(release_rx)));
            let handler = submit_fn(move |values| {
                let release_rx = Arc::clone(&release_rx);
                async move {
                    if let Some(rx) = release_rx.lock().await.take() {
                        let _ = rx.await;
                    }
                    Ok(values)
                }
            });
            let engine = engine_with(json!({"name": "web"}), name_schema(), handler);

            let task = tokio::spawn({
                let engine = engine.clone();
                async move { engine.submit(None).await }
            });
            while !engine.is_submitting() {
                tokio::task::yield_now().await;
            }
            assert!(engine.is_submitting());
            release_tx.send(()).unwrap();

            let outcome = task.await.unwrap().unwrap();
            assert!(outcome.is_submitted());
            assert!(!engine.is_submitting());
        }

        #[tokio::test]
        async fn test_submit_prevents_default() {
            let engine = engine_with(json!({"name": ""}), name_schema(), echo_handler());
            let mut event = SubmitEvent::new();
            engine.handle_submit(&mut event).await.unwrap();
            assert!(event.is_default_prevented());
        }

        #[tokio::test]
        async fn test_submit_count_counts_failed_attempts() {
            let engine = engine_with(json!({"name": ""}), name_schema(), echo_handler());
            engine.submit(None).await.unwrap();
            engine.submit(None).await.unwrap();
            assert_eq!(engine.submit_count(), 2);
        }

        #[tokio::test]
        async fn test_never_calls_handler_when_invalid() {
            let mut handler = MockSubmitHandler::new();
            handler.expect_on_submit().never();
            let schema = Schema::new()
                .field("name", FieldRule::string().required())
                .field("replicas", FieldRule::number().min(1.0));
            let engine = engine_with(
                json!({"name": "web", "replicas": 0}),
                schema,
                Arc::new(handler),
            );
            let outcome = engine.submit(None).await.unwrap();
            assert_eq!(
                outcome.errors().and_then(|e| e.get("replicas")),
                Some("replicas must be at least 1")
            );
        }
    }

    mod interrupted {
        use super::*;
        use pretty_assertions::assert_eq;
        use std::time::Duration;

        /// Handler whose first call misbehaves via `first`, later calls echo
        fn flaky_handler<F, Fut>(calls: Arc<AtomicUsize>, first: F) -> Arc<dyn SubmitHandler>
        where
            F: Fn() -> Fut + Send + Sync + 'static,
            Fut: std::future::Future<Output = ()> + Send + 'static,
        {
            submit_fn(move |values| {
                let misbehave = calls.fetch_add(1, Ordering::SeqCst) == 0;
                let fut = first();
                async move {
                    if misbehave {
                        fut.await;
                    }
                    Ok(values)
                }
            })
        }

        #[tokio::test]
        async fn test_cancelled_submit_can_be_retried() {
            let calls = Arc::new(AtomicUsize::new(0));
            let handler = flaky_handler(Arc::clone(&calls), std::future::pending::<()>);
            let engine = engine_with(json!({"name": "web"}), name_schema(), handler);

            let timed_out =
                tokio::time::timeout(Duration::from_millis(10), engine.submit(None)).await;
            assert!(timed_out.is_err());
            assert!(!engine.is_submitting());

            let outcome = engine.submit(None).await.unwrap();
            assert_eq!(outcome, SubmitOutcome::Submitted(json!({"name": "web"})));
            assert_eq!(calls.load(Ordering::SeqCst), 2);
            assert_eq!(engine.submit_count(), 2);
        }

        #[tokio::test]
        async fn test_panicking_handler_is_a_handler_error() {
            let calls = Arc::new(AtomicUsize::new(0));
            let handler = flaky_handler(Arc::clone(&calls), || async {
                panic!("handler bug");
            });
            let engine = engine_with(json!({"name": "web"}), name_schema(), handler);

            let err = engine.submit(None).await.unwrap_err();
            assert!(matches!(err, SubmitError::Handler(_)));
            assert!(err.to_string().contains("handler bug"));
            assert!(!engine.is_submitting());

            assert!(engine.submit(None).await.unwrap().is_submitted());
        }

        #[tokio::test]
        async fn test_aborted_submit_task_releases_form() {
            let calls = Arc::new(AtomicUsize::new(0));
            let handler = flaky_handler(Arc::clone(&calls), std::future::pending::<()>);
            let engine = engine_with(json!({"name": "web"}), name_schema(), handler);

            let task = tokio::spawn({
                let engine = engine.clone();
                async move { engine.submit(None).await }
            });
            while calls.load(Ordering::SeqCst) == 0 {
                tokio::task::yield_now().await;
            }
            assert!(engine.is_submitting());
            task.abort();
            assert!(task.await.unwrap_err().is_cancelled());

            assert!(!engine.is_submitting());
            assert!(engine.submit(None).await.unwrap().is_submitted());
        }

        #[tokio::test]
        async fn test_blank_rule_message_still_blocks_submit() {
            let mut handler = MockSubmitHandler::new();
            handler.expect_on_submit().never();
            let schema = Schema::new().field("name", FieldRule::string().required().message(""));
            let engine = engine_with(json!({"name": ""}), schema, Arc::new(handler));

            let outcome = engine.submit(None).await.unwrap();
            assert_eq!(
                outcome.errors().and_then(|e| e.get("name")),
                Some("name is invalid")
            );
            assert!(!engine.is_submitting());
        }
    }

    mod disposal {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_writes_after_dispose_are_dropped() {
            let engine = engine_with(json!({"name": "a"}), Schema::new(), echo_handler());
            engine.dispose();
            engine.set("name", "b").unwrap();
            engine.set_values(json!({}));
            engine.reset_values(Some(json!({"name": "c"})));
            assert_eq!(engine.field_value("name"), Some(json!("a")));
            assert!(engine.is_disposed());
        }

        #[tokio::test]
        async fn test_submit_after_dispose_is_ignored() {
            let mut handler = MockSubmitHandler::new();
            handler.expect_on_submit().never();
            let engine = engine_with(json!({"name": "a"}), name_schema(), Arc::new(handler));
            engine.dispose();
            assert_eq!(engine.submit(None).await.unwrap(), SubmitOutcome::Ignored);
        }

        #[tokio::test]
        async fn test_dispose_mid_flight_drops_result() {
            let engine_slot: Arc<Mutex<Option<FormEngine>>> = Arc::new(Mutex::new(None));
            let slot = Arc::clone(&engine_slot);
            let handler = submit_fn(move |values| {
                let slot = Arc::clone(&slot);
                async move {
                    if let Some(engine) = slot.lock().unwrap().as_ref() {
                        engine.dispose();
                    }
                    Ok(values)
                }
            });
            let engine = engine_with(json!({"name": "web"}), name_schema(), handler);
            *engine_slot.lock().unwrap() = Some(engine.clone());

            let outcome = engine.submit(None).await.unwrap();

            // The caller still learns the outcome, but the state is frozen
            assert!(outcome.is_submitted());
            assert!(engine.is_submitting());
            assert!(engine.is_disposed());
        }
    }
}
