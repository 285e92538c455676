//! Custom field checks, sync or async
//!
//! Predicates are explicit objects attached to a rule. Anything they need
//! beyond the form values (a list of existing names, a lookup client) is
//! captured when the predicate is built, never read from ambient state.

use async_trait::async_trait;
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;

use crate::state::{values, FieldPath};

/// What a predicate gets to see besides the field's own value
#[derive(Debug, Clone)]
pub struct ValidationContext {
    /// Path of the field being checked
    pub path: String,
    /// The whole value tree as of this validation pass
    pub values: Arc<Value>,
}

impl ValidationContext {
    /// Read another field's current value
    pub fn value_at(&self, path: &str) -> Option<&Value> {
        let path = FieldPath::parse(path).ok()?;
        values::get(&self.values, &path)
    }
}

/// A custom check. `Ok(false)` fails the field with [`Self::message`];
/// `Err` is treated as a broken rule and reported with the generic message.
#[async_trait]
pub trait FieldPredicate: Send + Sync {
    async fn check(&self, value: Option<&Value>, ctx: &ValidationContext) -> anyhow::Result<bool>;

    fn message(&self) -> &str;
}

struct SyncPredicate<F> {
    message: String,
    check: F,
}

#[async_trait]
impl<F> FieldPredicate for SyncPredicate<F>
where
    F: Fn(Option<&Value>, &ValidationContext) -> anyhow::Result<bool> + Send + Sync,
{
    async fn check(&self, value: Option<&Value>, ctx: &ValidationContext) -> anyhow::Result<bool> {
        (self.check)(value, ctx)
    }

    fn message(&self) -> &str {
        &self.message
    }
}

struct AsyncPredicate<F> {
    message: String,
    check: F,
}

#[async_trait]
impl<F, Fut> FieldPredicate for AsyncPredicate<F>
where
    F: Fn(Option<Value>, ValidationContext) -> Fut + Send + Sync,
    Fut: Future<Output = anyhow::Result<bool>> + Send + 'static,
{
    async fn check(&self, value: Option<&Value>, ctx: &ValidationContext) -> anyhow::Result<bool> {
        (self.check)(value.cloned(), ctx.clone()).await
    }

    fn message(&self) -> &str {
        &self.message
    }
}

/// Build a predicate from a synchronous closure
pub fn predicate_fn<F>(message: impl Into<String>, check: F) -> Arc<dyn FieldPredicate>
where
    F: Fn(Option<&Value>, &ValidationContext) -> anyhow::Result<bool> + Send + Sync + 'static,
{
    Arc::new(SyncPredicate {
        message: message.into(),
        check,
    })
}

/// Build a predicate from an async closure. The closure receives owned
/// copies so the returned future can be `'static`.
pub fn async_predicate_fn<F, Fut>(message: impl Into<String>, check: F) -> Arc<dyn FieldPredicate>
where
    F: Fn(Option<Value>, ValidationContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<bool>> + Send + 'static,
{
    Arc::new(AsyncPredicate {
        message: message.into(),
        check,
    })
}
