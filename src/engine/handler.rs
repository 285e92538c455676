//! Submit handler abstraction, mockable in tests

use async_trait::async_trait;
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;

/// Receives validated values when a form is submitted.
///
/// Typically wraps a create/update mutation against the API. Errors are
/// passed back to the caller of [`crate::FormEngine::submit`] untouched.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubmitHandler: Send + Sync {
    async fn on_submit(&self, values: Value) -> anyhow::Result<Value>;
}

struct FnHandler<F> {
    f: F,
}

#[async_trait]
impl<F, Fut> SubmitHandler for FnHandler<F>
where
    F: Fn(Value) -> Fut + Send + Sync,
    Fut: Future<Output = anyhow::Result<Value>> + Send + 'static,
{
    async fn on_submit(&self, values: Value) -> anyhow::Result<Value> {
        (self.f)(values).await
    }
}

/// Wrap an async closure as a [`SubmitHandler`]
pub fn submit_fn<F, Fut>(f: F) -> Arc<dyn SubmitHandler>
where
    F: Fn(Value) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<Value>> + Send + 'static,
{
    Arc::new(FnHandler { f })
}
