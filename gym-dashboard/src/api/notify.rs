use async_trait::async_trait;
use uuid::Uuid;

use super::{ApiError, CrudTransport, ListParams, ListResponse};
use crate::entity::Entity;

/// Receives the outcome of each mutation, the dashboard's toast equivalent
pub trait Notifier: Send + Sync {
    fn success(&self, message: &str);
    fn error(&self, message: &str);
}

/// Reports through `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn success(&self, message: &str) {
        tracing::info!("{}", message);
    }

    fn error(&self, message: &str) {
        tracing::warn!("{}", message);
    }
}

/// Wraps a transport and reports create/update/delete results to a notifier.
/// Reads pass through silently.
pub struct NotifyingService<S, N> {
    inner: S,
    notifier: N,
    label: String,
}

impl<S, N> NotifyingService<S, N> {
    /// `label` names the entity in messages, e.g. "Client"
    pub fn new(inner: S, notifier: N, label: impl Into<String>) -> Self {
        Self {
            inner,
            notifier,
            label: label.into(),
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

impl<S, N: Notifier> NotifyingService<S, N> {
    fn report<R>(&self, verb: &str, past: &str, result: Result<R, ApiError>) -> Result<R, ApiError> {
        match &result {
            Ok(_) => self
                .notifier
                .success(&format!("{} {} successfully", self.label, past)),
            Err(err) => self.notifier.error(&format!(
                "Failed to {} {}: {}",
                verb,
                self.label.to_lowercase(),
                err
            )),
        }
        result
    }
}

#[async_trait]
impl<T, S, N> CrudTransport<T> for NotifyingService<S, N>
where
    T: Entity,
    S: CrudTransport<T>,
    N: Notifier,
{
    async fn fetch_all(&self, params: &ListParams) -> Result<ListResponse<T>, ApiError> {
        self.inner.fetch_all(params).await
    }

    async fn fetch_by_id(&self, id: Uuid) -> Result<T, ApiError> {
        self.inner.fetch_by_id(id).await
    }

    async fn create(&self, data: &T::Create) -> Result<T, ApiError> {
        let result = self.inner.create(data).await;
        self.report("create", "created", result)
    }

    async fn update(&self, id: Uuid, data: &T::Update) -> Result<T, ApiError> {
        let result = self.inner.update(id, data).await;
        self.report("update", "updated", result)
    }

    async fn delete(&self, id: Uuid) -> Result<(), ApiError> {
        let result = self.inner.delete(id).await;
        self.report("delete", "deleted", result)
    }
}
