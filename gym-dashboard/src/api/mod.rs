use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use futures::future::try_join_all;
use reqwest::{header, Client, Method, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use uuid::Uuid;

use crate::config::Config;
use crate::entity::Entity;

mod error;
pub mod notify;

pub use error::ApiError;
pub use notify::{Notifier, NotifyingService, TracingNotifier};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

/// Value of an arbitrary list filter
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl FilterValue {
    /// Query-string form; `None` for values that are not sent
    fn to_query(&self) -> Option<String> {
        match self {
            FilterValue::Null => None,
            FilterValue::Bool(value) => Some(value.to_string()),
            FilterValue::Int(value) => Some(value.to_string()),
            FilterValue::Float(value) => Some(value.to_string()),
            FilterValue::Text(value) if value.is_empty() => None,
            FilterValue::Text(value) => Some(value.clone()),
        }
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        FilterValue::Text(value.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        FilterValue::Text(value)
    }
}

impl From<Uuid> for FilterValue {
    fn from(value: Uuid) -> Self {
        FilterValue::Text(value.to_string())
    }
}

impl From<bool> for FilterValue {
    fn from(value: bool) -> Self {
        FilterValue::Bool(value)
    }
}

impl From<i64> for FilterValue {
    fn from(value: i64) -> Self {
        FilterValue::Int(value)
    }
}

impl<T: Into<FilterValue>> From<Option<T>> for FilterValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(FilterValue::Null)
    }
}

/// Options for `fetch_all`. Everything is optional; empty values are not sent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub search: Option<String>,
    pub sort: Option<String>,
    pub order: Option<SortDirection>,
    pub filters: BTreeMap<String, FilterValue>,
}

impl ListParams {
    pub fn filter(mut self, key: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        self.filters.insert(key.into(), value.into());
        self
    }

    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();

        if let Some(page) = self.page {
            query.push(("page".to_string(), page.to_string()));
        }
        if let Some(limit) = self.limit {
            query.push(("limit".to_string(), limit.to_string()));
        }
        if let Some(search) = self.search.as_deref().filter(|search| !search.is_empty()) {
            query.push(("search".to_string(), search.to_string()));
        }
        if let Some(sort) = self.sort.as_deref().filter(|sort| !sort.is_empty()) {
            query.push(("sort".to_string(), sort.to_string()));
        }
        if let Some(order) = self.order {
            query.push(("order".to_string(), order.as_str().to_string()));
        }
        for (key, value) in &self.filters {
            if let Some(value) = value.to_query() {
                query.push((key.clone(), value));
            }
        }

        query
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u64,
    pub limit: u64,
    pub total: u64,
    #[serde(default)]
    pub total_pages: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListResponse<T> {
    pub data: Vec<T>,
    pub pagination: Option<Pagination>,
}

impl<T> ListResponse<T> {
    pub fn new(data: Vec<T>) -> Self {
        Self {
            data,
            pagination: None,
        }
    }

    /// Total reported by the server, or the page length when absent
    pub fn total(&self) -> u64 {
        self.pagination
            .map(|pagination| pagination.total)
            .unwrap_or(self.data.len() as u64)
    }
}

/// Accepts `{ data, pagination? }` as well as a bare array
#[derive(Deserialize)]
#[serde(untagged)]
enum ListBody<T> {
    Wrapped {
        data: Vec<T>,
        #[serde(default)]
        pagination: Option<Pagination>,
    },
    Bare(Vec<T>),
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for ListResponse<T> {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Ok(match ListBody::deserialize(deserializer)? {
            ListBody::Wrapped { data, pagination } => ListResponse { data, pagination },
            ListBody::Bare(data) => ListResponse::new(data),
        })
    }
}

/// The seven CRUD operations, implemented by the HTTP service, the
/// notifying decorator and test doubles.
#[async_trait]
pub trait CrudTransport<T: Entity>: Send + Sync {
    async fn fetch_all(&self, params: &ListParams) -> Result<ListResponse<T>, ApiError>;

    async fn fetch_by_id(&self, id: Uuid) -> Result<T, ApiError>;

    async fn create(&self, data: &T::Create) -> Result<T, ApiError>;

    async fn update(&self, id: Uuid, data: &T::Update) -> Result<T, ApiError>;

    async fn delete(&self, id: Uuid) -> Result<(), ApiError>;

    /// One request per id, sent concurrently; fails with the first error
    async fn delete_many(&self, ids: &[Uuid]) -> Result<(), ApiError> {
        try_join_all(ids.iter().map(|id| self.delete(*id))).await?;
        Ok(())
    }

    async fn update_many(&self, ids: &[Uuid], data: &T::Update) -> Result<Vec<T>, ApiError> {
        try_join_all(ids.iter().map(|id| self.update(*id, data))).await
    }
}

/// Connection settings passed explicitly to every service
#[derive(Clone)]
pub struct ApiContext {
    base_url: String,
    token: Option<String>,
    client: Client,
}

impl fmt::Debug for ApiContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiContext")
            .field("base_url", &self.base_url)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl ApiContext {
    pub fn new(base_url: impl Into<String>, token: Option<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.filter(|token| !token.is_empty()),
            client,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            config.api.base_url.clone(),
            config.token(),
            Duration::from_secs(config.api.timeout_seconds),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let builder = self
            .client
            .request(method, url)
            .header(header::CONTENT_TYPE, "application/json");

        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }
}

/// REST client for one entity collection
pub struct CrudService<T> {
    context: ApiContext,
    endpoint: String,
    _entity: PhantomData<fn() -> T>,
}

impl<T> Clone for CrudService<T> {
    fn clone(&self) -> Self {
        Self {
            context: self.context.clone(),
            endpoint: self.endpoint.clone(),
            _entity: PhantomData,
        }
    }
}

impl<T: Entity> CrudService<T> {
    pub fn new(context: ApiContext) -> Self {
        Self::with_endpoint(context, T::ENDPOINT)
    }

    pub fn with_endpoint(context: ApiContext, endpoint: impl Into<String>) -> Self {
        Self {
            context,
            endpoint: endpoint.into(),
            _entity: PhantomData,
        }
    }

    fn item_path(&self, id: Uuid) -> String {
        format!("{}/{}", self.endpoint, id)
    }
}

async fn send(request: RequestBuilder) -> Result<Response, ApiError> {
    let response = request.send().await?;
    let status = response.status();

    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    tracing::debug!(status = %status, "Request failed: {}", body);
    Err(ApiError::from_response(status, &body))
}

async fn parse<R: DeserializeOwned>(response: Response) -> Result<R, ApiError> {
    response
        .json()
        .await
        .map_err(|err| ApiError::Decode(format!("Failed to parse response: {}", err)))
}

#[async_trait]
impl<T: Entity> CrudTransport<T> for CrudService<T> {
    async fn fetch_all(&self, params: &ListParams) -> Result<ListResponse<T>, ApiError> {
        tracing::debug!("GET {} {:?}", self.endpoint, params);
        let request = self
            .context
            .request(Method::GET, &self.endpoint)
            .query(&params.to_query());
        parse(send(request).await?).await
    }

    async fn fetch_by_id(&self, id: Uuid) -> Result<T, ApiError> {
        tracing::debug!("GET {}/{}", self.endpoint, id);
        let request = self.context.request(Method::GET, &self.item_path(id));
        parse(send(request).await?).await
    }

    async fn create(&self, data: &T::Create) -> Result<T, ApiError> {
        tracing::debug!("POST {}", self.endpoint);
        let request = self.context.request(Method::POST, &self.endpoint).json(data);
        parse(send(request).await?).await
    }

    async fn update(&self, id: Uuid, data: &T::Update) -> Result<T, ApiError> {
        tracing::debug!("PUT {}/{}", self.endpoint, id);
        let request = self.context.request(Method::PUT, &self.item_path(id)).json(data);
        parse(send(request).await?).await
    }

    async fn delete(&self, id: Uuid) -> Result<(), ApiError> {
        tracing::debug!("DELETE {}/{}", self.endpoint, id);
        let request = self.context.request(Method::DELETE, &self.item_path(id));
        let response = send(request).await?;

        if response.status() != StatusCode::NO_CONTENT {
            tracing::debug!(status = %response.status(), "Delete returned a body, ignoring it");
        }
        Ok(())
    }
}
