use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};
use uuid::Uuid;

/// A record served by one REST collection. Every entity carries an
/// identifier and creation/update timestamps.
pub trait Entity: Clone + Send + Sync + DeserializeOwned + 'static {
    /// Payload accepted by `POST {ENDPOINT}`
    type Create: Serialize + Send + Sync;
    /// Payload accepted by `PUT {ENDPOINT}/{id}`
    type Update: Serialize + Send + Sync;

    /// Collection path relative to the API base URL, e.g. `/api/clients`
    const ENDPOINT: &'static str;

    fn id(&self) -> Uuid;
    fn created_at(&self) -> DateTime<Utc>;
    fn updated_at(&self) -> DateTime<Utc>;
}
