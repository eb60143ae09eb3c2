use thiserror::Error;

use crate::api::ApiError;

#[derive(Error, Debug)]
pub enum DashboardError {
    /// Client-side validation failed; the messages are joined with ", "
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DashboardError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, DashboardError::Api(ApiError::NotFound(_)))
    }
}
