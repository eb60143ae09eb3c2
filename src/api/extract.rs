use axum::{
    async_trait,
    extract::{FromRequest, Request},
    Json,
};
use axum_extra::extract::WithRejection;
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::error::AppError;

/// JSON body that is deserialized and then checked with `validator`.
/// Malformed bodies become 400, failed checks become 422.
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        let WithRejection(Json(value), _) =
            WithRejection::<Json<T>, AppError>::from_request(request, state).await?;
        value.validate()?;
        Ok(Self(value))
    }
}
