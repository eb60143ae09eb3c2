use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

use crate::auth::AuthError;

const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";
const CHECK_VIOLATION: &str = "23514";

/// One failed field check, serialized inside `{ "errors": [...] }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("Validation failed")]
    Validation(Vec<FieldError>),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Unprocessable(String),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("Database error: {0}")]
    Database(sqlx::Error),
    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        AppError::Validation(vec![FieldError::new(field, message)])
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) | AppError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Auth(err) => err.status_code(),
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        if matches!(err, sqlx::Error::RowNotFound) {
            return AppError::NotFound("Record");
        }

        let (code, detail) = match err.as_database_error() {
            Some(db_err) => (
                db_err.code().map(|code| code.into_owned()),
                db_err.message().to_string(),
            ),
            None => (None, String::new()),
        };

        match code.as_deref() {
            Some(UNIQUE_VIOLATION) => {
                AppError::Conflict("A record with the same unique value already exists".to_string())
            }
            Some(FOREIGN_KEY_VIOLATION) => {
                AppError::Unprocessable("Referenced record does not exist".to_string())
            }
            Some(CHECK_VIOLATION) => AppError::Unprocessable(format!("Constraint violated: {}", detail)),
            _ => AppError::Database(err),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errs: validator::ValidationErrors) -> Self {
        let mut errors: Vec<FieldError> = errs
            .field_errors()
            .into_iter()
            .flat_map(|(field, field_errors)| {
                let field = field.to_string();
                field_errors.iter().map(move |err| {
                    let message = err
                        .message
                        .as_ref()
                        .map(|message| message.to_string())
                        .unwrap_or_else(|| format!("{} is invalid ({})", field, err.code));
                    FieldError::new(field.clone(), message)
                })
            })
            .collect();
        errors.sort_by(|a, b| a.field.cmp(&b.field));
        AppError::Validation(errors)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.to_string();

        match self {
            AppError::Validation(errors) => (status, Json(json!({ "errors": errors }))).into_response(),
            AppError::Auth(err) => err.into_response(),
            AppError::Database(err) => {
                tracing::error!("Database error: {}", err);
                (status, Json(json!({ "error": "Database error" }))).into_response()
            }
            AppError::Internal(err) => {
                tracing::error!("Internal error: {:#}", err);
                (status, Json(json!({ "error": message }))).into_response()
            }
            _ => (status, Json(json!({ "error": message }))).into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Rated {
        #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
        rating: i32,
        #[validate(email)]
        email: String,
    }

    #[test]
    fn test_validation_errors_are_flattened_and_sorted() {
        let payload = Rated {
            rating: 9,
            email: "not-an-email".to_string(),
        };
        let err = AppError::from(payload.validate().unwrap_err());

        match err {
            AppError::Validation(errors) => {
                assert_eq!(errors.len(), 2);
                assert_eq!(errors[0].field, "email");
                assert_eq!(errors[1], FieldError::new("rating", "Rating must be between 1 and 5"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(AppError::NotFound("Client").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::NotFound("Client").to_string(), "Client not found");
        assert_eq!(
            AppError::Auth(AuthError::InsufficientPermissions).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::validation("rating", "bad").status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn test_row_not_found_maps_to_404() {
        assert!(matches!(AppError::from(sqlx::Error::RowNotFound), AppError::NotFound(_)));
    }
}
