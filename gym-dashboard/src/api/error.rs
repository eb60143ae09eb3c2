use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// Transport failure. The display string is exactly the message reported
/// by the server, or `HTTP <status>: <reason>` when it gave none.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Server(String),

    #[error("{0}")]
    Network(String),

    #[error("{0}")]
    Decode(String),

    #[error("{0}")]
    Unknown(String),
}

/// The error shapes the backend emits
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
    #[serde(default)]
    errors: Vec<FieldMessage>,
}

#[derive(Debug, Deserialize)]
struct FieldMessage {
    message: String,
}

impl ApiError {
    pub fn from_status(status: StatusCode, message: String) -> Self {
        let msg = if message.is_empty() {
            fallback_message(status)
        } else {
            message
        };

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ApiError::Unauthorized(msg),
            StatusCode::NOT_FOUND => ApiError::NotFound(msg),
            StatusCode::BAD_REQUEST | StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY => {
                ApiError::BadRequest(msg)
            }
            status if status.is_server_error() => ApiError::Server(msg),
            status if status.is_client_error() => ApiError::BadRequest(msg),
            _ => ApiError::Unknown(msg),
        }
    }

    /// Builds the error for a non-2xx response from its raw body
    pub fn from_response(status: StatusCode, body: &str) -> Self {
        Self::from_status(status, message_from_body(body).unwrap_or_default())
    }

    pub fn message(&self) -> &str {
        match self {
            ApiError::Unauthorized(msg)
            | ApiError::NotFound(msg)
            | ApiError::BadRequest(msg)
            | ApiError::Server(msg)
            | ApiError::Network(msg)
            | ApiError::Decode(msg)
            | ApiError::Unknown(msg) => msg,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound(_))
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

fn fallback_message(status: StatusCode) -> String {
    format!(
        "HTTP {}: {}",
        status.as_u16(),
        status.canonical_reason().unwrap_or("Unknown error")
    )
}

/// `message`, then `error`, then the joined `errors[].message`
fn message_from_body(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;

    parsed
        .message
        .filter(|message| !message.is_empty())
        .or(parsed.error.filter(|error| !error.is_empty()))
        .or_else(|| {
            let joined = parsed
                .errors
                .iter()
                .map(|field| field.message.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            (!joined.is_empty()).then_some(joined)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_message_uses_status_line() {
        let err = ApiError::from_response(StatusCode::NOT_FOUND, "");
        assert_eq!(err, ApiError::NotFound("HTTP 404: Not Found".to_string()));
        assert_eq!(err.to_string(), "HTTP 404: Not Found");
    }

    #[test]
    fn test_message_precedence() {
        let both = r#"{"message": "from message", "error": "from error"}"#;
        assert_eq!(
            ApiError::from_response(StatusCode::BAD_REQUEST, both).to_string(),
            "from message"
        );

        let error_only = r#"{"error": "Client not found"}"#;
        assert_eq!(
            ApiError::from_response(StatusCode::NOT_FOUND, error_only),
            ApiError::NotFound("Client not found".to_string())
        );

        let field_errors = r#"{"errors": [
            {"field": "rating", "message": "Rating must be between 1 and 5"},
            {"field": "comment", "message": "Comment is too long"}
        ]}"#;
        assert_eq!(
            ApiError::from_response(StatusCode::UNPROCESSABLE_ENTITY, field_errors).to_string(),
            "Rating must be between 1 and 5, Comment is too long"
        );
    }

    #[test]
    fn test_non_json_body_falls_back() {
        let err = ApiError::from_response(StatusCode::BAD_GATEWAY, "<html>bad gateway</html>");
        assert_eq!(err, ApiError::Server("HTTP 502: Bad Gateway".to_string()));
    }

    #[test]
    fn test_status_classification() {
        assert!(matches!(
            ApiError::from_status(StatusCode::FORBIDDEN, String::new()),
            ApiError::Unauthorized(_)
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::CONFLICT, "taken".to_string()),
            ApiError::BadRequest(_)
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::INTERNAL_SERVER_ERROR, String::new()),
            ApiError::Server(_)
        ));
    }
}
