use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};
use tower_http::cors::{Any, CorsLayer};

use crate::auth::{extract_bearer_token, AuthError, JwtService, UserSession};

/// JWT authentication middleware
pub async fn jwt_auth_middleware(
    State(jwt_service): State<JwtService>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .ok_or(AuthError::MissingAuthHeader)?;

    let token = extract_bearer_token(auth_header)?;
    let session = jwt_service.extract_user_session(token)?;

    tracing::debug!(user_id = %session.user_id, role = ?session.role, "Authenticated request");
    request.extensions_mut().insert(session);

    Ok(next.run(request).await)
}

/// Rejects non-admin sessions
pub fn require_admin(session: &UserSession) -> Result<(), AuthError> {
    if !session.is_admin() {
        return Err(AuthError::InsufficientPermissions);
    }
    Ok(())
}

/// Handler extractor for the session injected by `jwt_auth_middleware`
pub struct CurrentUser(pub UserSession);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<UserSession>()
            .cloned()
            .map(CurrentUser)
            .ok_or(AuthError::MissingAuthHeader)
    }
}

/// CORS configuration for the dashboard origin
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}
