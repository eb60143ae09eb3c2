use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use axum_extra::extract::WithRejection;
use uuid::Uuid;

use super::{AppState, ValidatedJson};
use crate::auth::{require_admin, AuthError, CurrentUser};
use crate::error::{AppError, AppResult};
use crate::models::{CreateUserRequest, ListResponse, UpdateUserRequest, User, UserQuery};
use crate::services::UserService;

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/me", get(current_user))
        .route("/:id", get(get_user).put(update_user).delete(delete_user))
}

async fn list_users(
    State(state): State<AppState>,
    WithRejection(Query(query), _): WithRejection<Query<UserQuery>, AppError>,
) -> AppResult<Json<ListResponse<User>>> {
    let users = UserService::new(state.db).list(&query).await?;
    Ok(Json(users))
}

async fn current_user(
    State(state): State<AppState>,
    CurrentUser(session): CurrentUser,
) -> AppResult<Json<User>> {
    let user = UserService::new(state.db).get(session.user_id).await?;
    Ok(Json(user))
}

async fn get_user(State(state): State<AppState>, Path(id): Path<Uuid>) -> AppResult<Json<User>> {
    let user = UserService::new(state.db).get(id).await?;
    Ok(Json(user))
}

#[tracing::instrument(skip_all)]
async fn create_user(
    State(state): State<AppState>,
    CurrentUser(session): CurrentUser,
    ValidatedJson(request): ValidatedJson<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<User>)> {
    require_admin(&session)?;
    let user = UserService::new(state.db).create(request).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Users may edit themselves; other accounts and role changes need admin
#[tracing::instrument(skip_all)]
async fn update_user(
    State(state): State<AppState>,
    CurrentUser(session): CurrentUser,
    Path(id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<UpdateUserRequest>,
) -> AppResult<Json<User>> {
    if (id != session.user_id || request.role.is_some()) && !session.is_admin() {
        return Err(AuthError::InsufficientPermissions.into());
    }

    let user = UserService::new(state.db).update(id, request).await?;
    Ok(Json(user))
}

#[tracing::instrument(skip_all)]
async fn delete_user(
    State(state): State<AppState>,
    CurrentUser(session): CurrentUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    require_admin(&session)?;
    UserService::new(state.db).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
