use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, put},
    Router,
};
use axum_extra::extract::WithRejection;
use uuid::Uuid;

use super::{AppState, ValidatedJson};
use crate::auth::{CurrentUser, UserSession};
use crate::error::{AppError, AppResult};
use crate::models::{
    CreateNotificationRequest, ListResponse, Notification, NotificationQuery,
    UpdateNotificationRequest,
};
use crate::services::NotificationService;

pub fn notification_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_notifications).post(create_notification))
        .route(
            "/:id",
            get(get_notification)
                .put(update_notification)
                .delete(delete_notification),
        )
        .route("/:id/read", put(mark_notification_read))
}

/// Non-admin callers only ever see their own inbox
async fn list_notifications(
    State(state): State<AppState>,
    CurrentUser(session): CurrentUser,
    WithRejection(Query(mut query), _): WithRejection<Query<NotificationQuery>, AppError>,
) -> AppResult<Json<ListResponse<Notification>>> {
    if !session.is_admin() {
        query.user_id = Some(session.user_id);
    }

    let notifications = NotificationService::new(state.db).list(&query).await?;
    Ok(Json(notifications))
}

async fn get_notification(
    State(state): State<AppState>,
    CurrentUser(session): CurrentUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Notification>> {
    let notification = owned_notification(&state, &session, id).await?;
    Ok(Json(notification))
}

async fn create_notification(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateNotificationRequest>,
) -> AppResult<(StatusCode, Json<Notification>)> {
    let notification = NotificationService::new(state.db).create(request).await?;
    Ok((StatusCode::CREATED, Json(notification)))
}

async fn update_notification(
    State(state): State<AppState>,
    CurrentUser(session): CurrentUser,
    Path(id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<UpdateNotificationRequest>,
) -> AppResult<Json<Notification>> {
    owned_notification(&state, &session, id).await?;
    let notification = NotificationService::new(state.db).update(id, request).await?;
    Ok(Json(notification))
}

async fn mark_notification_read(
    State(state): State<AppState>,
    CurrentUser(session): CurrentUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Notification>> {
    owned_notification(&state, &session, id).await?;
    let notification = NotificationService::new(state.db).mark_read(id).await?;
    Ok(Json(notification))
}

async fn delete_notification(
    State(state): State<AppState>,
    CurrentUser(session): CurrentUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    owned_notification(&state, &session, id).await?;
    NotificationService::new(state.db).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Someone else's notification is reported as missing
async fn owned_notification(
    state: &AppState,
    session: &UserSession,
    id: Uuid,
) -> AppResult<Notification> {
    let notification = NotificationService::new(state.db.clone()).get(id).await?;
    if notification.user_id != session.user_id && !session.is_admin() {
        return Err(AppError::NotFound("Notification"));
    }
    Ok(notification)
}
