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
use crate::auth::CurrentUser;
use crate::error::{AppError, AppResult};
use crate::models::{
    CreateFeedbackRequest, FeedbackQuery, FeedbackWithRelations, ListResponse,
    UpdateFeedbackRequest,
};
use crate::services::{FeedbackService, NewFeedback};

pub fn feedback_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_feedbacks).post(create_feedback))
        .route(
            "/:id",
            get(get_feedback).put(update_feedback).delete(delete_feedback),
        )
}

async fn list_feedbacks(
    State(state): State<AppState>,
    WithRejection(Query(query), _): WithRejection<Query<FeedbackQuery>, AppError>,
) -> AppResult<Json<ListResponse<FeedbackWithRelations>>> {
    let feedbacks = FeedbackService::new(state.db).list(&query).await?;
    Ok(Json(feedbacks))
}

async fn get_feedback(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<FeedbackWithRelations>> {
    let feedback = FeedbackService::new(state.db).get(id).await?;
    Ok(Json(feedback))
}

/// Only admins may file feedback on behalf of another user
async fn create_feedback(
    State(state): State<AppState>,
    CurrentUser(session): CurrentUser,
    ValidatedJson(request): ValidatedJson<CreateFeedbackRequest>,
) -> AppResult<(StatusCode, Json<FeedbackWithRelations>)> {
    let user_id = match request.user_id {
        Some(user_id) if session.is_admin() => user_id,
        _ => session.user_id,
    };

    let feedback = FeedbackService::new(state.db)
        .create(NewFeedback {
            user_id,
            trainer_id: request.trainer_id,
            rating: request.rating,
            comment: request.comment,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(feedback)))
}

async fn update_feedback(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<UpdateFeedbackRequest>,
) -> AppResult<Json<FeedbackWithRelations>> {
    let feedback = FeedbackService::new(state.db).update(id, request).await?;
    Ok(Json(feedback))
}

async fn delete_feedback(State(state): State<AppState>, Path(id): Path<Uuid>) -> AppResult<StatusCode> {
    FeedbackService::new(state.db).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
