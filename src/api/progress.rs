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
use crate::error::{AppError, AppResult};
use crate::models::{
    CreateProgressRequest, ListResponse, Progress, ProgressQuery, UpdateProgressRequest,
};
use crate::services::ProgressService;

pub fn progress_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_progress).post(create_progress))
        .route(
            "/:id",
            get(get_progress).put(update_progress).delete(delete_progress),
        )
}

async fn list_progress(
    State(state): State<AppState>,
    WithRejection(Query(query), _): WithRejection<Query<ProgressQuery>, AppError>,
) -> AppResult<Json<ListResponse<Progress>>> {
    let records = ProgressService::new(state.db).list(&query).await?;
    Ok(Json(records))
}

async fn get_progress(State(state): State<AppState>, Path(id): Path<Uuid>) -> AppResult<Json<Progress>> {
    let record = ProgressService::new(state.db).get(id).await?;
    Ok(Json(record))
}

async fn create_progress(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateProgressRequest>,
) -> AppResult<(StatusCode, Json<Progress>)> {
    let record = ProgressService::new(state.db).create(request).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

async fn update_progress(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<UpdateProgressRequest>,
) -> AppResult<Json<Progress>> {
    let record = ProgressService::new(state.db).update(id, request).await?;
    Ok(Json(record))
}

async fn delete_progress(State(state): State<AppState>, Path(id): Path<Uuid>) -> AppResult<StatusCode> {
    ProgressService::new(state.db).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
