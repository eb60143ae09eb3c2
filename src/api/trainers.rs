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
    CreateTrainerRequest, ListResponse, TrainerQuery, TrainerWithRelations, UpdateTrainerRequest,
};
use crate::services::TrainerService;

pub fn trainer_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_trainers).post(create_trainer))
        .route(
            "/:id",
            get(get_trainer).put(update_trainer).delete(delete_trainer),
        )
}

async fn list_trainers(
    State(state): State<AppState>,
    WithRejection(Query(query), _): WithRejection<Query<TrainerQuery>, AppError>,
) -> AppResult<Json<ListResponse<TrainerWithRelations>>> {
    let trainers = TrainerService::new(state.db).list(&query).await?;
    Ok(Json(trainers))
}

async fn get_trainer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<TrainerWithRelations>> {
    let trainer = TrainerService::new(state.db).get(id).await?;
    Ok(Json(trainer))
}

async fn create_trainer(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateTrainerRequest>,
) -> AppResult<(StatusCode, Json<TrainerWithRelations>)> {
    let trainer = TrainerService::new(state.db).create(request).await?;
    Ok((StatusCode::CREATED, Json(trainer)))
}

async fn update_trainer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<UpdateTrainerRequest>,
) -> AppResult<Json<TrainerWithRelations>> {
    let trainer = TrainerService::new(state.db).update(id, request).await?;
    Ok(Json(trainer))
}

async fn delete_trainer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    TrainerService::new(state.db).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
