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
    Consultation, ConsultationQuery, CreateConsultationRequest, ListResponse,
    UpdateConsultationRequest,
};
use crate::services::ConsultationService;

pub fn consultation_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_consultations).post(create_consultation))
        .route(
            "/:id",
            get(get_consultation)
                .put(update_consultation)
                .delete(delete_consultation),
        )
}

async fn list_consultations(
    State(state): State<AppState>,
    WithRejection(Query(query), _): WithRejection<Query<ConsultationQuery>, AppError>,
) -> AppResult<Json<ListResponse<Consultation>>> {
    let consultations = ConsultationService::new(state.db).list(&query).await?;
    Ok(Json(consultations))
}

async fn get_consultation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Consultation>> {
    let consultation = ConsultationService::new(state.db).get(id).await?;
    Ok(Json(consultation))
}

async fn create_consultation(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateConsultationRequest>,
) -> AppResult<(StatusCode, Json<Consultation>)> {
    let consultation = ConsultationService::new(state.db).create(request).await?;
    Ok((StatusCode::CREATED, Json(consultation)))
}

async fn update_consultation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<UpdateConsultationRequest>,
) -> AppResult<Json<Consultation>> {
    let consultation = ConsultationService::new(state.db).update(id, request).await?;
    Ok(Json(consultation))
}

async fn delete_consultation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    ConsultationService::new(state.db).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
