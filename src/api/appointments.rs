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
    Appointment, AppointmentQuery, CreateAppointmentRequest, ListResponse,
    UpdateAppointmentRequest,
};
use crate::services::AppointmentService;

pub fn appointment_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_appointments).post(create_appointment))
        .route(
            "/:id",
            get(get_appointment)
                .put(update_appointment)
                .delete(delete_appointment),
        )
}

async fn list_appointments(
    State(state): State<AppState>,
    WithRejection(Query(query), _): WithRejection<Query<AppointmentQuery>, AppError>,
) -> AppResult<Json<ListResponse<Appointment>>> {
    let appointments = AppointmentService::new(state.db).list(&query).await?;
    Ok(Json(appointments))
}

async fn get_appointment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Appointment>> {
    let appointment = AppointmentService::new(state.db).get(id).await?;
    Ok(Json(appointment))
}

#[tracing::instrument(skip_all)]
async fn create_appointment(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateAppointmentRequest>,
) -> AppResult<(StatusCode, Json<Appointment>)> {
    let appointment = AppointmentService::new(state.db).create(request).await?;
    Ok((StatusCode::CREATED, Json(appointment)))
}

async fn update_appointment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<UpdateAppointmentRequest>,
) -> AppResult<Json<Appointment>> {
    let appointment = AppointmentService::new(state.db).update(id, request).await?;
    Ok(Json(appointment))
}

async fn delete_appointment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    AppointmentService::new(state.db).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
