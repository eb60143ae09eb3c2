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
    CreateWorkoutPlanRequest, ListResponse, PlanQuery, UpdateWorkoutPlanRequest, WorkoutPlan,
};
use crate::services::PlanService;

pub fn workout_plan_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_workout_plans).post(create_workout_plan))
        .route(
            "/:id",
            get(get_workout_plan)
                .put(update_workout_plan)
                .delete(delete_workout_plan),
        )
}

async fn list_workout_plans(
    State(state): State<AppState>,
    WithRejection(Query(query), _): WithRejection<Query<PlanQuery>, AppError>,
) -> AppResult<Json<ListResponse<WorkoutPlan>>> {
    let plans = PlanService::new(state.db).list_workout_plans(&query).await?;
    Ok(Json(plans))
}

async fn get_workout_plan(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<WorkoutPlan>> {
    let plan = PlanService::new(state.db).get_workout_plan(id).await?;
    Ok(Json(plan))
}

async fn create_workout_plan(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateWorkoutPlanRequest>,
) -> AppResult<(StatusCode, Json<WorkoutPlan>)> {
    let plan = PlanService::new(state.db).create_workout_plan(request).await?;
    Ok((StatusCode::CREATED, Json(plan)))
}

async fn update_workout_plan(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<UpdateWorkoutPlanRequest>,
) -> AppResult<Json<WorkoutPlan>> {
    let plan = PlanService::new(state.db).update_workout_plan(id, request).await?;
    Ok(Json(plan))
}

async fn delete_workout_plan(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    PlanService::new(state.db).delete_workout_plan(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
