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
    CreateMealPlanRequest, ListResponse, MealPlan, PlanQuery, UpdateMealPlanRequest,
};
use crate::services::PlanService;

pub fn meal_plan_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_meal_plans).post(create_meal_plan))
        .route(
            "/:id",
            get(get_meal_plan).put(update_meal_plan).delete(delete_meal_plan),
        )
}

async fn list_meal_plans(
    State(state): State<AppState>,
    WithRejection(Query(query), _): WithRejection<Query<PlanQuery>, AppError>,
) -> AppResult<Json<ListResponse<MealPlan>>> {
    let plans = PlanService::new(state.db).list_meal_plans(&query).await?;
    Ok(Json(plans))
}

async fn get_meal_plan(State(state): State<AppState>, Path(id): Path<Uuid>) -> AppResult<Json<MealPlan>> {
    let plan = PlanService::new(state.db).get_meal_plan(id).await?;
    Ok(Json(plan))
}

async fn create_meal_plan(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateMealPlanRequest>,
) -> AppResult<(StatusCode, Json<MealPlan>)> {
    let plan = PlanService::new(state.db).create_meal_plan(request).await?;
    Ok((StatusCode::CREATED, Json(plan)))
}

async fn update_meal_plan(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<UpdateMealPlanRequest>,
) -> AppResult<Json<MealPlan>> {
    let plan = PlanService::new(state.db).update_meal_plan(id, request).await?;
    Ok(Json(plan))
}

async fn delete_meal_plan(State(state): State<AppState>, Path(id): Path<Uuid>) -> AppResult<StatusCode> {
    PlanService::new(state.db).delete_meal_plan(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
