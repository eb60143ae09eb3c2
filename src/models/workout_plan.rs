use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "workout_difficulty", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum WorkoutDifficulty {
    Beginner,
    Intermediate,
    Advanced,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutPlan {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub difficulty: Option<WorkoutDifficulty>,
    pub is_active: bool,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateWorkoutPlanRequest {
    pub user_id: Uuid,
    #[validate(length(min = 1, max = 200, message = "Name is required"))]
    pub name: String,
    #[validate(length(max = 2000, message = "Description is too long"))]
    pub description: Option<String>,
    pub difficulty: Option<WorkoutDifficulty>,
    pub is_active: Option<bool>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateWorkoutPlanRequest {
    #[validate(length(min = 1, max = 200, message = "Name cannot be empty"))]
    pub name: Option<String>,
    #[validate(length(max = 2000, message = "Description is too long"))]
    pub description: Option<String>,
    pub difficulty: Option<WorkoutDifficulty>,
    pub is_active: Option<bool>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}
