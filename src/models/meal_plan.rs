use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use super::SortOrder;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct MealPlan {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub daily_calories: Option<i32>,
    pub is_active: bool,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateMealPlanRequest {
    pub user_id: Uuid,
    #[validate(length(min = 1, max = 200, message = "Name is required"))]
    pub name: String,
    #[validate(length(max = 2000, message = "Description is too long"))]
    pub description: Option<String>,
    #[validate(range(min = 1, max = 20000, message = "Daily calories must be between 1 and 20000"))]
    pub daily_calories: Option<i32>,
    pub is_active: Option<bool>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMealPlanRequest {
    #[validate(length(min = 1, max = 200, message = "Name cannot be empty"))]
    pub name: Option<String>,
    #[validate(length(max = 2000, message = "Description is too long"))]
    pub description: Option<String>,
    #[validate(range(min = 1, max = 20000, message = "Daily calories must be between 1 and 20000"))]
    pub daily_calories: Option<i32>,
    pub is_active: Option<bool>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// List filters shared by meal and workout plans
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub sort: Option<String>,
    #[serde(default)]
    pub order: SortOrder,
    pub user_id: Option<Uuid>,
    pub is_active: Option<bool>,
}

impl PlanQuery {
    pub fn order_column(&self) -> &'static str {
        match self.sort.as_deref() {
            Some("name") => "LOWER(name)",
            Some("startDate") => "start_date",
            Some("updatedAt") => "updated_at",
            _ => "created_at",
        }
    }
}
