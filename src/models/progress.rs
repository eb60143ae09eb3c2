use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use super::SortOrder;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Progress {
    pub id: Uuid,
    pub client_id: Uuid,
    pub weight: Option<f64>,
    pub height: Option<f64>,
    pub bmi: Option<f64>,
    pub body_fat: Option<f64>,
    pub date: NaiveDate,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Most recent measurement, embedded in client projections
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSnapshot {
    pub weight: Option<f64>,
    pub height: Option<f64>,
    pub bmi: Option<f64>,
    pub body_fat: Option<f64>,
    pub date: NaiveDate,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProgressRequest {
    pub client_id: Uuid,
    #[validate(range(min = 1.0, max = 500.0, message = "Weight must be between 1 and 500 kg"))]
    pub weight: Option<f64>,
    #[validate(range(min = 30.0, max = 300.0, message = "Height must be between 30 and 300 cm"))]
    pub height: Option<f64>,
    #[validate(range(min = 5.0, max = 100.0, message = "BMI must be between 5 and 100"))]
    pub bmi: Option<f64>,
    #[validate(range(min = 0.0, max = 100.0, message = "Body fat must be between 0 and 100%"))]
    pub body_fat: Option<f64>,
    pub date: Option<NaiveDate>,
    #[validate(length(max = 2000, message = "Notes are too long"))]
    pub notes: Option<String>,
}

impl CreateProgressRequest {
    /// Explicit BMI wins; otherwise derived from weight and height
    pub fn resolved_bmi(&self) -> Option<f64> {
        self.bmi.or_else(|| match (self.weight, self.height) {
            (Some(weight), Some(height)) => Some(calculate_bmi(weight, height)),
            _ => None,
        })
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProgressRequest {
    #[validate(range(min = 1.0, max = 500.0, message = "Weight must be between 1 and 500 kg"))]
    pub weight: Option<f64>,
    #[validate(range(min = 30.0, max = 300.0, message = "Height must be between 30 and 300 cm"))]
    pub height: Option<f64>,
    #[validate(range(min = 5.0, max = 100.0, message = "BMI must be between 5 and 100"))]
    pub bmi: Option<f64>,
    #[validate(range(min = 0.0, max = 100.0, message = "Body fat must be between 0 and 100%"))]
    pub body_fat: Option<f64>,
    pub date: Option<NaiveDate>,
    #[validate(length(max = 2000, message = "Notes are too long"))]
    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    #[serde(default)]
    pub order: SortOrder,
    pub client_id: Option<Uuid>,
}

/// Body-mass index from kilograms and centimetres, one decimal place
pub fn calculate_bmi(weight_kg: f64, height_cm: f64) -> f64 {
    let height_m = height_cm / 100.0;
    let bmi = weight_kg / (height_m * height_m);
    (bmi * 10.0).round() / 10.0
}
