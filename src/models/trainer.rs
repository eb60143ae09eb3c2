use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use super::{SortOrder, UserSummary};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Trainer {
    pub id: Uuid,
    pub user_id: Uuid,
    pub specialty: Option<String>,
    pub experience: Option<i32>,
    pub bio: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Flat row produced by the trainer listing query
#[derive(Debug, Clone, FromRow)]
pub struct TrainerRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub specialty: Option<String>,
    pub experience: Option<i32>,
    pub bio: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub average_rating: Option<f64>,
    pub client_count: i64,
    pub appointment_count: i64,
    pub feedback_count: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainerWithRelations {
    pub id: Uuid,
    pub user_id: Uuid,
    pub specialty: Option<String>,
    pub experience: Option<i32>,
    pub bio: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub user: UserSummary,
    pub average_rating: Option<f64>,
    pub client_count: i64,
    pub appointment_count: i64,
    pub feedback_count: i64,
}

impl From<TrainerRow> for TrainerWithRelations {
    fn from(row: TrainerRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            specialty: row.specialty,
            experience: row.experience,
            bio: row.bio,
            created_at: row.created_at,
            updated_at: row.updated_at,
            user: UserSummary {
                id: row.user_id,
                first_name: row.first_name,
                last_name: row.last_name,
                email: row.email,
            },
            average_rating: row.average_rating.map(|rating| (rating * 100.0).round() / 100.0),
            client_count: row.client_count,
            appointment_count: row.appointment_count,
            feedback_count: row.feedback_count,
        }
    }
}

/// Trainer identity embedded in client and feedback projections
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainerSummary {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub specialty: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTrainerRequest {
    pub user_id: Uuid,
    #[validate(length(max = 100, message = "Specialty is too long"))]
    pub specialty: Option<String>,
    #[validate(range(min = 0, max = 80, message = "Experience must be between 0 and 80 years"))]
    pub experience: Option<i32>,
    #[validate(length(max = 2000, message = "Bio is too long"))]
    pub bio: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTrainerRequest {
    #[validate(length(max = 100, message = "Specialty is too long"))]
    pub specialty: Option<String>,
    #[validate(range(min = 0, max = 80, message = "Experience must be between 0 and 80 years"))]
    pub experience: Option<i32>,
    #[validate(length(max = 2000, message = "Bio is too long"))]
    pub bio: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainerQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub sort: Option<String>,
    #[serde(default)]
    pub order: SortOrder,
    pub search: Option<String>,
    pub specialty: Option<String>,
}
