use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use super::{SortOrder, TrainerSummary, UserSummary};

pub const MIN_RATING: i32 = 1;
pub const MAX_RATING: i32 = 5;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    pub id: Uuid,
    pub user_id: Uuid,
    pub trainer_id: Uuid,
    pub rating: i32,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Flat row produced by the feedback listing query
#[derive(Debug, Clone, FromRow)]
pub struct FeedbackRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub trainer_id: Uuid,
    pub rating: i32,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub client_first_name: String,
    pub client_last_name: String,
    pub client_email: String,
    pub trainer_first_name: String,
    pub trainer_last_name: String,
    pub trainer_specialty: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackWithRelations {
    pub id: Uuid,
    pub user_id: Uuid,
    pub trainer_id: Uuid,
    pub rating: i32,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub client: UserSummary,
    pub trainer: TrainerSummary,
}

impl From<FeedbackRow> for FeedbackWithRelations {
    fn from(row: FeedbackRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            trainer_id: row.trainer_id,
            rating: row.rating,
            comment: row.comment,
            created_at: row.created_at,
            updated_at: row.updated_at,
            client: UserSummary {
                id: row.user_id,
                first_name: row.client_first_name,
                last_name: row.client_last_name,
                email: row.client_email,
            },
            trainer: TrainerSummary {
                id: row.trainer_id,
                first_name: row.trainer_first_name,
                last_name: row.trainer_last_name,
                specialty: row.trainer_specialty,
            },
        }
    }
}

/// `userId` defaults to the caller when omitted
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateFeedbackRequest {
    pub user_id: Option<Uuid>,
    pub trainer_id: Uuid,
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: i32,
    #[validate(length(max = 2000, message = "Comment is too long"))]
    pub comment: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFeedbackRequest {
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: Option<i32>,
    #[validate(length(max = 2000, message = "Comment is too long"))]
    pub comment: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub sort: Option<String>,
    #[serde(default)]
    pub order: SortOrder,
    pub search: Option<String>,
    pub trainer_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
    pub min_rating: Option<i32>,
}
