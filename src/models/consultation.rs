use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use super::SortOrder;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "consultation_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ConsultationStatus {
    Pending,
    Accepted,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Consultation {
    pub id: Uuid,
    pub client_id: Uuid,
    pub trainer_id: Uuid,
    pub scheduled_at: DateTime<Utc>,
    pub status: ConsultationStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateConsultationRequest {
    pub client_id: Uuid,
    pub trainer_id: Uuid,
    pub scheduled_at: DateTime<Utc>,
    pub status: Option<ConsultationStatus>,
    #[validate(length(max = 2000, message = "Notes are too long"))]
    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateConsultationRequest {
    pub trainer_id: Option<Uuid>,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub status: Option<ConsultationStatus>,
    #[validate(length(max = 2000, message = "Notes are too long"))]
    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsultationQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    #[serde(default)]
    pub order: SortOrder,
    pub client_id: Option<Uuid>,
    pub trainer_id: Option<Uuid>,
    pub status: Option<ConsultationStatus>,
}
