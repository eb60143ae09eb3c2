use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use super::{nullable, ProgressSnapshot, SortOrder, TrainerSummary, UserSummary};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "activity_level", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    Sedentary,
    Light,
    Moderate,
    Active,
    VeryActive,
}

/// Whether a client currently has a trainer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssignmentStatus {
    Active,
    Unassigned,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: Uuid,
    pub user_id: Uuid,
    pub trainer_id: Option<Uuid>,
    pub goals: Option<String>,
    pub activity_level: Option<ActivityLevel>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Flat row produced by the client listing query
#[derive(Debug, Clone, FromRow)]
pub struct ClientRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub trainer_id: Option<Uuid>,
    pub goals: Option<String>,
    pub activity_level: Option<ActivityLevel>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub trainer_first_name: Option<String>,
    pub trainer_last_name: Option<String>,
    pub trainer_specialty: Option<String>,
    pub latest_weight: Option<f64>,
    pub latest_height: Option<f64>,
    pub latest_bmi: Option<f64>,
    pub latest_body_fat: Option<f64>,
    pub latest_date: Option<NaiveDate>,
    pub progress_count: i64,
    pub meal_plan_count: i64,
    pub workout_plan_count: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientWithRelations {
    pub id: Uuid,
    pub user_id: Uuid,
    pub trainer_id: Option<Uuid>,
    pub goals: Option<String>,
    pub activity_level: Option<ActivityLevel>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub user: UserSummary,
    pub trainer: Option<TrainerSummary>,
    pub latest_progress: Option<ProgressSnapshot>,
    pub progress_count: i64,
    pub meal_plan_count: i64,
    pub workout_plan_count: i64,
}

impl From<ClientRow> for ClientWithRelations {
    fn from(row: ClientRow) -> Self {
        let trainer = match (row.trainer_id, row.trainer_first_name, row.trainer_last_name) {
            (Some(id), Some(first_name), Some(last_name)) => Some(TrainerSummary {
                id,
                first_name,
                last_name,
                specialty: row.trainer_specialty,
            }),
            _ => None,
        };

        let latest_progress = row.latest_date.map(|date| ProgressSnapshot {
            weight: row.latest_weight,
            height: row.latest_height,
            bmi: row.latest_bmi,
            body_fat: row.latest_body_fat,
            date,
        });

        Self {
            id: row.id,
            user_id: row.user_id,
            trainer_id: row.trainer_id,
            goals: row.goals,
            activity_level: row.activity_level,
            created_at: row.created_at,
            updated_at: row.updated_at,
            user: UserSummary {
                id: row.user_id,
                first_name: row.first_name,
                last_name: row.last_name,
                email: row.email,
            },
            trainer,
            latest_progress,
            progress_count: row.progress_count,
            meal_plan_count: row.meal_plan_count,
            workout_plan_count: row.workout_plan_count,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateClientRequest {
    pub user_id: Uuid,
    pub trainer_id: Option<Uuid>,
    #[validate(length(max = 1000, message = "Goals are too long"))]
    pub goals: Option<String>,
    pub activity_level: Option<ActivityLevel>,
}

/// `trainerId: null` unassigns the client; an absent field leaves it unchanged.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateClientRequest {
    #[serde(default, deserialize_with = "nullable")]
    pub trainer_id: Option<Option<Uuid>>,
    #[validate(length(max = 1000, message = "Goals are too long"))]
    pub goals: Option<String>,
    pub activity_level: Option<ActivityLevel>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub sort: Option<String>,
    #[serde(default)]
    pub order: SortOrder,
    pub search: Option<String>,
    pub trainer_id: Option<Uuid>,
    pub status: Option<AssignmentStatus>,
    pub activity_level: Option<ActivityLevel>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_request_distinguishes_null_from_absent() {
        let unassign: UpdateClientRequest = serde_json::from_str(r#"{"trainerId": null}"#).unwrap();
        assert_eq!(unassign.trainer_id, Some(None));

        let untouched: UpdateClientRequest = serde_json::from_str(r#"{"goals": "Lose 5kg"}"#).unwrap();
        assert_eq!(untouched.trainer_id, None);

        let trainer_id = Uuid::new_v4();
        let assign: UpdateClientRequest =
            serde_json::from_str(&format!(r#"{{"trainerId": "{}"}}"#, trainer_id)).unwrap();
        assert_eq!(assign.trainer_id, Some(Some(trainer_id)));
    }

    #[test]
    fn test_activity_level_wire_format() {
        let level: ActivityLevel = serde_json::from_str(r#""very_active""#).unwrap();
        assert_eq!(level, ActivityLevel::VeryActive);
    }
}
