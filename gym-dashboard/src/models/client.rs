use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::{ProgressSnapshot, TrainerSummary, UserSummary};
use crate::entity::Entity;
use crate::validation::{collect_errors, max_length, FieldError, Validate};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    Sedentary,
    Light,
    Moderate,
    Active,
    VeryActive,
}

impl ActivityLevel {
    pub const ALL: [ActivityLevel; 5] = [
        ActivityLevel::Sedentary,
        ActivityLevel::Light,
        ActivityLevel::Moderate,
        ActivityLevel::Active,
        ActivityLevel::VeryActive,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "sedentary",
            ActivityLevel::Light => "light",
            ActivityLevel::Moderate => "moderate",
            ActivityLevel::Active => "active",
            ActivityLevel::VeryActive => "very_active",
        }
    }
}

impl fmt::Display for ActivityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActivityLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['-', ' '], "_");
        ActivityLevel::ALL
            .into_iter()
            .find(|level| level.as_str() == normalized)
            .ok_or_else(|| format!("Unknown activity level: {}", s))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
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
    #[serde(default)]
    pub trainer: Option<TrainerSummary>,
    #[serde(default)]
    pub latest_progress: Option<ProgressSnapshot>,
    #[serde(default)]
    pub progress_count: i64,
    #[serde(default)]
    pub meal_plan_count: i64,
    #[serde(default)]
    pub workout_plan_count: i64,
}

impl ClientWithRelations {
    pub fn is_assigned(&self) -> bool {
        self.trainer_id.is_some()
    }

    pub fn full_name(&self) -> String {
        self.user.full_name()
    }
}

impl Entity for ClientWithRelations {
    type Create = CreateClient;
    type Update = UpdateClient;

    const ENDPOINT: &'static str = "/api/clients";

    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateClient {
    pub user_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trainer_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goals: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity_level: Option<ActivityLevel>,
}

/// `trainer_id: Some(None)` is sent as `null` and unassigns the client
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateClient {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trainer_id: Option<Option<Uuid>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goals: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity_level: Option<ActivityLevel>,
}

impl UpdateClient {
    pub fn assign(trainer_id: Uuid) -> Self {
        Self {
            trainer_id: Some(Some(trainer_id)),
            ..Default::default()
        }
    }

    pub fn unassign() -> Self {
        Self {
            trainer_id: Some(None),
            ..Default::default()
        }
    }
}

const MAX_GOALS_LENGTH: usize = 1000;

impl Validate for CreateClient {
    fn validate(&self) -> Vec<FieldError> {
        collect_errors([self
            .goals
            .as_deref()
            .and_then(|goals| max_length("goals", goals, MAX_GOALS_LENGTH))])
    }
}

impl Validate for UpdateClient {
    fn validate(&self) -> Vec<FieldError> {
        collect_errors([self
            .goals
            .as_deref()
            .and_then(|goals| max_length("goals", goals, MAX_GOALS_LENGTH))])
    }
}
