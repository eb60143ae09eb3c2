use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::UserSummary;
use crate::entity::Entity;
use crate::validation::{collect_errors, max_length, range, FieldError, Validate};

/// Suggestions offered by the trainer form; any text is accepted
pub const TRAINER_SPECIALTIES: [&str; 8] = [
    "Strength Training",
    "Cardio",
    "Yoga",
    "Pilates",
    "CrossFit",
    "Nutrition",
    "Weight Loss",
    "Rehabilitation",
];

const MAX_SPECIALTY_LENGTH: usize = 100;
const MAX_BIO_LENGTH: usize = 2000;
const MAX_EXPERIENCE_YEARS: f64 = 80.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
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
    #[serde(default)]
    pub average_rating: Option<f64>,
    #[serde(default)]
    pub client_count: i64,
    #[serde(default)]
    pub appointment_count: i64,
    #[serde(default)]
    pub feedback_count: i64,
}

impl TrainerWithRelations {
    pub fn full_name(&self) -> String {
        self.user.full_name()
    }
}

impl Entity for TrainerWithRelations {
    type Create = CreateTrainer;
    type Update = UpdateTrainer;

    const ENDPOINT: &'static str = "/api/trainers";

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
pub struct CreateTrainer {
    pub user_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specialty: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experience: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTrainer {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specialty: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experience: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
}

fn profile_errors(specialty: Option<&str>, experience: Option<i32>, bio: Option<&str>) -> Vec<FieldError> {
    collect_errors([
        specialty.and_then(|specialty| max_length("specialty", specialty, MAX_SPECIALTY_LENGTH)),
        experience.and_then(|years| range("experience", f64::from(years), 0.0, MAX_EXPERIENCE_YEARS)),
        bio.and_then(|bio| max_length("bio", bio, MAX_BIO_LENGTH)),
    ])
}

impl Validate for CreateTrainer {
    fn validate(&self) -> Vec<FieldError> {
        profile_errors(self.specialty.as_deref(), self.experience, self.bio.as_deref())
    }
}

impl Validate for UpdateTrainer {
    fn validate(&self) -> Vec<FieldError> {
        profile_errors(self.specialty.as_deref(), self.experience, self.bio.as_deref())
    }
}
