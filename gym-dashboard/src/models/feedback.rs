use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{TrainerSummary, UserSummary};
use crate::entity::Entity;
use crate::validation::{collect_errors, max_length, range, FieldError, Validate};

pub const MIN_RATING: i32 = 1;
pub const MAX_RATING: i32 = 5;

const MAX_COMMENT_LENGTH: usize = 2000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
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

impl Entity for FeedbackWithRelations {
    type Create = CreateFeedback;
    type Update = UpdateFeedback;

    const ENDPOINT: &'static str = "/api/feedbacks";

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

/// `user_id` is honoured for admin tokens only
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFeedback {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<Uuid>,
    pub trainer_id: Uuid,
    pub rating: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFeedback {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

fn rating_error(rating: i32) -> Option<FieldError> {
    range(
        "rating",
        f64::from(rating),
        f64::from(MIN_RATING),
        f64::from(MAX_RATING),
    )
}

impl Validate for CreateFeedback {
    fn validate(&self) -> Vec<FieldError> {
        collect_errors([
            rating_error(self.rating),
            self.comment
                .as_deref()
                .and_then(|comment| max_length("comment", comment, MAX_COMMENT_LENGTH)),
        ])
    }
}

impl Validate for UpdateFeedback {
    fn validate(&self) -> Vec<FieldError> {
        collect_errors([
            self.rating.and_then(rating_error),
            self.comment
                .as_deref()
                .and_then(|comment| max_length("comment", comment, MAX_COMMENT_LENGTH)),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_bounds() {
        let mut feedback = CreateFeedback {
            trainer_id: Uuid::new_v4(),
            rating: 5,
            ..Default::default()
        };
        assert!(feedback.is_valid());

        feedback.rating = 0;
        assert_eq!(
            feedback.validate()[0].message,
            "rating must be between 1 and 5"
        );

        assert!(UpdateFeedback::default().is_valid());
    }
}
