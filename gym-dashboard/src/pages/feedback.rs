use std::collections::BTreeSet;
use std::str::FromStr;

use uuid::Uuid;

use super::{matches_search, ConfirmStep, PageState, RowConfirm};
use crate::api::CrudTransport;
use crate::error::DashboardError;
use crate::models::feedback::{MAX_RATING, MIN_RATING};
use crate::models::FeedbackWithRelations;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FeedbackStats {
    pub total: usize,
    pub average_rating: Option<f64>,
    /// Count per star, index 0 is one star
    pub distribution: [usize; 5],
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FeedbackSort {
    #[default]
    Recent,
    RatingHigh,
    RatingLow,
}

impl FromStr for FeedbackSort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "recent" => Ok(FeedbackSort::Recent),
            "rating-high" => Ok(FeedbackSort::RatingHigh),
            "rating-low" => Ok(FeedbackSort::RatingLow),
            other => Err(format!("Unknown sort: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedbackFilters {
    pub search: String,
    /// Empty means every rating
    pub ratings: BTreeSet<i32>,
    pub trainer_id: Option<Uuid>,
    pub sort: FeedbackSort,
}

pub fn feedback_stats(feedbacks: &[FeedbackWithRelations]) -> FeedbackStats {
    let mut distribution = [0usize; 5];
    for feedback in feedbacks {
        let star = feedback.rating.clamp(MIN_RATING, MAX_RATING) - MIN_RATING;
        distribution[star as usize] += 1;
    }

    let average_rating = (!feedbacks.is_empty()).then(|| {
        feedbacks.iter().map(|feedback| f64::from(feedback.rating)).sum::<f64>() / feedbacks.len() as f64
    });

    FeedbackStats {
        total: feedbacks.len(),
        average_rating,
        distribution,
    }
}

pub fn feedback_view<'a>(
    feedbacks: &'a [FeedbackWithRelations],
    filters: &FeedbackFilters,
) -> Vec<&'a FeedbackWithRelations> {
    let mut view: Vec<_> = feedbacks
        .iter()
        .filter(|feedback| {
            let client = feedback.client.full_name();
            let trainer = feedback.trainer.full_name();
            matches_search(
                &filters.search,
                [
                    client.as_str(),
                    trainer.as_str(),
                    feedback.comment.as_deref().unwrap_or_default(),
                ],
            )
        })
        .filter(|feedback| filters.ratings.is_empty() || filters.ratings.contains(&feedback.rating))
        .filter(|feedback| filters.trainer_id.map_or(true, |id| feedback.trainer_id == id))
        .collect();

    match filters.sort {
        FeedbackSort::Recent => view.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        FeedbackSort::RatingHigh => view.sort_by(|a, b| {
            b.rating
                .cmp(&a.rating)
                .then_with(|| b.created_at.cmp(&a.created_at))
        }),
        FeedbackSort::RatingLow => view.sort_by(|a, b| {
            a.rating
                .cmp(&b.rating)
                .then_with(|| b.created_at.cmp(&a.created_at))
        }),
    }

    view
}

pub struct FeedbackPage<S> {
    transport: S,
    pub state: PageState<FeedbackWithRelations>,
    pub confirm: RowConfirm,
}

impl<S: CrudTransport<FeedbackWithRelations>> FeedbackPage<S> {
    pub fn new(transport: S) -> Self {
        Self {
            transport,
            state: PageState::default(),
            confirm: RowConfirm::default(),
        }
    }

    pub async fn load(&mut self) -> Result<(), DashboardError> {
        self.state.load(&self.transport).await
    }

    pub async fn refresh(&mut self) -> Result<(), DashboardError> {
        self.load().await
    }

    pub fn feedbacks(&self) -> &[FeedbackWithRelations] {
        &self.state.items
    }

    pub fn stats(&self) -> FeedbackStats {
        feedback_stats(&self.state.items)
    }

    pub fn view(&self, filters: &FeedbackFilters) -> Vec<&FeedbackWithRelations> {
        feedback_view(&self.state.items, filters)
    }

    pub async fn request_delete(&mut self, feedback_id: Uuid) -> Result<ConfirmStep, DashboardError> {
        match self.confirm.request(feedback_id) {
            ConfirmStep::Armed => Ok(ConfirmStep::Armed),
            ConfirmStep::Confirmed => {
                self.state
                    .run(&self.transport, "delete", self.transport.delete(feedback_id))
                    .await?;
                Ok(ConfirmStep::Confirmed)
            }
        }
    }
}
