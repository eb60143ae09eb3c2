use std::str::FromStr;

use uuid::Uuid;

use super::{compare_desc_nulls_last, compare_names, matches_search, ConfirmStep, PageState, RowConfirm};
use crate::api::CrudTransport;
use crate::error::DashboardError;
use crate::models::{CreateTrainer, TrainerWithRelations, UpdateTrainer};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TrainerStats {
    pub total: usize,
    pub with_clients: usize,
    /// Mean over trainers that have at least one rating
    pub average_rating: Option<f64>,
    pub total_clients: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TrainerSort {
    #[default]
    Name,
    Rating,
    Clients,
    Experience,
    Recent,
}

impl FromStr for TrainerSort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "name" => Ok(TrainerSort::Name),
            "rating" => Ok(TrainerSort::Rating),
            "clients" => Ok(TrainerSort::Clients),
            "experience" => Ok(TrainerSort::Experience),
            "recent" => Ok(TrainerSort::Recent),
            other => Err(format!("Unknown sort: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrainerFilters {
    pub search: String,
    pub specialty: Option<String>,
    /// Unrated trainers are excluded once a minimum is set
    pub min_rating: Option<f64>,
    pub sort: TrainerSort,
}

pub fn trainer_stats(trainers: &[TrainerWithRelations]) -> TrainerStats {
    let ratings: Vec<f64> = trainers.iter().filter_map(|trainer| trainer.average_rating).collect();
    let average_rating =
        (!ratings.is_empty()).then(|| ratings.iter().sum::<f64>() / ratings.len() as f64);

    TrainerStats {
        total: trainers.len(),
        with_clients: trainers.iter().filter(|trainer| trainer.client_count > 0).count(),
        average_rating,
        total_clients: trainers.iter().map(|trainer| trainer.client_count).sum(),
    }
}

pub fn trainer_view<'a>(
    trainers: &'a [TrainerWithRelations],
    filters: &TrainerFilters,
) -> Vec<&'a TrainerWithRelations> {
    let specialty = filters
        .specialty
        .as_deref()
        .map(str::trim)
        .filter(|specialty| !specialty.is_empty());

    let mut view: Vec<_> = trainers
        .iter()
        .filter(|trainer| {
            let name = trainer.full_name();
            matches_search(
                &filters.search,
                [
                    name.as_str(),
                    trainer.user.email.as_str(),
                    trainer.specialty.as_deref().unwrap_or_default(),
                ],
            )
        })
        .filter(|trainer| {
            specialty.map_or(true, |wanted| {
                trainer
                    .specialty
                    .as_deref()
                    .is_some_and(|specialty| specialty.eq_ignore_ascii_case(wanted))
            })
        })
        .filter(|trainer| {
            filters.min_rating.map_or(true, |min| {
                trainer.average_rating.is_some_and(|rating| rating >= min)
            })
        })
        .collect();

    match filters.sort {
        TrainerSort::Name => view.sort_by(|a, b| compare_names(&a.full_name(), &b.full_name())),
        TrainerSort::Rating => {
            view.sort_by(|a, b| compare_desc_nulls_last(a.average_rating, b.average_rating))
        }
        TrainerSort::Clients => view.sort_by(|a, b| b.client_count.cmp(&a.client_count)),
        TrainerSort::Experience => view.sort_by(|a, b| {
            compare_desc_nulls_last(a.experience.map(f64::from), b.experience.map(f64::from))
        }),
        TrainerSort::Recent => view.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
    }

    view
}

pub struct TrainersPage<S> {
    transport: S,
    pub state: PageState<TrainerWithRelations>,
    pub confirm: RowConfirm,
}

impl<S: CrudTransport<TrainerWithRelations>> TrainersPage<S> {
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

    pub fn trainers(&self) -> &[TrainerWithRelations] {
        &self.state.items
    }

    pub fn stats(&self) -> TrainerStats {
        trainer_stats(&self.state.items)
    }

    pub fn view(&self, filters: &TrainerFilters) -> Vec<&TrainerWithRelations> {
        trainer_view(&self.state.items, filters)
    }

    pub async fn create(&mut self, data: CreateTrainer) -> Result<TrainerWithRelations, DashboardError> {
        self.state.check(&data)?;
        self.state
            .run(&self.transport, "create", self.transport.create(&data))
            .await
    }

    pub async fn update_profile(
        &mut self,
        trainer_id: Uuid,
        data: UpdateTrainer,
    ) -> Result<TrainerWithRelations, DashboardError> {
        self.state.check(&data)?;
        self.state
            .run(&self.transport, "update", self.transport.update(trainer_id, &data))
            .await
    }

    pub async fn request_delete(&mut self, trainer_id: Uuid) -> Result<ConfirmStep, DashboardError> {
        match self.confirm.request(trainer_id) {
            ConfirmStep::Armed => Ok(ConfirmStep::Armed),
            ConfirmStep::Confirmed => {
                self.state
                    .run(&self.transport, "delete", self.transport.delete(trainer_id))
                    .await?;
                Ok(ConfirmStep::Confirmed)
            }
        }
    }
}
