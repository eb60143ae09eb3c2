#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use uuid::Uuid;

use gym_dashboard::api::{ApiError, CrudTransport, ListParams, ListResponse, Pagination};
use gym_dashboard::models::{
    ClientWithRelations, CreateClient, CreateFeedback, CreateTrainer, FeedbackWithRelations,
    TrainerSummary, TrainerWithRelations, UpdateClient, UpdateFeedback, UpdateTrainer, UserSummary,
};
use gym_dashboard::Entity;

pub fn not_found() -> ApiError {
    ApiError::NotFound("HTTP 404: Not Found".to_string())
}

pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap()
}

/// Entities the in-memory transport can create and update locally
pub trait Fixture: Entity {
    fn build(data: &Self::Create) -> Self;
    fn apply(&mut self, data: &Self::Update);
}

/// Vec-backed transport shared across clones
#[derive(Clone)]
pub struct MemoryTransport<T> {
    items: Arc<Mutex<Vec<T>>>,
    failure: Arc<Mutex<Option<ApiError>>>,
    list_failure: Arc<Mutex<Option<ApiError>>>,
}

impl<T: Fixture> MemoryTransport<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items: Arc::new(Mutex::new(items)),
            failure: Arc::new(Mutex::new(None)),
            list_failure: Arc::new(Mutex::new(None)),
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Every following call fails with `error`
    pub fn fail_with(&self, error: ApiError) {
        *self.failure.lock().unwrap() = Some(error);
    }

    /// Only `fetch_all` fails; mutations keep working
    pub fn fail_lists_with(&self, error: ApiError) {
        *self.list_failure.lock().unwrap() = Some(error);
    }

    pub fn recover(&self) {
        *self.failure.lock().unwrap() = None;
        *self.list_failure.lock().unwrap() = None;
    }

    pub fn snapshot(&self) -> Vec<T> {
        self.items.lock().unwrap().clone()
    }

    fn check(&self) -> Result<(), ApiError> {
        match self.failure.lock().unwrap().clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl<T: Fixture> CrudTransport<T> for MemoryTransport<T> {
    async fn fetch_all(&self, params: &ListParams) -> Result<ListResponse<T>, ApiError> {
        self.check()?;
        if let Some(error) = self.list_failure.lock().unwrap().clone() {
            return Err(error);
        }
        let items = self.items.lock().unwrap();
        let total = items.len() as u64;

        let Some(limit) = params.limit else {
            return Ok(ListResponse::new(items.clone()));
        };

        let page = params.page.unwrap_or(1).max(1);
        let start = ((page - 1) * limit) as usize;
        let data = items.iter().skip(start).take(limit as usize).cloned().collect();

        Ok(ListResponse {
            data,
            pagination: Some(Pagination {
                page: u64::from(page),
                limit: u64::from(limit),
                total,
                total_pages: total.div_ceil(u64::from(limit.max(1))),
            }),
        })
    }

    async fn fetch_by_id(&self, id: Uuid) -> Result<T, ApiError> {
        self.check()?;
        self.items
            .lock()
            .unwrap()
            .iter()
            .find(|item| item.id() == id)
            .cloned()
            .ok_or_else(not_found)
    }

    async fn create(&self, data: &T::Create) -> Result<T, ApiError> {
        self.check()?;
        let item = T::build(data);
        self.items.lock().unwrap().push(item.clone());
        Ok(item)
    }

    async fn update(&self, id: Uuid, data: &T::Update) -> Result<T, ApiError> {
        self.check()?;
        let mut items = self.items.lock().unwrap();
        let item = items.iter_mut().find(|item| item.id() == id).ok_or_else(not_found)?;
        item.apply(data);
        Ok(item.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<(), ApiError> {
        self.check()?;
        let mut items = self.items.lock().unwrap();
        let before = items.len();
        items.retain(|item| item.id() != id);
        if items.len() == before {
            return Err(not_found());
        }
        Ok(())
    }
}

fn user(first_name: &str, last_name: &str, email: &str) -> UserSummary {
    UserSummary {
        id: Uuid::new_v4(),
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        email: email.to_string(),
    }
}

pub fn trainer_summary(id: Uuid) -> TrainerSummary {
    TrainerSummary {
        id,
        first_name: "Sarah".to_string(),
        last_name: "Lee".to_string(),
        specialty: Some("Strength Training".to_string()),
    }
}

/// Client created `age_days` after the base time
pub fn client(first_name: &str, last_name: &str, trainer_id: Option<Uuid>, age_days: i64) -> ClientWithRelations {
    let email = format!("{}.{}@example.com", first_name, last_name).to_lowercase();
    let user = user(first_name, last_name, &email);
    let created_at = base_time() + Duration::days(age_days);

    ClientWithRelations {
        id: Uuid::new_v4(),
        user_id: user.id,
        trainer_id,
        goals: None,
        activity_level: None,
        created_at,
        updated_at: created_at,
        user,
        trainer: trainer_id.map(trainer_summary),
        latest_progress: None,
        progress_count: 0,
        meal_plan_count: 0,
        workout_plan_count: 0,
    }
}

impl Fixture for ClientWithRelations {
    fn build(data: &CreateClient) -> Self {
        let mut created = client("New", "Client", data.trainer_id, 0);
        created.user_id = data.user_id;
        created.user.id = data.user_id;
        created.goals = data.goals.clone();
        created.activity_level = data.activity_level;
        created.created_at = Utc::now();
        created.updated_at = created.created_at;
        created
    }

    fn apply(&mut self, data: &UpdateClient) {
        if let Some(trainer_id) = data.trainer_id {
            self.trainer_id = trainer_id;
            self.trainer = trainer_id.map(trainer_summary);
        }
        if let Some(goals) = &data.goals {
            self.goals = Some(goals.clone());
        }
        if let Some(level) = data.activity_level {
            self.activity_level = Some(level);
        }
        self.updated_at = Utc::now();
    }
}

pub fn trainer(
    first_name: &str,
    last_name: &str,
    specialty: Option<&str>,
    average_rating: Option<f64>,
    client_count: i64,
) -> TrainerWithRelations {
    let email = format!("{}@example.com", first_name).to_lowercase();
    let user = user(first_name, last_name, &email);

    TrainerWithRelations {
        id: Uuid::new_v4(),
        user_id: user.id,
        specialty: specialty.map(str::to_string),
        experience: Some(5),
        bio: None,
        created_at: base_time(),
        updated_at: base_time(),
        user,
        average_rating,
        client_count,
        appointment_count: 0,
        feedback_count: 0,
    }
}

impl Fixture for TrainerWithRelations {
    fn build(data: &CreateTrainer) -> Self {
        let mut created = trainer("New", "Trainer", data.specialty.as_deref(), None, 0);
        created.user_id = data.user_id;
        created.experience = data.experience;
        created.bio = data.bio.clone();
        created
    }

    fn apply(&mut self, data: &UpdateTrainer) {
        if let Some(specialty) = &data.specialty {
            self.specialty = Some(specialty.clone());
        }
        if let Some(experience) = data.experience {
            self.experience = Some(experience);
        }
        if let Some(bio) = &data.bio {
            self.bio = Some(bio.clone());
        }
    }
}

pub fn feedback(rating: i32, trainer_id: Uuid, age_days: i64) -> FeedbackWithRelations {
    let client = user("John", "Doe", "john.doe@example.com");
    let created_at = base_time() + Duration::days(age_days);

    FeedbackWithRelations {
        id: Uuid::new_v4(),
        user_id: client.id,
        trainer_id,
        rating,
        comment: None,
        created_at,
        updated_at: created_at,
        client,
        trainer: trainer_summary(trainer_id),
    }
}

impl Fixture for FeedbackWithRelations {
    fn build(data: &CreateFeedback) -> Self {
        let mut created = feedback(data.rating, data.trainer_id, 0);
        created.comment = data.comment.clone();
        created
    }

    fn apply(&mut self, data: &UpdateFeedback) {
        if let Some(rating) = data.rating {
            self.rating = rating;
        }
        if let Some(comment) = &data.comment {
            self.comment = Some(comment.clone());
        }
    }
}
