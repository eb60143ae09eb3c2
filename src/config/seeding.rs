use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate, Utc};
use sqlx::PgPool;

use crate::models::*;
use crate::services::*;

/// Populates an empty database with a small gym: one admin, two trainers,
/// three clients (one unassigned) and some history for each.
pub struct DatabaseSeeder {
    pool: PgPool,
}

impl DatabaseSeeder {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns the admin account, creating the demo data first if the
    /// users table is empty
    pub async fn seed_all(&self) -> Result<User> {
        let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        if existing > 0 {
            tracing::info!("Database already contains {} users, skipping demo seed", existing);
            return self.find_admin().await;
        }

        tracing::info!("Starting database seeding...");

        let admin = self.seed_users().await?;
        let trainers = self.seed_trainers().await?;
        let clients = self.seed_clients(&trainers).await?;
        self.seed_history(&trainers, &clients).await?;

        tracing::info!("Database seeding completed!");
        Ok(admin)
    }

    async fn find_admin(&self) -> Result<User> {
        let users = UserService::new(self.pool.clone())
            .list(&UserQuery {
                role: Some(UserRole::Admin),
                limit: Some(1),
                ..Default::default()
            })
            .await?;

        users
            .data
            .into_iter()
            .next()
            .context("No admin user found in a non-empty database")
    }

    async fn seed_users(&self) -> Result<User> {
        let user_service = UserService::new(self.pool.clone());

        let admin = user_service
            .create(new_user("admin@gym.example.com", "Ada", "Admin", UserRole::Admin))
            .await?;
        tracing::info!("Created demo admin {}", admin.email);

        Ok(admin)
    }

    async fn seed_trainers(&self) -> Result<Vec<TrainerWithRelations>> {
        let user_service = UserService::new(self.pool.clone());
        let trainer_service = TrainerService::new(self.pool.clone());

        let demo_trainers = [
            ("sarah.lee@gym.example.com", "Sarah", "Lee", "Strength Training", 8),
            ("marco.rossi@gym.example.com", "Marco", "Rossi", "Yoga", 4),
        ];

        let mut trainers = Vec::with_capacity(demo_trainers.len());
        for (email, first_name, last_name, specialty, experience) in demo_trainers {
            let user = user_service
                .create(new_user(email, first_name, last_name, UserRole::Trainer))
                .await?;
            let trainer = trainer_service
                .create(CreateTrainerRequest {
                    user_id: user.id,
                    specialty: Some(specialty.to_string()),
                    experience: Some(experience),
                    bio: Some(format!("{} coach with {} years on the floor", specialty, experience)),
                })
                .await?;
            trainers.push(trainer);
        }

        tracing::info!("Created {} demo trainers", trainers.len());
        Ok(trainers)
    }

    async fn seed_clients(&self, trainers: &[TrainerWithRelations]) -> Result<Vec<ClientWithRelations>> {
        let user_service = UserService::new(self.pool.clone());
        let client_service = ClientService::new(self.pool.clone());

        let demo_clients = [
            ("john.doe@example.com", "John", "Doe", "Lose 8kg before summer", ActivityLevel::Light, Some(0)),
            ("jane.smith@example.com", "Jane", "Smith", "Run a half marathon", ActivityLevel::Active, Some(1)),
            ("mike.brown@example.com", "Mike", "Brown", "Build upper body strength", ActivityLevel::Sedentary, None),
        ];

        let mut clients = Vec::with_capacity(demo_clients.len());
        for (email, first_name, last_name, goals, activity_level, trainer) in demo_clients {
            let user = user_service
                .create(new_user(email, first_name, last_name, UserRole::Client))
                .await?;
            let client = client_service
                .create(CreateClientRequest {
                    user_id: user.id,
                    trainer_id: trainer.and_then(|index| trainers.get(index)).map(|t| t.id),
                    goals: Some(goals.to_string()),
                    activity_level: Some(activity_level),
                })
                .await?;
            clients.push(client);
        }

        tracing::info!("Created {} demo clients", clients.len());
        Ok(clients)
    }

    async fn seed_history(
        &self,
        trainers: &[TrainerWithRelations],
        clients: &[ClientWithRelations],
    ) -> Result<()> {
        let progress_service = ProgressService::new(self.pool.clone());
        let plan_service = PlanService::new(self.pool.clone());
        let feedback_service = FeedbackService::new(self.pool.clone());
        let appointment_service = AppointmentService::new(self.pool.clone());
        let notification_service = NotificationService::new(self.pool.clone());

        let today = Utc::now().date_naive();

        for (index, client) in clients.iter().enumerate() {
            let start_weight = 92.0 - index as f64 * 12.0;
            for week in 0..4i64 {
                progress_service
                    .create(CreateProgressRequest {
                        client_id: client.id,
                        weight: Some(start_weight - week as f64 * 0.6),
                        height: Some(178.0 - index as f64 * 6.0),
                        bmi: None,
                        body_fat: Some(24.0 - week as f64 * 0.4),
                        date: Some(today - Duration::weeks(3 - week)),
                        notes: None,
                    })
                    .await?;
            }

            plan_service
                .create_meal_plan(CreateMealPlanRequest {
                    user_id: client.user_id,
                    name: "Balanced cut".to_string(),
                    description: Some("High protein, moderate carbs".to_string()),
                    daily_calories: Some(2200 - index as i32 * 150),
                    is_active: Some(true),
                    start_date: Some(today - Duration::weeks(3)),
                    end_date: NaiveDate::from_ymd_opt(2099, 1, 1),
                })
                .await?;

            plan_service
                .create_workout_plan(CreateWorkoutPlanRequest {
                    user_id: client.user_id,
                    name: "Full body 3x per week".to_string(),
                    description: None,
                    difficulty: Some(WorkoutDifficulty::Beginner),
                    is_active: Some(true),
                    start_date: Some(today - Duration::weeks(3)),
                    end_date: None,
                })
                .await?;

            let Some(trainer_id) = client.trainer_id else {
                continue;
            };

            feedback_service
                .create(NewFeedback {
                    user_id: client.user_id,
                    trainer_id,
                    rating: 5 - index as i32,
                    comment: Some("Great sessions, very motivating".to_string()),
                })
                .await?;

            let start_time = Utc::now() + Duration::days(2 + index as i64);
            appointment_service
                .create(CreateAppointmentRequest {
                    client_id: client.id,
                    trainer_id,
                    start_time,
                    end_time: start_time + Duration::minutes(60),
                    status: None,
                    notes: None,
                })
                .await?;

            notification_service
                .create(CreateNotificationRequest {
                    user_id: client.user_id,
                    title: "Upcoming session".to_string(),
                    message: format!("Your next session is on {}", start_time.format("%A %d %B")),
                })
                .await?;
        }

        tracing::info!("Seeded history for {} clients and {} trainers", clients.len(), trainers.len());
        Ok(())
    }
}

fn new_user(email: &str, first_name: &str, last_name: &str, role: UserRole) -> CreateUserRequest {
    CreateUserRequest {
        email: email.to_string(),
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        role: Some(role),
        phone: None,
    }
}
