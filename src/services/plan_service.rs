use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{
    validate_date_range, CreateMealPlanRequest, CreateWorkoutPlanRequest, ListResponse, MealPlan,
    Paging, PlanQuery, UpdateMealPlanRequest, UpdateWorkoutPlanRequest, WorkoutPlan,
};

const MEAL_PLAN_COLUMNS: &str = "id, user_id, name, description, daily_calories, is_active, \
     start_date, end_date, created_at, updated_at";

const WORKOUT_PLAN_COLUMNS: &str = "id, user_id, name, description, difficulty, is_active, \
     start_date, end_date, created_at, updated_at";

/// Meal and workout plans share ownership, activity and date-range rules
#[derive(Clone)]
pub struct PlanService {
    db: PgPool,
}

impl PlanService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    pub async fn list_meal_plans(&self, query: &PlanQuery) -> AppResult<ListResponse<MealPlan>> {
        let paging = Paging::new(query.page, query.limit);
        let total = self.count("meal_plans", query).await?;

        let mut builder =
            QueryBuilder::new(format!("SELECT {} FROM meal_plans", MEAL_PLAN_COLUMNS));
        push_filters(&mut builder, query);
        builder.push(format!(
            " ORDER BY {} {}",
            query.order_column(),
            query.order.as_sql()
        ));
        paging.push_to(&mut builder);

        let plans = builder.build_query_as::<MealPlan>().fetch_all(&self.db).await?;
        Ok(ListResponse::new(plans, paging, total))
    }

    pub async fn get_meal_plan(&self, id: Uuid) -> AppResult<MealPlan> {
        sqlx::query_as::<_, MealPlan>(&format!(
            "SELECT {} FROM meal_plans WHERE id = $1",
            MEAL_PLAN_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or(AppError::NotFound("Meal plan"))
    }

    pub async fn create_meal_plan(&self, request: CreateMealPlanRequest) -> AppResult<MealPlan> {
        validate_date_range(request.start_date, request.end_date)?;

        let plan = sqlx::query_as::<_, MealPlan>(&format!(
            r#"
            INSERT INTO meal_plans (user_id, name, description, daily_calories, is_active, start_date, end_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            MEAL_PLAN_COLUMNS
        ))
        .bind(request.user_id)
        .bind(request.name.trim())
        .bind(request.description)
        .bind(request.daily_calories)
        .bind(request.is_active.unwrap_or(true))
        .bind(request.start_date)
        .bind(request.end_date)
        .fetch_one(&self.db)
        .await?;

        tracing::info!(meal_plan_id = %plan.id, user_id = %plan.user_id, "Created meal plan");
        Ok(plan)
    }

    pub async fn update_meal_plan(
        &self,
        id: Uuid,
        request: UpdateMealPlanRequest,
    ) -> AppResult<MealPlan> {
        let existing = self.get_meal_plan(id).await?;
        validate_date_range(
            request.start_date.or(existing.start_date),
            request.end_date.or(existing.end_date),
        )?;

        let mut builder = QueryBuilder::<Postgres>::new("UPDATE meal_plans SET updated_at = NOW()");

        if let Some(name) = request.name {
            builder.push(", name = ").push_bind(name.trim().to_string());
        }
        if let Some(description) = request.description {
            builder.push(", description = ").push_bind(description);
        }
        if let Some(daily_calories) = request.daily_calories {
            builder.push(", daily_calories = ").push_bind(daily_calories);
        }
        if let Some(is_active) = request.is_active {
            builder.push(", is_active = ").push_bind(is_active);
        }
        if let Some(start_date) = request.start_date {
            builder.push(", start_date = ").push_bind(start_date);
        }
        if let Some(end_date) = request.end_date {
            builder.push(", end_date = ").push_bind(end_date);
        }

        builder
            .push(" WHERE id = ")
            .push_bind(id)
            .push(format!(" RETURNING {}", MEAL_PLAN_COLUMNS));

        builder
            .build_query_as::<MealPlan>()
            .fetch_optional(&self.db)
            .await?
            .ok_or(AppError::NotFound("Meal plan"))
    }

    pub async fn delete_meal_plan(&self, id: Uuid) -> AppResult<()> {
        self.delete_from("meal_plans", id, "Meal plan").await
    }

    pub async fn list_workout_plans(&self, query: &PlanQuery) -> AppResult<ListResponse<WorkoutPlan>> {
        let paging = Paging::new(query.page, query.limit);
        let total = self.count("workout_plans", query).await?;

        let mut builder =
            QueryBuilder::new(format!("SELECT {} FROM workout_plans", WORKOUT_PLAN_COLUMNS));
        push_filters(&mut builder, query);
        builder.push(format!(
            " ORDER BY {} {}",
            query.order_column(),
            query.order.as_sql()
        ));
        paging.push_to(&mut builder);

        let plans = builder.build_query_as::<WorkoutPlan>().fetch_all(&self.db).await?;
        Ok(ListResponse::new(plans, paging, total))
    }

    pub async fn get_workout_plan(&self, id: Uuid) -> AppResult<WorkoutPlan> {
        sqlx::query_as::<_, WorkoutPlan>(&format!(
            "SELECT {} FROM workout_plans WHERE id = $1",
            WORKOUT_PLAN_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or(AppError::NotFound("Workout plan"))
    }

    pub async fn create_workout_plan(
        &self,
        request: CreateWorkoutPlanRequest,
    ) -> AppResult<WorkoutPlan> {
        validate_date_range(request.start_date, request.end_date)?;

        let plan = sqlx::query_as::<_, WorkoutPlan>(&format!(
            r#"
            INSERT INTO workout_plans (user_id, name, description, difficulty, is_active, start_date, end_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            WORKOUT_PLAN_COLUMNS
        ))
        .bind(request.user_id)
        .bind(request.name.trim())
        .bind(request.description)
        .bind(request.difficulty)
        .bind(request.is_active.unwrap_or(true))
        .bind(request.start_date)
        .bind(request.end_date)
        .fetch_one(&self.db)
        .await?;

        tracing::info!(workout_plan_id = %plan.id, user_id = %plan.user_id, "Created workout plan");
        Ok(plan)
    }

    pub async fn update_workout_plan(
        &self,
        id: Uuid,
        request: UpdateWorkoutPlanRequest,
    ) -> AppResult<WorkoutPlan> {
        let existing = self.get_workout_plan(id).await?;
        validate_date_range(
            request.start_date.or(existing.start_date),
            request.end_date.or(existing.end_date),
        )?;

        let mut builder =
            QueryBuilder::<Postgres>::new("UPDATE workout_plans SET updated_at = NOW()");

        if let Some(name) = request.name {
            builder.push(", name = ").push_bind(name.trim().to_string());
        }
        if let Some(description) = request.description {
            builder.push(", description = ").push_bind(description);
        }
        if let Some(difficulty) = request.difficulty {
            builder.push(", difficulty = ").push_bind(difficulty);
        }
        if let Some(is_active) = request.is_active {
            builder.push(", is_active = ").push_bind(is_active);
        }
        if let Some(start_date) = request.start_date {
            builder.push(", start_date = ").push_bind(start_date);
        }
        if let Some(end_date) = request.end_date {
            builder.push(", end_date = ").push_bind(end_date);
        }

        builder
            .push(" WHERE id = ")
            .push_bind(id)
            .push(format!(" RETURNING {}", WORKOUT_PLAN_COLUMNS));

        builder
            .build_query_as::<WorkoutPlan>()
            .fetch_optional(&self.db)
            .await?
            .ok_or(AppError::NotFound("Workout plan"))
    }

    pub async fn delete_workout_plan(&self, id: Uuid) -> AppResult<()> {
        self.delete_from("workout_plans", id, "Workout plan").await
    }

    async fn count(&self, table: &'static str, query: &PlanQuery) -> AppResult<i64> {
        let mut count = QueryBuilder::new(format!("SELECT COUNT(*) FROM {}", table));
        push_filters(&mut count, query);
        Ok(count.build_query_scalar().fetch_one(&self.db).await?)
    }

    async fn delete_from(&self, table: &'static str, id: Uuid, entity: &'static str) -> AppResult<()> {
        let result = sqlx::query(&format!("DELETE FROM {} WHERE id = $1", table))
            .bind(id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(entity));
        }

        tracing::info!(plan_id = %id, table, "Deleted plan");
        Ok(())
    }
}

fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, query: &PlanQuery) {
    builder.push(" WHERE TRUE");

    if let Some(user_id) = query.user_id {
        builder.push(" AND user_id = ").push_bind(user_id);
    }
    if let Some(is_active) = query.is_active {
        builder.push(" AND is_active = ").push_bind(is_active);
    }
}
