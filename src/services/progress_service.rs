use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{
    calculate_bmi, CreateProgressRequest, ListResponse, Paging, Progress, ProgressQuery,
    UpdateProgressRequest,
};

const PROGRESS_COLUMNS: &str =
    "id, client_id, weight, height, bmi, body_fat, date, notes, created_at, updated_at";

#[derive(Clone)]
pub struct ProgressService {
    db: PgPool,
}

impl ProgressService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    pub async fn list(&self, query: &ProgressQuery) -> AppResult<ListResponse<Progress>> {
        let paging = Paging::new(query.page, query.limit);

        let mut count = QueryBuilder::new("SELECT COUNT(*) FROM progress");
        push_filters(&mut count, query);
        let total: i64 = count.build_query_scalar().fetch_one(&self.db).await?;

        let mut builder = QueryBuilder::new(format!("SELECT {} FROM progress", PROGRESS_COLUMNS));
        push_filters(&mut builder, query);
        let order = query.order.as_sql();
        builder.push(format!(" ORDER BY date {order}, created_at {order}"));
        paging.push_to(&mut builder);

        let records = builder.build_query_as::<Progress>().fetch_all(&self.db).await?;
        Ok(ListResponse::new(records, paging, total))
    }

    pub async fn get(&self, id: Uuid) -> AppResult<Progress> {
        sqlx::query_as::<_, Progress>(&format!(
            "SELECT {} FROM progress WHERE id = $1",
            PROGRESS_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or(AppError::NotFound("Progress record"))
    }

    pub async fn create(&self, request: CreateProgressRequest) -> AppResult<Progress> {
        let bmi = request.resolved_bmi();

        let record = sqlx::query_as::<_, Progress>(&format!(
            r#"
            INSERT INTO progress (client_id, weight, height, bmi, body_fat, date, notes)
            VALUES ($1, $2, $3, $4, $5, COALESCE($6, CURRENT_DATE), $7)
            RETURNING {}
            "#,
            PROGRESS_COLUMNS
        ))
        .bind(request.client_id)
        .bind(request.weight)
        .bind(request.height)
        .bind(bmi)
        .bind(request.body_fat)
        .bind(request.date)
        .bind(request.notes)
        .fetch_one(&self.db)
        .await?;

        tracing::info!(progress_id = %record.id, client_id = %record.client_id, "Recorded progress");
        Ok(record)
    }

    /// Changing weight or height without an explicit BMI recomputes it
    pub async fn update(&self, id: Uuid, request: UpdateProgressRequest) -> AppResult<Progress> {
        let existing = self.get(id).await?;

        let bmi = match request.bmi {
            Some(bmi) => Some(bmi),
            None if request.weight.is_some() || request.height.is_some() => {
                match (
                    request.weight.or(existing.weight),
                    request.height.or(existing.height),
                ) {
                    (Some(weight), Some(height)) => Some(calculate_bmi(weight, height)),
                    _ => None,
                }
            }
            None => None,
        };

        let mut builder = QueryBuilder::<Postgres>::new("UPDATE progress SET updated_at = NOW()");

        if let Some(weight) = request.weight {
            builder.push(", weight = ").push_bind(weight);
        }
        if let Some(height) = request.height {
            builder.push(", height = ").push_bind(height);
        }
        if let Some(bmi) = bmi {
            builder.push(", bmi = ").push_bind(bmi);
        }
        if let Some(body_fat) = request.body_fat {
            builder.push(", body_fat = ").push_bind(body_fat);
        }
        if let Some(date) = request.date {
            builder.push(", date = ").push_bind(date);
        }
        if let Some(notes) = request.notes {
            builder.push(", notes = ").push_bind(notes);
        }

        builder
            .push(" WHERE id = ")
            .push_bind(id)
            .push(format!(" RETURNING {}", PROGRESS_COLUMNS));

        builder
            .build_query_as::<Progress>()
            .fetch_optional(&self.db)
            .await?
            .ok_or(AppError::NotFound("Progress record"))
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM progress WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Progress record"));
        }
        Ok(())
    }
}

fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, query: &ProgressQuery) {
    builder.push(" WHERE TRUE");

    if let Some(client_id) = query.client_id {
        builder.push(" AND client_id = ").push_bind(client_id);
    }
}
