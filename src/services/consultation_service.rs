use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{
    Consultation, ConsultationQuery, ConsultationStatus, CreateConsultationRequest, ListResponse,
    Paging, UpdateConsultationRequest,
};

const CONSULTATION_COLUMNS: &str =
    "id, client_id, trainer_id, scheduled_at, status, notes, created_at, updated_at";

#[derive(Clone)]
pub struct ConsultationService {
    db: PgPool,
}

impl ConsultationService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    pub async fn list(&self, query: &ConsultationQuery) -> AppResult<ListResponse<Consultation>> {
        let paging = Paging::new(query.page, query.limit);

        let mut count = QueryBuilder::new("SELECT COUNT(*) FROM consultations");
        push_filters(&mut count, query);
        let total: i64 = count.build_query_scalar().fetch_one(&self.db).await?;

        let mut builder = QueryBuilder::new(format!(
            "SELECT {} FROM consultations",
            CONSULTATION_COLUMNS
        ));
        push_filters(&mut builder, query);
        builder.push(format!(" ORDER BY scheduled_at {}", query.order.as_sql()));
        paging.push_to(&mut builder);

        let consultations = builder.build_query_as::<Consultation>().fetch_all(&self.db).await?;
        Ok(ListResponse::new(consultations, paging, total))
    }

    pub async fn get(&self, id: Uuid) -> AppResult<Consultation> {
        sqlx::query_as::<_, Consultation>(&format!(
            "SELECT {} FROM consultations WHERE id = $1",
            CONSULTATION_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or(AppError::NotFound("Consultation"))
    }

    pub async fn create(&self, request: CreateConsultationRequest) -> AppResult<Consultation> {
        let consultation = sqlx::query_as::<_, Consultation>(&format!(
            r#"
            INSERT INTO consultations (client_id, trainer_id, scheduled_at, status, notes)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            CONSULTATION_COLUMNS
        ))
        .bind(request.client_id)
        .bind(request.trainer_id)
        .bind(request.scheduled_at)
        .bind(request.status.unwrap_or(ConsultationStatus::Pending))
        .bind(request.notes)
        .fetch_one(&self.db)
        .await?;

        tracing::info!(consultation_id = %consultation.id, "Scheduled consultation");
        Ok(consultation)
    }

    pub async fn update(
        &self,
        id: Uuid,
        request: UpdateConsultationRequest,
    ) -> AppResult<Consultation> {
        let mut builder =
            QueryBuilder::<Postgres>::new("UPDATE consultations SET updated_at = NOW()");

        if let Some(trainer_id) = request.trainer_id {
            builder.push(", trainer_id = ").push_bind(trainer_id);
        }
        if let Some(scheduled_at) = request.scheduled_at {
            builder.push(", scheduled_at = ").push_bind(scheduled_at);
        }
        if let Some(status) = request.status {
            builder.push(", status = ").push_bind(status);
        }
        if let Some(notes) = request.notes {
            builder.push(", notes = ").push_bind(notes);
        }

        builder
            .push(" WHERE id = ")
            .push_bind(id)
            .push(format!(" RETURNING {}", CONSULTATION_COLUMNS));

        builder
            .build_query_as::<Consultation>()
            .fetch_optional(&self.db)
            .await?
            .ok_or(AppError::NotFound("Consultation"))
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM consultations WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Consultation"));
        }
        Ok(())
    }
}

fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, query: &ConsultationQuery) {
    builder.push(" WHERE TRUE");

    if let Some(client_id) = query.client_id {
        builder.push(" AND client_id = ").push_bind(client_id);
    }
    if let Some(trainer_id) = query.trainer_id {
        builder.push(" AND trainer_id = ").push_bind(trainer_id);
    }
    if let Some(status) = query.status {
        builder.push(" AND status = ").push_bind(status);
    }
}
