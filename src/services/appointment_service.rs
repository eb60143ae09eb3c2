use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{
    validate_time_range, Appointment, AppointmentQuery, AppointmentStatus,
    CreateAppointmentRequest, ListResponse, Paging, UpdateAppointmentRequest,
};

const APPOINTMENT_COLUMNS: &str =
    "id, client_id, trainer_id, start_time, end_time, status, notes, created_at, updated_at";

#[derive(Clone)]
pub struct AppointmentService {
    db: PgPool,
}

impl AppointmentService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    pub async fn list(&self, query: &AppointmentQuery) -> AppResult<ListResponse<Appointment>> {
        let paging = Paging::new(query.page, query.limit);

        let mut count = QueryBuilder::new("SELECT COUNT(*) FROM appointments");
        push_filters(&mut count, query);
        let total: i64 = count.build_query_scalar().fetch_one(&self.db).await?;

        let mut builder =
            QueryBuilder::new(format!("SELECT {} FROM appointments", APPOINTMENT_COLUMNS));
        push_filters(&mut builder, query);
        builder.push(format!(" ORDER BY start_time {}", query.order.as_sql()));
        paging.push_to(&mut builder);

        let appointments = builder.build_query_as::<Appointment>().fetch_all(&self.db).await?;
        Ok(ListResponse::new(appointments, paging, total))
    }

    pub async fn get(&self, id: Uuid) -> AppResult<Appointment> {
        sqlx::query_as::<_, Appointment>(&format!(
            "SELECT {} FROM appointments WHERE id = $1",
            APPOINTMENT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or(AppError::NotFound("Appointment"))
    }

    pub async fn create(&self, request: CreateAppointmentRequest) -> AppResult<Appointment> {
        validate_time_range(request.start_time, request.end_time)?;

        let appointment = sqlx::query_as::<_, Appointment>(&format!(
            r#"
            INSERT INTO appointments (client_id, trainer_id, start_time, end_time, status, notes)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            APPOINTMENT_COLUMNS
        ))
        .bind(request.client_id)
        .bind(request.trainer_id)
        .bind(request.start_time)
        .bind(request.end_time)
        .bind(request.status.unwrap_or(AppointmentStatus::Scheduled))
        .bind(request.notes)
        .fetch_one(&self.db)
        .await?;

        tracing::info!(
            appointment_id = %appointment.id,
            trainer_id = %appointment.trainer_id,
            "Booked appointment"
        );
        Ok(appointment)
    }

    /// Rescheduling checks the merged window against the stored one
    pub async fn update(
        &self,
        id: Uuid,
        request: UpdateAppointmentRequest,
    ) -> AppResult<Appointment> {
        if request.start_time.is_some() || request.end_time.is_some() {
            let existing = self.get(id).await?;
            validate_time_range(
                request.start_time.unwrap_or(existing.start_time),
                request.end_time.unwrap_or(existing.end_time),
            )?;
        }

        let mut builder =
            QueryBuilder::<Postgres>::new("UPDATE appointments SET updated_at = NOW()");

        if let Some(trainer_id) = request.trainer_id {
            builder.push(", trainer_id = ").push_bind(trainer_id);
        }
        if let Some(start_time) = request.start_time {
            builder.push(", start_time = ").push_bind(start_time);
        }
        if let Some(end_time) = request.end_time {
            builder.push(", end_time = ").push_bind(end_time);
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
            .push(format!(" RETURNING {}", APPOINTMENT_COLUMNS));

        builder
            .build_query_as::<Appointment>()
            .fetch_optional(&self.db)
            .await?
            .ok_or(AppError::NotFound("Appointment"))
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM appointments WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Appointment"));
        }
        Ok(())
    }
}

fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, query: &AppointmentQuery) {
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
