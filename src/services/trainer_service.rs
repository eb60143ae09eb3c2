use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{
    like_pattern, search_term, CreateTrainerRequest, ListResponse, Paging, TrainerQuery,
    TrainerRow, TrainerWithRelations, UpdateTrainerRequest,
};

const TRAINER_SELECT: &str = r#"
    SELECT t.id, t.user_id, t.specialty, t.experience, t.bio, t.created_at, t.updated_at,
           u.first_name, u.last_name, u.email,
           (SELECT AVG(f.rating)::DOUBLE PRECISION FROM feedbacks f WHERE f.trainer_id = t.id) AS average_rating,
           (SELECT COUNT(*) FROM clients c WHERE c.trainer_id = t.id) AS client_count,
           (SELECT COUNT(*) FROM appointments a WHERE a.trainer_id = t.id) AS appointment_count,
           (SELECT COUNT(*) FROM feedbacks f WHERE f.trainer_id = t.id) AS feedback_count
    FROM trainers t
    JOIN users u ON u.id = t.user_id"#;

#[derive(Clone)]
pub struct TrainerService {
    db: PgPool,
}

impl TrainerService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    pub async fn list(&self, query: &TrainerQuery) -> AppResult<ListResponse<TrainerWithRelations>> {
        let paging = Paging::new(query.page, query.limit);

        let mut count =
            QueryBuilder::new("SELECT COUNT(*) FROM trainers t JOIN users u ON u.id = t.user_id");
        push_filters(&mut count, query);
        let total: i64 = count.build_query_scalar().fetch_one(&self.db).await?;

        let mut builder = QueryBuilder::new(TRAINER_SELECT);
        push_filters(&mut builder, query);
        builder.push(format!(
            " ORDER BY {} {} NULLS LAST",
            sort_column(query.sort.as_deref()),
            query.order.as_sql()
        ));
        paging.push_to(&mut builder);

        let rows = builder.build_query_as::<TrainerRow>().fetch_all(&self.db).await?;
        let trainers = rows.into_iter().map(TrainerWithRelations::from).collect();
        Ok(ListResponse::new(trainers, paging, total))
    }

    pub async fn get(&self, id: Uuid) -> AppResult<TrainerWithRelations> {
        sqlx::query_as::<_, TrainerRow>(&format!("{} WHERE t.id = $1", TRAINER_SELECT))
            .bind(id)
            .fetch_optional(&self.db)
            .await?
            .map(TrainerWithRelations::from)
            .ok_or(AppError::NotFound("Trainer"))
    }

    pub async fn create(&self, request: CreateTrainerRequest) -> AppResult<TrainerWithRelations> {
        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO trainers (user_id, specialty, experience, bio)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(request.user_id)
        .bind(request.specialty)
        .bind(request.experience)
        .bind(request.bio)
        .fetch_one(&self.db)
        .await?;

        tracing::info!(trainer_id = %id, user_id = %request.user_id, "Created trainer");
        self.get(id).await
    }

    pub async fn update(
        &self,
        id: Uuid,
        request: UpdateTrainerRequest,
    ) -> AppResult<TrainerWithRelations> {
        let mut builder = QueryBuilder::<Postgres>::new("UPDATE trainers SET updated_at = NOW()");

        if let Some(specialty) = request.specialty {
            builder.push(", specialty = ").push_bind(specialty);
        }
        if let Some(experience) = request.experience {
            builder.push(", experience = ").push_bind(experience);
        }
        if let Some(bio) = request.bio {
            builder.push(", bio = ").push_bind(bio);
        }

        builder.push(" WHERE id = ").push_bind(id).push(" RETURNING id");

        builder
            .build_query_scalar::<Uuid>()
            .fetch_optional(&self.db)
            .await?
            .ok_or(AppError::NotFound("Trainer"))?;

        self.get(id).await
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM trainers WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Trainer"));
        }

        tracing::info!(trainer_id = %id, "Deleted trainer");
        Ok(())
    }
}

fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, query: &TrainerQuery) {
    builder.push(" WHERE TRUE");

    if let Some(specialty) = search_term(&query.specialty) {
        builder
            .push(" AND LOWER(t.specialty) = LOWER(")
            .push_bind(specialty.to_string())
            .push(")");
    }
    if let Some(term) = search_term(&query.search) {
        let pattern = like_pattern(term);
        builder
            .push(" AND (u.first_name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR u.last_name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR u.email ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR t.specialty ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
}

fn sort_column(sort: Option<&str>) -> &'static str {
    match sort {
        Some("name") => "LOWER(u.first_name || ' ' || u.last_name)",
        Some("experience") => "t.experience",
        Some("rating") | Some("averageRating") => "average_rating",
        Some("clients") | Some("clientCount") => "client_count",
        Some("specialty") => "LOWER(t.specialty)",
        _ => "t.created_at",
    }
}
