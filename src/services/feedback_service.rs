use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{
    like_pattern, search_term, FeedbackQuery, FeedbackRow, FeedbackWithRelations, ListResponse,
    Paging, UpdateFeedbackRequest, MAX_RATING, MIN_RATING,
};

const FEEDBACK_FROM: &str = r#"
    FROM feedbacks f
    JOIN users cu ON cu.id = f.user_id
    JOIN trainers t ON t.id = f.trainer_id
    JOIN users tu ON tu.id = t.user_id"#;

const FEEDBACK_SELECT: &str = r#"
    SELECT f.id, f.user_id, f.trainer_id, f.rating, f.comment, f.created_at, f.updated_at,
           cu.first_name AS client_first_name, cu.last_name AS client_last_name,
           cu.email AS client_email,
           tu.first_name AS trainer_first_name, tu.last_name AS trainer_last_name,
           t.specialty AS trainer_specialty"#;

/// Feedback left by a client's user for a trainer
#[derive(Debug, Clone)]
pub struct NewFeedback {
    pub user_id: Uuid,
    pub trainer_id: Uuid,
    pub rating: i32,
    pub comment: Option<String>,
}

#[derive(Clone)]
pub struct FeedbackService {
    db: PgPool,
}

impl FeedbackService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    pub async fn list(&self, query: &FeedbackQuery) -> AppResult<ListResponse<FeedbackWithRelations>> {
        let paging = Paging::new(query.page, query.limit);

        let mut count = QueryBuilder::new("SELECT COUNT(*)");
        count.push(FEEDBACK_FROM);
        push_filters(&mut count, query);
        let total: i64 = count.build_query_scalar().fetch_one(&self.db).await?;

        let mut builder = QueryBuilder::new(FEEDBACK_SELECT);
        builder.push(FEEDBACK_FROM);
        push_filters(&mut builder, query);
        builder.push(format!(
            " ORDER BY {} {}, f.created_at DESC",
            sort_column(query.sort.as_deref()),
            query.order.as_sql()
        ));
        paging.push_to(&mut builder);

        let rows = builder.build_query_as::<FeedbackRow>().fetch_all(&self.db).await?;
        let feedbacks = rows.into_iter().map(FeedbackWithRelations::from).collect();
        Ok(ListResponse::new(feedbacks, paging, total))
    }

    pub async fn get(&self, id: Uuid) -> AppResult<FeedbackWithRelations> {
        sqlx::query_as::<_, FeedbackRow>(&format!(
            "{}{} WHERE f.id = $1",
            FEEDBACK_SELECT, FEEDBACK_FROM
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .map(FeedbackWithRelations::from)
        .ok_or(AppError::NotFound("Feedback"))
    }

    pub async fn create(&self, feedback: NewFeedback) -> AppResult<FeedbackWithRelations> {
        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO feedbacks (user_id, trainer_id, rating, comment)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(feedback.user_id)
        .bind(feedback.trainer_id)
        .bind(feedback.rating)
        .bind(feedback.comment)
        .fetch_one(&self.db)
        .await?;

        tracing::info!(
            feedback_id = %id,
            trainer_id = %feedback.trainer_id,
            rating = feedback.rating,
            "Recorded feedback"
        );
        self.get(id).await
    }

    pub async fn update(
        &self,
        id: Uuid,
        request: UpdateFeedbackRequest,
    ) -> AppResult<FeedbackWithRelations> {
        let mut builder = QueryBuilder::<Postgres>::new("UPDATE feedbacks SET updated_at = NOW()");

        if let Some(rating) = request.rating {
            builder.push(", rating = ").push_bind(rating);
        }
        if let Some(comment) = request.comment {
            builder.push(", comment = ").push_bind(comment);
        }

        builder.push(" WHERE id = ").push_bind(id).push(" RETURNING id");

        builder
            .build_query_scalar::<Uuid>()
            .fetch_optional(&self.db)
            .await?
            .ok_or(AppError::NotFound("Feedback"))?;

        self.get(id).await
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM feedbacks WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Feedback"));
        }

        tracing::info!(feedback_id = %id, "Deleted feedback");
        Ok(())
    }
}

fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, query: &FeedbackQuery) {
    builder.push(" WHERE TRUE");

    if let Some(trainer_id) = query.trainer_id {
        builder.push(" AND f.trainer_id = ").push_bind(trainer_id);
    }
    if let Some(user_id) = query.user_id {
        builder.push(" AND f.user_id = ").push_bind(user_id);
    }
    if let Some(min_rating) = query.min_rating {
        builder
            .push(" AND f.rating >= ")
            .push_bind(min_rating.clamp(MIN_RATING, MAX_RATING));
    }
    if let Some(term) = search_term(&query.search) {
        let pattern = like_pattern(term);
        builder
            .push(" AND (cu.first_name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR cu.last_name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR tu.first_name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR tu.last_name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR f.comment ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
}

fn sort_column(sort: Option<&str>) -> &'static str {
    match sort {
        Some("rating") => "f.rating",
        Some("trainer") => "LOWER(tu.first_name || ' ' || tu.last_name)",
        _ => "f.created_at",
    }
}
