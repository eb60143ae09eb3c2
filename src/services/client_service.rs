use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{
    like_pattern, search_term, AssignmentStatus, ClientQuery, ClientRow, ClientWithRelations,
    CreateClientRequest, ListResponse, Paging, UpdateClientRequest,
};

const CLIENT_FROM: &str = r#"
    FROM clients c
    JOIN users u ON u.id = c.user_id
    LEFT JOIN trainers t ON t.id = c.trainer_id
    LEFT JOIN users tu ON tu.id = t.user_id"#;

const CLIENT_SELECT: &str = r#"
    SELECT c.id, c.user_id, c.trainer_id, c.goals, c.activity_level, c.created_at, c.updated_at,
           u.first_name, u.last_name, u.email,
           tu.first_name AS trainer_first_name, tu.last_name AS trainer_last_name,
           t.specialty AS trainer_specialty,
           lp.weight AS latest_weight, lp.height AS latest_height, lp.bmi AS latest_bmi,
           lp.body_fat AS latest_body_fat, lp.date AS latest_date,
           (SELECT COUNT(*) FROM progress p WHERE p.client_id = c.id) AS progress_count,
           (SELECT COUNT(*) FROM meal_plans m WHERE m.user_id = c.user_id) AS meal_plan_count,
           (SELECT COUNT(*) FROM workout_plans w WHERE w.user_id = c.user_id) AS workout_plan_count"#;

const LATEST_PROGRESS_JOIN: &str = r#"
    LEFT JOIN LATERAL (
        SELECT p.weight, p.height, p.bmi, p.body_fat, p.date
        FROM progress p
        WHERE p.client_id = c.id
        ORDER BY p.date DESC, p.created_at DESC
        LIMIT 1
    ) lp ON TRUE"#;

#[derive(Clone)]
pub struct ClientService {
    db: PgPool,
}

impl ClientService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    pub async fn list(&self, query: &ClientQuery) -> AppResult<ListResponse<ClientWithRelations>> {
        let paging = Paging::new(query.page, query.limit);

        let mut count = QueryBuilder::new("SELECT COUNT(*)");
        count.push(CLIENT_FROM);
        push_filters(&mut count, query);
        let total: i64 = count.build_query_scalar().fetch_one(&self.db).await?;

        let mut builder = QueryBuilder::new(CLIENT_SELECT);
        builder.push(CLIENT_FROM).push(LATEST_PROGRESS_JOIN);
        push_filters(&mut builder, query);
        builder.push(format!(
            " ORDER BY {} {} NULLS LAST",
            sort_column(query.sort.as_deref()),
            query.order.as_sql()
        ));
        paging.push_to(&mut builder);

        let rows = builder.build_query_as::<ClientRow>().fetch_all(&self.db).await?;
        let clients = rows.into_iter().map(ClientWithRelations::from).collect();
        Ok(ListResponse::new(clients, paging, total))
    }

    pub async fn get(&self, id: Uuid) -> AppResult<ClientWithRelations> {
        let sql = format!(
            "{}{}{} WHERE c.id = $1",
            CLIENT_SELECT, CLIENT_FROM, LATEST_PROGRESS_JOIN
        );

        sqlx::query_as::<_, ClientRow>(&sql)
            .bind(id)
            .fetch_optional(&self.db)
            .await?
            .map(ClientWithRelations::from)
            .ok_or(AppError::NotFound("Client"))
    }

    pub async fn create(&self, request: CreateClientRequest) -> AppResult<ClientWithRelations> {
        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO clients (user_id, trainer_id, goals, activity_level)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(request.user_id)
        .bind(request.trainer_id)
        .bind(request.goals)
        .bind(request.activity_level)
        .fetch_one(&self.db)
        .await?;

        tracing::info!(client_id = %id, user_id = %request.user_id, "Created client");
        self.get(id).await
    }

    /// Partial update; `trainer_id: Some(None)` unassigns the client
    pub async fn update(&self, id: Uuid, request: UpdateClientRequest) -> AppResult<ClientWithRelations> {
        let mut builder = QueryBuilder::<Postgres>::new("UPDATE clients SET updated_at = NOW()");

        if let Some(trainer_id) = request.trainer_id {
            builder.push(", trainer_id = ").push_bind(trainer_id);
            match trainer_id {
                Some(trainer_id) => tracing::info!(client_id = %id, trainer_id = %trainer_id, "Assigning trainer"),
                None => tracing::info!(client_id = %id, "Unassigning trainer"),
            }
        }
        if let Some(goals) = request.goals {
            builder.push(", goals = ").push_bind(goals);
        }
        if let Some(activity_level) = request.activity_level {
            builder.push(", activity_level = ").push_bind(activity_level);
        }

        builder.push(" WHERE id = ").push_bind(id).push(" RETURNING id");

        builder
            .build_query_scalar::<Uuid>()
            .fetch_optional(&self.db)
            .await?
            .ok_or(AppError::NotFound("Client"))?;

        self.get(id).await
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM clients WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Client"));
        }

        tracing::info!(client_id = %id, "Deleted client");
        Ok(())
    }
}

fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, query: &ClientQuery) {
    builder.push(" WHERE TRUE");

    if let Some(trainer_id) = query.trainer_id {
        builder.push(" AND c.trainer_id = ").push_bind(trainer_id);
    }
    match query.status {
        Some(AssignmentStatus::Active) => {
            builder.push(" AND c.trainer_id IS NOT NULL");
        }
        Some(AssignmentStatus::Unassigned) => {
            builder.push(" AND c.trainer_id IS NULL");
        }
        None => {}
    }
    if let Some(activity_level) = query.activity_level {
        builder.push(" AND c.activity_level = ").push_bind(activity_level);
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
            .push(" OR c.goals ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
}

fn sort_column(sort: Option<&str>) -> &'static str {
    match sort {
        Some("name") => "LOWER(u.first_name || ' ' || u.last_name)",
        Some("progress") | Some("progressCount") => "progress_count",
        Some("activityLevel") => "c.activity_level",
        Some("updatedAt") => "c.updated_at",
        _ => "c.created_at",
    }
}
