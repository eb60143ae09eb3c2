use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{
    like_pattern, search_term, CreateUserRequest, ListResponse, Paging, UpdateUserRequest, User,
    UserQuery, UserRole,
};

const USER_COLUMNS: &str =
    "SELECT id, email, first_name, last_name, role, phone, created_at, updated_at FROM users";

#[derive(Clone)]
pub struct UserService {
    db: PgPool,
}

impl UserService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    pub async fn list(&self, query: &UserQuery) -> AppResult<ListResponse<User>> {
        let paging = Paging::new(query.page, query.limit);

        let mut count = QueryBuilder::new("SELECT COUNT(*) FROM users");
        push_filters(&mut count, query);
        let total: i64 = count.build_query_scalar().fetch_one(&self.db).await?;

        let mut builder = QueryBuilder::new(USER_COLUMNS);
        push_filters(&mut builder, query);
        builder.push(format!(
            " ORDER BY {} {}",
            sort_column(query.sort.as_deref()),
            query.order.as_sql()
        ));
        paging.push_to(&mut builder);

        let users = builder.build_query_as::<User>().fetch_all(&self.db).await?;
        Ok(ListResponse::new(users, paging, total))
    }

    pub async fn get(&self, id: Uuid) -> AppResult<User> {
        sqlx::query_as::<_, User>(&format!("{} WHERE id = $1", USER_COLUMNS))
            .bind(id)
            .fetch_optional(&self.db)
            .await?
            .ok_or(AppError::NotFound("User"))
    }

    pub async fn create(&self, request: CreateUserRequest) -> AppResult<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, first_name, last_name, role, phone)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, email, first_name, last_name, role, phone, created_at, updated_at
            "#,
        )
        .bind(normalize_email(&request.email))
        .bind(request.first_name.trim())
        .bind(request.last_name.trim())
        .bind(request.role.unwrap_or(UserRole::Client))
        .bind(request.phone)
        .fetch_one(&self.db)
        .await?;

        tracing::info!(user_id = %user.id, role = ?user.role, "Created user");
        Ok(user)
    }

    pub async fn update(&self, id: Uuid, request: UpdateUserRequest) -> AppResult<User> {
        let mut builder = QueryBuilder::<Postgres>::new("UPDATE users SET updated_at = NOW()");

        if let Some(email) = request.email {
            builder.push(", email = ").push_bind(normalize_email(&email));
        }
        if let Some(first_name) = request.first_name {
            builder.push(", first_name = ").push_bind(first_name.trim().to_string());
        }
        if let Some(last_name) = request.last_name {
            builder.push(", last_name = ").push_bind(last_name.trim().to_string());
        }
        if let Some(role) = request.role {
            builder.push(", role = ").push_bind(role);
        }
        if let Some(phone) = request.phone {
            builder.push(", phone = ").push_bind(phone);
        }

        builder
            .push(" WHERE id = ")
            .push_bind(id)
            .push(" RETURNING id, email, first_name, last_name, role, phone, created_at, updated_at");

        builder
            .build_query_as::<User>()
            .fetch_optional(&self.db)
            .await?
            .ok_or(AppError::NotFound("User"))
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("User"));
        }

        tracing::info!(user_id = %id, "Deleted user");
        Ok(())
    }
}

fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, query: &UserQuery) {
    builder.push(" WHERE TRUE");

    if let Some(role) = query.role {
        builder.push(" AND role = ").push_bind(role);
    }
    if let Some(term) = search_term(&query.search) {
        let pattern = like_pattern(term);
        builder
            .push(" AND (first_name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR last_name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR email ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
}

fn sort_column(sort: Option<&str>) -> &'static str {
    match sort {
        Some("name") => "LOWER(first_name || ' ' || last_name)",
        Some("lastName") => "LOWER(last_name)",
        Some("firstName") => "LOWER(first_name)",
        Some("email") => "email",
        Some("role") => "role",
        Some("updatedAt") => "updated_at",
        _ => "created_at",
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
