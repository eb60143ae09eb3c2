use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{
    CreateNotificationRequest, ListResponse, Notification, NotificationQuery, Paging,
    UpdateNotificationRequest,
};

const NOTIFICATION_COLUMNS: &str = "id, user_id, title, message, is_read, created_at, updated_at";

#[derive(Clone)]
pub struct NotificationService {
    db: PgPool,
}

impl NotificationService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    pub async fn list(&self, query: &NotificationQuery) -> AppResult<ListResponse<Notification>> {
        let paging = Paging::new(query.page, query.limit);

        let mut count = QueryBuilder::new("SELECT COUNT(*) FROM notifications");
        push_filters(&mut count, query);
        let total: i64 = count.build_query_scalar().fetch_one(&self.db).await?;

        let mut builder = QueryBuilder::new(format!(
            "SELECT {} FROM notifications",
            NOTIFICATION_COLUMNS
        ));
        push_filters(&mut builder, query);
        builder.push(format!(" ORDER BY created_at {}", query.order.as_sql()));
        paging.push_to(&mut builder);

        let notifications = builder.build_query_as::<Notification>().fetch_all(&self.db).await?;
        Ok(ListResponse::new(notifications, paging, total))
    }

    pub async fn get(&self, id: Uuid) -> AppResult<Notification> {
        sqlx::query_as::<_, Notification>(&format!(
            "SELECT {} FROM notifications WHERE id = $1",
            NOTIFICATION_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or(AppError::NotFound("Notification"))
    }

    pub async fn create(&self, request: CreateNotificationRequest) -> AppResult<Notification> {
        let notification = sqlx::query_as::<_, Notification>(&format!(
            r#"
            INSERT INTO notifications (user_id, title, message)
            VALUES ($1, $2, $3)
            RETURNING {}
            "#,
            NOTIFICATION_COLUMNS
        ))
        .bind(request.user_id)
        .bind(request.title)
        .bind(request.message)
        .fetch_one(&self.db)
        .await?;

        tracing::debug!(notification_id = %notification.id, user_id = %notification.user_id, "Created notification");
        Ok(notification)
    }

    pub async fn update(
        &self,
        id: Uuid,
        request: UpdateNotificationRequest,
    ) -> AppResult<Notification> {
        let mut builder =
            QueryBuilder::<Postgres>::new("UPDATE notifications SET updated_at = NOW()");

        if let Some(title) = request.title {
            builder.push(", title = ").push_bind(title);
        }
        if let Some(message) = request.message {
            builder.push(", message = ").push_bind(message);
        }
        if let Some(is_read) = request.is_read {
            builder.push(", is_read = ").push_bind(is_read);
        }

        builder
            .push(" WHERE id = ")
            .push_bind(id)
            .push(format!(" RETURNING {}", NOTIFICATION_COLUMNS));

        builder
            .build_query_as::<Notification>()
            .fetch_optional(&self.db)
            .await?
            .ok_or(AppError::NotFound("Notification"))
    }

    pub async fn mark_read(&self, id: Uuid) -> AppResult<Notification> {
        self.update(
            id,
            UpdateNotificationRequest {
                is_read: Some(true),
                ..Default::default()
            },
        )
        .await
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM notifications WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Notification"));
        }
        Ok(())
    }
}

fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, query: &NotificationQuery) {
    builder.push(" WHERE TRUE");

    if let Some(user_id) = query.user_id {
        builder.push(" AND user_id = ").push_bind(user_id);
    }
    match query.unread {
        Some(true) => {
            builder.push(" AND NOT is_read");
        }
        Some(false) => {
            builder.push(" AND is_read");
        }
        None => {}
    }
}
