use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dormhub_core::notify::Notification;
use dormhub_core::repository::{NotificationRepository, RepoError};
use sqlx::PgPool;
use uuid::Uuid;

pub struct PgNotificationRepository {
    pool: PgPool,
}

impl PgNotificationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct NotificationRow {
    id: Uuid,
    user_id: Uuid,
    title: String,
    message: String,
    is_read: bool,
    created_at: DateTime<Utc>,
}

impl NotificationRow {
    fn into_notification(self) -> Notification {
        Notification {
            id: self.id,
            user_id: self.user_id,
            title: self.title,
            message: self.message,
            is_read: self.is_read,
            created_at: self.created_at,
        }
    }
}

#[async_trait]
impl NotificationRepository for PgNotificationRepository {
    async fn push(&self, notification: &Notification) -> Result<(), RepoError> {
        sqlx::query(
            "INSERT INTO notifications (id, user_id, title, message, is_read, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(notification.id)
        .bind(notification.user_id)
        .bind(&notification.title)
        .bind(&notification.message)
        .bind(notification.is_read)
        .bind(notification.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Notification>, RepoError> {
        let rows: Vec<NotificationRow> = sqlx::query_as(
            "SELECT id, user_id, title, message, is_read, created_at \
             FROM notifications WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(NotificationRow::into_notification).collect())
    }

    async fn mark_read(&self, id: Uuid, user_id: Uuid) -> Result<bool, RepoError> {
        let result =
            sqlx::query("UPDATE notifications SET is_read = TRUE WHERE id = $1 AND user_id = $2")
                .bind(id)
                .bind(user_id)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected() == 1)
    }
}
