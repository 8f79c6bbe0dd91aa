//! Notifications repository
//!
//! Writes go through the pool, not a caller transaction: notifications are
//! fire-and-forget and must never roll back a financial transaction.

use sqlx::{Pool, Postgres};

use crate::{error::AppResult, models::notification::NewNotification};

#[derive(Clone)]
pub struct NotificationsRepository {
    pool: Pool<Postgres>,
}

impl NotificationsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Persist a notification for asynchronous delivery
    pub async fn insert(&self, notification: &NewNotification) -> AppResult<i32> {
        let id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO notifications (user_id, notification_type, title, message,
                                       related_borrow_id, priority)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(notification.user_id)
        .bind(&notification.notification_type)
        .bind(&notification.title)
        .bind(&notification.message)
        .bind(notification.related_borrow_id)
        .bind(i16::from(notification.priority))
        .fetch_one(&self.pool)
        .await?;
        Ok(id)
    }
}
