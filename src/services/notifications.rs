//! Notification sink
//!
//! Fire-and-forget: notifications are persisted on their own connection
//! and a failure here never rolls back the transaction that produced them.

use rust_decimal::Decimal;

use crate::{
    models::{
        enums::NotificationPriority,
        notification::{NewNotification, NOTIFICATION_TYPE_OVERDUE_FINE},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct NotificationsService {
    repository: Repository,
}

impl NotificationsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Persist a notification; errors are logged and swallowed
    pub async fn notify(&self, notification: NewNotification) {
        if let Err(e) = self.repository.notifications.insert(&notification).await {
            tracing::warn!(
                user_id = notification.user_id,
                "failed to persist notification: {}",
                e
            );
        }
    }

    /// Build the high-priority overdue-fine notification
    pub fn overdue_fine(
        user_id: i32,
        borrow_id: i32,
        book_title: &str,
        amount: Decimal,
    ) -> NewNotification {
        NewNotification {
            user_id,
            notification_type: NOTIFICATION_TYPE_OVERDUE_FINE.to_string(),
            title: "Overdue book fine".to_string(),
            message: format!(
                "Your loan of \"{}\" is overdue. A fine of RM{} is now due.",
                book_title, amount
            ),
            related_borrow_id: Some(borrow_id),
            priority: NotificationPriority::High,
        }
    }
}
