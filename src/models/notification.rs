//! Notification and activity-log models (append-only side effects)

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::enums::NotificationPriority;

pub const NOTIFICATION_TYPE_OVERDUE_FINE: &str = "overdue_fine";

/// Notification to persist for asynchronous delivery
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NewNotification {
    pub user_id: i32,
    pub notification_type: String,
    pub title: String,
    pub message: String,
    pub related_borrow_id: Option<i32>,
    pub priority: NotificationPriority,
}

/// Activity-log entry describing a state transition
#[derive(Debug, Clone)]
pub struct ActivityEntry {
    pub actor_user_id: i32,
    pub borrow_id: Option<i32>,
    pub action: String,
    pub detail: Option<String>,
}
