//! Renewal audit model (append-only, never updated or deleted)

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Immutable record of one granted renewal
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Renewal {
    pub id: i32,
    pub borrow_id: i32,
    pub user_id: i32,
    pub old_due_date: NaiveDate,
    pub new_due_date: NaiveDate,
    pub renewal_count: i16,
    pub renewal_method: String,
    pub created_at: DateTime<Utc>,
}
