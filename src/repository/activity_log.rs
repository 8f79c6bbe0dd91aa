//! Activity log repository (append-only)

use sqlx::{Postgres, Transaction};

use crate::{error::AppResult, models::notification::ActivityEntry};

/// Appends entries inside the caller's transaction only
#[derive(Clone)]
pub struct ActivityLogRepository;

impl ActivityLogRepository {
    pub fn new() -> Self {
        Self
    }

    /// Append an entry inside the mutating transaction, so the audit trail
    /// commits or rolls back with the state change it describes
    pub async fn append(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        entry: &ActivityEntry,
    ) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO activity_log (actor_user_id, borrow_id, action, detail)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(entry.actor_user_id)
        .bind(entry.borrow_id)
        .bind(&entry.action)
        .bind(&entry.detail)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }
}
