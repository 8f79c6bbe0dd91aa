//! Renewals repository (append-only audit log)

use chrono::NaiveDate;
use sqlx::{Postgres, Transaction};

use crate::{error::AppResult, models::enums::RenewalMethod};

/// Writes audit rows inside the caller's transaction only
#[derive(Clone)]
pub struct RenewalsRepository;

impl RenewalsRepository {
    pub fn new() -> Self {
        Self
    }

    /// Append one immutable renewal audit row. No update or delete exists
    /// on this table.
    pub async fn append(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        borrow_id: i32,
        user_id: i32,
        old_due_date: NaiveDate,
        new_due_date: NaiveDate,
        renewal_count: i16,
        method: RenewalMethod,
    ) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO renewals (borrow_id, user_id, old_due_date, new_due_date,
                                  renewal_count, renewal_method)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(borrow_id)
        .bind(user_id)
        .bind(old_due_date)
        .bind(new_due_date)
        .bind(renewal_count)
        .bind(method.as_str())
        .execute(&mut **tx)
        .await?;
        Ok(())
    }
}
