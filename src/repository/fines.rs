//! Fines repository
//!
//! The accrual sweep keys its idempotence on "at most one open overdue fine
//! per borrow record"; a partial unique index enforces it in the schema and
//! `find_open_overdue` is the check-then-act read inside the sweep
//! transaction.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{postgres::PgRow, Pool, Postgres, Row, Transaction};

use crate::{
    error::AppResult,
    models::{
        enums::PaymentStatus,
        fine::{Fine, FINE_REASON_OVERDUE},
    },
};

fn fine_from_row(row: &PgRow) -> Fine {
    Fine {
        id: row.get("id"),
        borrow_id: row.get("borrow_id"),
        user_id: row.get("user_id"),
        fine_amount: row.get("fine_amount"),
        fine_reason: row.get("fine_reason"),
        balance_due: row.get("balance_due"),
        payment_status: PaymentStatus::from(row.get::<i16, _>("payment_status")),
        created_date: row.get("created_date"),
        updated_date: row.get("updated_date"),
    }
}

#[derive(Clone)]
pub struct FinesRepository {
    pool: Pool<Postgres>,
}

impl FinesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// The open (unpaid or partially paid) overdue fine for a borrow
    /// record, if any. Payment statuses 0/1 are unpaid/partial_paid.
    pub async fn find_open_overdue(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        borrow_id: i32,
    ) -> AppResult<Option<Fine>> {
        let row = sqlx::query(
            r#"
            SELECT * FROM fines
            WHERE borrow_id = $1 AND fine_reason = $2 AND payment_status IN (0, 1)
            FOR UPDATE
            "#,
        )
        .bind(borrow_id)
        .bind(FINE_REASON_OVERDUE)
        .fetch_optional(&mut **tx)
        .await?;

        Ok(row.map(|r| fine_from_row(&r)))
    }

    /// Insert a fresh overdue fine with the full amount outstanding
    pub async fn insert_overdue(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        borrow_id: i32,
        user_id: i32,
        amount: Decimal,
        now: DateTime<Utc>,
    ) -> AppResult<i32> {
        let id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO fines (borrow_id, user_id, fine_amount, fine_reason,
                               balance_due, payment_status, created_date, updated_date)
            VALUES ($1, $2, $3, $4, $3, $5, $6, $6)
            RETURNING id
            "#,
        )
        .bind(borrow_id)
        .bind(user_id)
        .bind(amount)
        .bind(FINE_REASON_OVERDUE)
        .bind(i16::from(PaymentStatus::Unpaid))
        .bind(now)
        .fetch_one(&mut **tx)
        .await?;
        Ok(id)
    }

    /// Recompute an existing fine to a new total and balance
    pub async fn update_amount(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        fine_id: i32,
        new_amount: Decimal,
        new_balance: Decimal,
        now: DateTime<Utc>,
    ) -> AppResult<()> {
        sqlx::query(
            "UPDATE fines SET fine_amount = $1, balance_due = $2, updated_date = $3 WHERE id = $4",
        )
        .bind(new_amount)
        .bind(new_balance)
        .bind(now)
        .bind(fine_id)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    /// Total outstanding balance over a user's open fines
    pub async fn sum_open_balance(&self, user_id: i32) -> AppResult<Decimal> {
        let total: Option<Decimal> = sqlx::query_scalar(
            "SELECT SUM(balance_due) FROM fines WHERE user_id = $1 AND payment_status IN (0, 1)",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(total.unwrap_or(Decimal::ZERO))
    }
}
