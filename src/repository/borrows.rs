//! Borrow records repository
//!
//! Mutations on a borrow record go through a caller-owned transaction with
//! the row locked `FOR UPDATE`, so concurrent librarian actions on the same
//! loan serialize instead of losing updates.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{postgres::PgRow, Pool, Postgres, Row, Transaction};

use crate::{
    error::{AppError, AppResult},
    models::{
        borrow::{BorrowDetails, BorrowRecord},
        enums::BorrowStatus,
    },
};

/// Overdue-sweep candidate: the locked record plus the fine rate for the
/// borrower's user type (None when no rule row exists).
#[derive(Debug, Clone)]
pub struct AccrualCandidate {
    pub record: BorrowRecord,
    pub fine_per_day: Option<Decimal>,
}

fn borrow_from_row(row: &PgRow) -> BorrowRecord {
    BorrowRecord {
        id: row.get("id"),
        user_id: row.get("user_id"),
        book_id: row.get("book_id"),
        borrow_date: row.get("borrow_date"),
        due_date: row.get("due_date"),
        return_date: row.get("return_date"),
        renewal_count: row.get("renewal_count"),
        status: BorrowStatus::from(row.get::<i16, _>("status")),
        fine_amount: row.get("fine_amount"),
        days_overdue: row.get("days_overdue"),
    }
}

#[derive(Clone)]
pub struct BorrowsRepository {
    pool: Pool<Postgres>,
}

impl BorrowsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get a borrow record by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<BorrowRecord> {
        let row = sqlx::query("SELECT * FROM borrow_records WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Borrow record {} not found", id)))?;
        Ok(borrow_from_row(&row))
    }

    /// Get a borrow record by ID with a row lock, inside a transaction
    pub async fn fetch_for_update(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        id: i32,
    ) -> AppResult<BorrowRecord> {
        let row = sqlx::query("SELECT * FROM borrow_records WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut **tx)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Borrow record {} not found", id)))?;
        Ok(borrow_from_row(&row))
    }

    /// Update the status, setting the return date when one is supplied
    pub async fn update_status(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        id: i32,
        status: BorrowStatus,
        return_date: Option<NaiveDate>,
    ) -> AppResult<()> {
        match return_date {
            Some(date) => {
                sqlx::query(
                    "UPDATE borrow_records SET status = $1, return_date = $2 WHERE id = $3",
                )
                .bind(i16::from(status))
                .bind(date)
                .bind(id)
                .execute(&mut **tx)
                .await?;
            }
            None => {
                sqlx::query("UPDATE borrow_records SET status = $1 WHERE id = $2")
                    .bind(i16::from(status))
                    .bind(id)
                    .execute(&mut **tx)
                    .await?;
            }
        }
        Ok(())
    }

    /// Apply a granted renewal: new due date, bumped count, renewed status
    pub async fn apply_renewal(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        id: i32,
        new_due_date: NaiveDate,
        new_count: i16,
    ) -> AppResult<()> {
        sqlx::query(
            "UPDATE borrow_records SET status = $1, due_date = $2, renewal_count = $3 WHERE id = $4",
        )
        .bind(i16::from(BorrowStatus::Renewed))
        .bind(new_due_date)
        .bind(new_count)
        .bind(id)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    /// Write the denormalized fine fields and flip the record to overdue
    pub async fn apply_fine(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        id: i32,
        fine_amount: Decimal,
        days_overdue: i64,
    ) -> AppResult<()> {
        sqlx::query(
            "UPDATE borrow_records SET status = $1, fine_amount = $2, days_overdue = $3 WHERE id = $4",
        )
        .bind(i16::from(BorrowStatus::Overdue))
        .bind(fine_amount)
        .bind(days_overdue as i32)
        .bind(id)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    /// Create a borrow record for a newly issued loan
    pub async fn create(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user_id: i32,
        book_id: i32,
        borrow_date: NaiveDate,
        due_date: NaiveDate,
    ) -> AppResult<i32> {
        let id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO borrow_records (user_id, book_id, borrow_date, due_date, status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(user_id)
        .bind(book_id)
        .bind(borrow_date)
        .bind(due_date)
        .bind(i16::from(BorrowStatus::Borrowed))
        .fetch_one(&mut **tx)
        .await?;
        Ok(id)
    }

    /// All loans past due as of the given date, locked for the sweep, with
    /// the per-user-type fine rate joined in. Statuses 0/1/3 are
    /// borrowed/renewed/overdue.
    pub async fn overdue_candidates(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        as_of: NaiveDate,
    ) -> AppResult<Vec<AccrualCandidate>> {
        let rows = sqlx::query(
            r#"
            SELECT b.*, r.overdue_fine_per_day
            FROM borrow_records b
            JOIN users u ON b.user_id = u.id
            LEFT JOIN borrow_rules r ON r.user_type = u.user_type
            WHERE b.status IN (0, 1, 3) AND b.due_date < $1
            ORDER BY b.id
            FOR UPDATE OF b
            "#,
        )
        .bind(as_of)
        .fetch_all(&mut **tx)
        .await?;

        Ok(rows
            .iter()
            .map(|row| AccrualCandidate {
                record: borrow_from_row(row),
                fine_per_day: row.get("overdue_fine_per_day"),
            })
            .collect())
    }

    /// Active loans for a user, with book titles, for listings
    pub async fn list_active_for_user(
        &self,
        user_id: i32,
        today: NaiveDate,
    ) -> AppResult<Vec<BorrowDetails>> {
        let rows = sqlx::query(
            r#"
            SELECT b.*, k.title AS book_title
            FROM borrow_records b
            JOIN books k ON b.book_id = k.id
            WHERE b.user_id = $1 AND b.status IN (0, 1, 3)
            ORDER BY b.due_date
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|row| {
                let record = borrow_from_row(row);
                BorrowDetails {
                    id: record.id,
                    book_id: record.book_id,
                    book_title: row.get("book_title"),
                    borrow_date: record.borrow_date,
                    due_date: record.due_date,
                    renewal_count: record.renewal_count,
                    status: record.status,
                    fine_amount: record.fine_amount,
                    is_overdue: record.due_date < today,
                }
            })
            .collect())
    }

    /// Count a user's active loans (inside the issue-loan transaction)
    pub async fn count_active_for_user(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user_id: i32,
    ) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM borrow_records WHERE user_id = $1 AND status IN (0, 1, 3)",
        )
        .bind(user_id)
        .fetch_one(&mut **tx)
        .await?;
        Ok(count)
    }

    /// Count a user's currently overdue active loans
    pub async fn count_overdue_for_user(&self, user_id: i32, today: NaiveDate) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM borrow_records
            WHERE user_id = $1 AND status IN (0, 1, 3) AND due_date < $2
            "#,
        )
        .bind(user_id)
        .bind(today)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }
}
