//! Reservations repository

use sqlx::{Postgres, Transaction};

use crate::error::AppResult;

/// Reads reservations inside the caller's transaction only
#[derive(Clone)]
pub struct ReservationsRepository;

impl ReservationsRepository {
    pub fn new() -> Self {
        Self
    }

    /// Whether another user holds a waiting reservation on the book.
    /// Read inside the renewal transaction so the decision and the commit
    /// see the same snapshot. Status 0 is waiting.
    pub async fn waiting_held_by_other(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        book_id: i32,
        borrower_id: i32,
    ) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM reservations
                WHERE book_id = $1 AND user_id <> $2 AND status = 0
            )
            "#,
        )
        .bind(book_id)
        .bind(borrower_id)
        .fetch_one(&mut **tx)
        .await?;
        Ok(exists)
    }
}
