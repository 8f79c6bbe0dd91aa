//! Books repository
//!
//! Book status is derived state: it is only ever written here from a
//! recompute inside a borrow-record transaction.

use sqlx::{Pool, Postgres, Row, Transaction};

use crate::{
    error::{AppError, AppResult},
    models::{book::Book, enums::BookStatus},
};

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get a book by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Book> {
        let row = sqlx::query("SELECT * FROM books WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book {} not found", id)))?;

        Ok(Book {
            id: row.get("id"),
            identification: row.get("identification"),
            title: row.get("title"),
            author: row.get("author"),
            status: BookStatus::from(row.get::<i16, _>("status")),
        })
    }

    /// Fetch the title inside a transaction (for notification text)
    pub async fn title(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        id: i32,
    ) -> AppResult<String> {
        let title: Option<String> = sqlx::query_scalar("SELECT title FROM books WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut **tx)
            .await?;
        Ok(title.unwrap_or_else(|| format!("book #{}", id)))
    }

    /// Fetch status with a row lock (issue-loan availability check)
    pub async fn status_for_update(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        id: i32,
    ) -> AppResult<BookStatus> {
        let status: i16 = sqlx::query_scalar("SELECT status FROM books WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut **tx)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book {} not found", id)))?;
        Ok(BookStatus::from(status))
    }

    /// Write the recomputed status
    pub async fn set_status(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        id: i32,
        status: BookStatus,
    ) -> AppResult<()> {
        sqlx::query("UPDATE books SET status = $1 WHERE id = $2")
            .bind(i16::from(status))
            .bind(id)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }
}
