//! Borrow transition engine
//!
//! Applies one validated status change to one borrow record and cascades
//! the book-status recompute and the activity-log entry in the same
//! transaction. The caller observes either full success or the prior state.

use chrono::NaiveDate;

use crate::{
    error::{AppError, AppResult},
    models::{
        borrow::BorrowRecord,
        enums::{BookStatus, BorrowStatus},
        notification::ActivityEntry,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct TransitionsService {
    repository: Repository,
}

impl TransitionsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Change the status of a borrow record.
    ///
    /// `today` is passed in rather than read from the clock so the engine
    /// stays deterministic under test.
    pub async fn change_status(
        &self,
        borrow_id: i32,
        new_status: BorrowStatus,
        actor_user_id: i32,
        today: NaiveDate,
    ) -> AppResult<BorrowRecord> {
        let mut tx = self.repository.pool.begin().await?;

        let record = self
            .repository
            .borrows
            .fetch_for_update(&mut tx, borrow_id)
            .await?;

        if !record.status.can_transition_to(new_status) {
            return Err(AppError::Conflict(format!(
                "Transition {} -> {} is not allowed",
                record.status, new_status
            )));
        }

        // return_date is set exactly once, when the loan first comes back
        let return_date = match (new_status, record.return_date) {
            (BorrowStatus::Returned, None) => Some(today),
            _ => None,
        };

        self.repository
            .borrows
            .update_status(&mut tx, borrow_id, new_status, return_date)
            .await?;

        let book_status = BookStatus::derived_from(new_status);
        self.repository
            .books
            .set_status(&mut tx, record.book_id, book_status)
            .await?;

        self.repository
            .activity_log
            .append(
                &mut tx,
                &ActivityEntry {
                    actor_user_id,
                    borrow_id: Some(borrow_id),
                    action: "status_change".to_string(),
                    detail: Some(format!("{} -> {}", record.status, new_status)),
                },
            )
            .await?;

        tx.commit().await?;

        tracing::info!(
            borrow_id,
            actor_user_id,
            old = %record.status,
            new = %new_status,
            "borrow status changed"
        );

        Ok(BorrowRecord {
            status: new_status,
            return_date: return_date.or(record.return_date),
            ..record
        })
    }
}
