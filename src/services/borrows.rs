//! Loan issue and lookup service
//!
//! Issuing is the entry point of the borrow lifecycle: it consumes the
//! restriction aggregator, enforces the concurrent-loan cap and flips the
//! book to borrowed, all inside one transaction.

use chrono::{Duration, NaiveDate};

use crate::{
    error::{AppError, AppResult},
    models::{
        borrow::{BorrowDetails, BorrowRecord, CreateBorrow},
        enums::{BookStatus, BorrowStatus},
        notification::ActivityEntry,
        user::UserType,
    },
    repository::Repository,
};

use super::restrictions::RestrictionsService;

#[derive(Clone)]
pub struct BorrowsService {
    repository: Repository,
    restrictions: RestrictionsService,
}

impl BorrowsService {
    pub fn new(repository: Repository, restrictions: RestrictionsService) -> Self {
        Self {
            repository,
            restrictions,
        }
    }

    /// Get a borrow record by ID
    pub async fn get(&self, borrow_id: i32) -> AppResult<BorrowRecord> {
        self.repository.borrows.get_by_id(borrow_id).await
    }

    /// Get a user by ID
    pub async fn get_user(&self, user_id: i32) -> AppResult<crate::models::User> {
        self.repository.users.get_by_id(user_id).await
    }

    /// Active loans for a user
    pub async fn list_for_user(
        &self,
        user_id: i32,
        today: NaiveDate,
    ) -> AppResult<Vec<BorrowDetails>> {
        // Verify user exists
        self.repository.users.get_by_id(user_id).await?;
        self.repository.borrows.list_active_for_user(user_id, today).await
    }

    /// Issue a new loan, returning the borrow ID and due date
    pub async fn issue(
        &self,
        request: &CreateBorrow,
        actor_user_id: i32,
        today: NaiveDate,
    ) -> AppResult<(i32, NaiveDate)> {
        let user = self.repository.users.get_by_id(request.user_id).await?;
        let user_type = UserType::parse(&user.user_type)?;

        let restrictions = self
            .restrictions
            .get_restrictions(request.user_id, user_type, today)
            .await?;
        if let Some(first) = restrictions.first() {
            return Err(AppError::Conflict(format!(
                "User {} is restricted from borrowing: {}",
                request.user_id, first.message
            )));
        }

        let mut tx = self.repository.pool.begin().await?;

        let book_status = self
            .repository
            .books
            .status_for_update(&mut tx, request.book_id)
            .await?;
        if book_status != BookStatus::Available {
            return Err(AppError::Conflict(format!(
                "Book {} is not available",
                request.book_id
            )));
        }

        let rule = self.repository.users.get_rule(&mut tx, user_type).await?;
        let active = self
            .repository
            .borrows
            .count_active_for_user(&mut tx, request.user_id)
            .await?;
        if active >= rule.max_concurrent_loans as i64 {
            return Err(AppError::LimitExceeded(format!(
                "Maximum concurrent loans reached ({}/{})",
                active, rule.max_concurrent_loans
            )));
        }

        let due_date = today + Duration::days(rule.borrow_period_days as i64);
        let borrow_id = self
            .repository
            .borrows
            .create(&mut tx, request.user_id, request.book_id, today, due_date)
            .await?;

        self.repository
            .books
            .set_status(
                &mut tx,
                request.book_id,
                BookStatus::derived_from(BorrowStatus::Borrowed),
            )
            .await?;

        self.repository
            .activity_log
            .append(
                &mut tx,
                &ActivityEntry {
                    actor_user_id,
                    borrow_id: Some(borrow_id),
                    action: "issue".to_string(),
                    detail: Some(format!(
                        "book {} to user {}, due {}",
                        request.book_id, request.user_id, due_date
                    )),
                },
            )
            .await?;

        tx.commit().await?;

        tracing::info!(
            borrow_id,
            user_id = request.user_id,
            book_id = request.book_id,
            %due_date,
            "loan issued"
        );

        Ok((borrow_id, due_date))
    }
}
