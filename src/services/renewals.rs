//! Renewal evaluator
//!
//! Decides whether a loan may be extended and applies the extension. The
//! reservation check and the renewal-count check both read the snapshot of
//! the transaction holding the borrow-row lock, closing the race where a
//! reservation lands between check and commit.

use chrono::{Duration, NaiveDate};

use crate::{
    error::{AppError, AppResult},
    models::{
        borrow::BorrowRecord,
        enums::RenewalMethod,
        notification::ActivityEntry,
        user::{BorrowRule, UserType},
    },
    repository::Repository,
};

/// Pure eligibility decision over a transactional snapshot. Returns the new
/// due date when the renewal is granted.
pub fn evaluate_renewal(
    record: &BorrowRecord,
    rule: &BorrowRule,
    reserved_by_other: bool,
) -> AppResult<NaiveDate> {
    if !record.status.is_renewable() {
        return Err(AppError::NotFound(format!(
            "Borrow record {} is not an active loan (status {})",
            record.id, record.status
        )));
    }

    // A queued patron always beats the renewal, regardless of the count
    if reserved_by_other {
        return Err(AppError::Conflict(
            "ReservedByOther: another user is waiting for this book".to_string(),
        ));
    }

    if record.renewal_count >= rule.max_renewals_allowed {
        return Err(AppError::LimitExceeded(format!(
            "Maximum renewals reached ({}/{})",
            record.renewal_count, rule.max_renewals_allowed
        )));
    }

    Ok(record.due_date + Duration::days(rule.borrow_period_days as i64))
}

#[derive(Clone)]
pub struct RenewalsService {
    repository: Repository,
}

impl RenewalsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Renew a loan, returning the new due date and renewal count
    pub async fn renew(
        &self,
        borrow_id: i32,
        method: RenewalMethod,
        actor_user_id: i32,
    ) -> AppResult<(NaiveDate, i16)> {
        let mut tx = self.repository.pool.begin().await?;

        let record = self
            .repository
            .borrows
            .fetch_for_update(&mut tx, borrow_id)
            .await?;

        let borrower = self.repository.users.get_by_id(record.user_id).await?;
        let user_type = UserType::parse(&borrower.user_type)?;
        let rule = self.repository.users.get_rule(&mut tx, user_type).await?;

        let reserved = self
            .repository
            .reservations
            .waiting_held_by_other(&mut tx, record.book_id, record.user_id)
            .await?;

        let new_due_date = evaluate_renewal(&record, &rule, reserved)?;
        let new_count = record.renewal_count + 1;

        self.repository
            .borrows
            .apply_renewal(&mut tx, borrow_id, new_due_date, new_count)
            .await?;

        self.repository
            .renewals
            .append(
                &mut tx,
                borrow_id,
                record.user_id,
                record.due_date,
                new_due_date,
                new_count,
                method,
            )
            .await?;

        self.repository
            .activity_log
            .append(
                &mut tx,
                &ActivityEntry {
                    actor_user_id,
                    borrow_id: Some(borrow_id),
                    action: "renewal".to_string(),
                    detail: Some(format!(
                        "due {} -> {} ({})",
                        record.due_date, new_due_date, method
                    )),
                },
            )
            .await?;

        tx.commit().await?;

        tracing::info!(
            borrow_id,
            actor_user_id,
            %new_due_date,
            renewal_count = new_count,
            "loan renewed"
        );

        Ok((new_due_date, new_count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::enums::BorrowStatus;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn record(status: BorrowStatus, renewal_count: i16) -> BorrowRecord {
        BorrowRecord {
            id: 1,
            user_id: 10,
            book_id: 20,
            borrow_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            due_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            return_date: None,
            renewal_count,
            status,
            fine_amount: dec!(0.00),
            days_overdue: 0,
        }
    }

    fn rule(max_renewals: i16, period_days: i16) -> BorrowRule {
        BorrowRule {
            user_type: "student".to_string(),
            max_renewals_allowed: max_renewals,
            borrow_period_days: period_days,
            overdue_fine_per_day: dec!(1.00),
            max_concurrent_loans: 3,
        }
    }

    #[test]
    fn grants_renewal_and_extends_by_period_days() {
        let new_due = evaluate_renewal(&record(BorrowStatus::Borrowed, 0), &rule(2, 14), false)
            .expect("renewal should be granted");
        assert_eq!(new_due, NaiveDate::from_ymd_opt(2024, 1, 29).unwrap());
    }

    #[test]
    fn already_renewed_loan_can_renew_again_under_cap() {
        assert!(evaluate_renewal(&record(BorrowStatus::Renewed, 1), &rule(2, 14), false).is_ok());
    }

    #[test]
    fn returned_and_lost_loans_are_not_renewable() {
        for status in [BorrowStatus::Returned, BorrowStatus::Lost, BorrowStatus::Overdue] {
            let err = evaluate_renewal(&record(status, 0), &rule(2, 14), false).unwrap_err();
            assert!(matches!(err, AppError::NotFound(_)));
        }
    }

    #[test]
    fn waiting_reservation_blocks_renewal_regardless_of_count() {
        let err = evaluate_renewal(&record(BorrowStatus::Borrowed, 0), &rule(2, 14), true)
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[test]
    fn renewal_cap_is_enforced() {
        let err = evaluate_renewal(&record(BorrowStatus::Renewed, 2), &rule(2, 14), false)
            .unwrap_err();
        assert!(matches!(err, AppError::LimitExceeded(_)));
    }

    #[test]
    fn reservation_conflict_wins_over_exhausted_cap() {
        let err = evaluate_renewal(&record(BorrowStatus::Borrowed, 5), &rule(2, 14), true)
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }
}
