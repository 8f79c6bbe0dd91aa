//! Daily fine accrual batch
//!
//! Idempotent sweep over every loan past its due date: inserts the first
//! overdue fine, recomputes an existing open fine when the amount grew
//! (preserving any partial payment), and skips otherwise. The whole sweep
//! runs in one transaction; the run log records every decision outside it.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::fine::{amount_paid, rebalanced},
    repository::Repository,
};

use super::{notifications::NotificationsService, run_log::RunLog};

/// Snapshot of the open fine used by the pure accrual decision
#[derive(Debug, Clone)]
pub struct OpenFineSnapshot {
    pub fine_id: i32,
    pub fine_amount: Decimal,
    pub balance_due: Decimal,
}

/// What the sweep should do for one candidate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccrualAction {
    Skip,
    Insert {
        days_overdue: i64,
        amount: Decimal,
    },
    Update {
        fine_id: i32,
        days_overdue: i64,
        new_amount: Decimal,
        new_balance: Decimal,
    },
}

/// Decide the accrual action for one loan from a transactional snapshot.
///
/// Pure function of its inputs; `as_of` is explicit so the sweep is
/// replayable for any date.
pub fn decide(
    due_date: NaiveDate,
    as_of: NaiveDate,
    fine_per_day: Decimal,
    open_fine: Option<&OpenFineSnapshot>,
) -> AccrualAction {
    let days_overdue = (as_of - due_date).num_days();
    // Clock skew or a zero rate must never produce a zero/negative fine
    if days_overdue <= 0 {
        return AccrualAction::Skip;
    }
    let calculated = Decimal::from(days_overdue) * fine_per_day;
    if calculated <= Decimal::ZERO {
        return AccrualAction::Skip;
    }

    match open_fine {
        None => AccrualAction::Insert {
            days_overdue,
            amount: calculated,
        },
        Some(open) if calculated != open.fine_amount => {
            let paid = amount_paid(open.fine_amount, open.balance_due);
            AccrualAction::Update {
                fine_id: open.fine_id,
                days_overdue,
                new_amount: calculated,
                new_balance: rebalanced(calculated, paid),
            }
        }
        Some(_) => AccrualAction::Skip,
    }
}

/// Summary of one accrual run
#[derive(Debug, Clone, Default, Serialize, ToSchema)]
pub struct AccrualReport {
    pub as_of: Option<NaiveDate>,
    pub processed: u32,
    pub inserted: u32,
    pub updated: u32,
    pub skipped: u32,
    pub errors: Vec<String>,
}

impl AccrualReport {
    /// A run is clean only when it committed with zero recorded errors
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

#[derive(Clone)]
pub struct AccrualService {
    repository: Repository,
    notifications: NotificationsService,
    run_log: RunLog,
}

impl AccrualService {
    pub fn new(
        repository: Repository,
        notifications: NotificationsService,
        run_log: RunLog,
    ) -> Self {
        Self {
            repository,
            notifications,
            run_log,
        }
    }

    /// Run the daily accrual sweep for `as_of`.
    ///
    /// Per-record rule gaps (e.g. a user type without a borrow rule) are
    /// recorded in the report and do not abort the run; database errors
    /// propagate, dropping the transaction and rolling back every change
    /// of this run.
    pub async fn run_daily_accrual(&self, as_of: NaiveDate) -> AppResult<AccrualReport> {
        let mut report = AccrualReport {
            as_of: Some(as_of),
            ..Default::default()
        };
        self.run_log
            .append(&format!("accrual run starting, as_of={}", as_of));

        let run = self.sweep(as_of, &mut report).await;

        match &run {
            Ok(notifications_queued) => {
                self.run_log.append(&format!(
                    "accrual run committed, as_of={} processed={} inserted={} updated={} skipped={} errors={}",
                    as_of,
                    report.processed,
                    report.inserted,
                    report.updated,
                    report.skipped,
                    report.errors.len()
                ));
                // Delivered after commit so a rolled-back run never notifies;
                // sink failures are logged, never bubbled into the report.
                for notification in notifications_queued {
                    self.notifications.notify(notification.clone()).await;
                }
            }
            Err(e) => {
                self.run_log.append(&format!(
                    "accrual run FAILED and rolled back, as_of={}: {}",
                    as_of, e
                ));
            }
        }

        run.map(|_| report)
    }

    async fn sweep(
        &self,
        as_of: NaiveDate,
        report: &mut AccrualReport,
    ) -> AppResult<Vec<crate::models::notification::NewNotification>> {
        let now = Utc::now();
        let mut queued = Vec::new();
        let mut tx = self.repository.pool.begin().await?;

        let candidates = self
            .repository
            .borrows
            .overdue_candidates(&mut tx, as_of)
            .await?;

        for candidate in &candidates {
            report.processed += 1;
            let record = &candidate.record;

            let Some(rate) = candidate.fine_per_day else {
                let msg = format!("borrow {}: no borrow rule for the user's type", record.id);
                self.run_log.append(&msg);
                report.errors.push(msg);
                continue;
            };

            let open = self
                .repository
                .fines
                .find_open_overdue(&mut tx, record.id)
                .await?
                .map(|f| OpenFineSnapshot {
                    fine_id: f.id,
                    fine_amount: f.fine_amount,
                    balance_due: f.balance_due,
                });

            match decide(record.due_date, as_of, rate, open.as_ref()) {
                AccrualAction::Skip => {
                    report.skipped += 1;
                    self.run_log
                        .append(&format!("borrow {}: skip (no change)", record.id));
                }
                AccrualAction::Insert {
                    days_overdue,
                    amount,
                } => {
                    self.repository
                        .fines
                        .insert_overdue(&mut tx, record.id, record.user_id, amount, now)
                        .await?;
                    self.repository
                        .borrows
                        .apply_fine(&mut tx, record.id, amount, days_overdue)
                        .await?;

                    let title = self.repository.books.title(&mut tx, record.book_id).await?;
                    queued.push(NotificationsService::overdue_fine(
                        record.user_id,
                        record.id,
                        &title,
                        amount,
                    ));

                    report.inserted += 1;
                    self.run_log.append(&format!(
                        "borrow {}: inserted fine RM{} ({} days overdue)",
                        record.id, amount, days_overdue
                    ));
                }
                AccrualAction::Update {
                    fine_id,
                    days_overdue,
                    new_amount,
                    new_balance,
                } => {
                    self.repository
                        .fines
                        .update_amount(&mut tx, fine_id, new_amount, new_balance, now)
                        .await?;
                    self.repository
                        .borrows
                        .apply_fine(&mut tx, record.id, new_amount, days_overdue)
                        .await?;

                    // No notification on growth, to avoid daily spam
                    report.updated += 1;
                    self.run_log.append(&format!(
                        "borrow {}: fine {} recomputed to RM{}, balance RM{}",
                        record.id, fine_id, new_amount, new_balance
                    ));
                }
            }
        }

        tx.commit().await?;
        Ok(queued)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn first_sweep_inserts_days_times_rate() {
        // due 2024-01-01, RM1/day, swept on 2024-01-05
        let action = decide(d(2024, 1, 1), d(2024, 1, 5), dec!(1.00), None);
        assert_eq!(
            action,
            AccrualAction::Insert {
                days_overdue: 4,
                amount: dec!(4.00),
            }
        );
    }

    #[test]
    fn later_sweep_grows_the_open_fine_without_losing_payment_state() {
        let open = OpenFineSnapshot {
            fine_id: 7,
            fine_amount: dec!(4.00),
            balance_due: dec!(4.00),
        };
        let action = decide(d(2024, 1, 1), d(2024, 1, 7), dec!(1.00), Some(&open));
        assert_eq!(
            action,
            AccrualAction::Update {
                fine_id: 7,
                days_overdue: 6,
                new_amount: dec!(6.00),
                new_balance: dec!(6.00),
            }
        );
    }

    #[test]
    fn recompute_preserves_partial_payment() {
        // RM2 was paid externally: amount 6.00, balance 4.00
        let open = OpenFineSnapshot {
            fine_id: 7,
            fine_amount: dec!(6.00),
            balance_due: dec!(4.00),
        };
        let action = decide(d(2024, 1, 1), d(2024, 1, 8), dec!(1.00), Some(&open));
        assert_eq!(
            action,
            AccrualAction::Update {
                fine_id: 7,
                days_overdue: 7,
                new_amount: dec!(7.00),
                new_balance: dec!(5.00),
            }
        );
    }

    #[test]
    fn same_day_rerun_is_a_skip() {
        let open = OpenFineSnapshot {
            fine_id: 7,
            fine_amount: dec!(4.00),
            balance_due: dec!(4.00),
        };
        assert_eq!(
            decide(d(2024, 1, 1), d(2024, 1, 5), dec!(1.00), Some(&open)),
            AccrualAction::Skip
        );
    }

    #[test]
    fn not_yet_due_and_zero_rate_are_skipped() {
        assert_eq!(
            decide(d(2024, 1, 10), d(2024, 1, 5), dec!(1.00), None),
            AccrualAction::Skip
        );
        assert_eq!(
            decide(d(2024, 1, 5), d(2024, 1, 5), dec!(1.00), None),
            AccrualAction::Skip
        );
        assert_eq!(
            decide(d(2024, 1, 1), d(2024, 1, 5), dec!(0.00), None),
            AccrualAction::Skip
        );
    }

    #[test]
    fn overpaid_fine_rebalances_to_zero_not_negative() {
        let open = OpenFineSnapshot {
            fine_id: 9,
            fine_amount: dec!(2.00),
            balance_due: dec!(-3.00), // RM5 applied against a RM2 fine
        };
        let action = decide(d(2024, 1, 1), d(2024, 1, 4), dec!(1.00), Some(&open));
        assert_eq!(
            action,
            AccrualAction::Update {
                fine_id: 9,
                days_overdue: 3,
                new_amount: dec!(3.00),
                new_balance: dec!(0.00),
            }
        );
    }

    #[test]
    fn balance_invariant_holds_across_every_update_action() {
        use crate::models::fine::amount_paid;

        let cases = [
            (dec!(4.00), dec!(4.00)),
            (dec!(6.00), dec!(4.00)),
            (dec!(6.00), dec!(1.50)),
        ];
        for (fine_amount, balance_due) in cases {
            let open = OpenFineSnapshot {
                fine_id: 1,
                fine_amount,
                balance_due,
            };
            let paid_before = amount_paid(fine_amount, balance_due);
            if let AccrualAction::Update {
                new_amount,
                new_balance,
                ..
            } = decide(d(2024, 1, 1), d(2024, 1, 20), dec!(1.00), Some(&open))
            {
                assert_eq!(amount_paid(new_amount, new_balance), paid_before);
            } else {
                panic!("expected an update for {:?}", (fine_amount, balance_due));
            }
        }
    }

    #[test]
    fn clean_report_requires_zero_errors() {
        let mut report = AccrualReport::default();
        assert!(report.is_clean());
        report.errors.push("borrow 3: no borrow rule".to_string());
        assert!(!report.is_clean());
    }
}
