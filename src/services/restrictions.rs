//! Restriction aggregator
//!
//! Read-only view of why a user may currently be blocked from borrowing.
//! Consumed at login and before issuing a loan; eventual consistency with
//! the latest committed state is fine, so no transaction is taken.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::{
    error::AppResult,
    models::{
        restriction::{Restriction, RestrictionType},
        user::UserType,
    },
    repository::Repository,
};

/// Turn the three aggregated findings into restriction entries.
/// `eligible` is None when the user has no row in the per-type table,
/// which blocks borrowing the same way an explicit false does.
pub fn build_restrictions(
    overdue_count: i64,
    open_fine_balance: Decimal,
    eligible: Option<bool>,
) -> Vec<Restriction> {
    let mut restrictions = Vec::new();

    if overdue_count > 0 {
        restrictions.push(Restriction {
            restriction_type: RestrictionType::OverdueItems,
            detail: overdue_count.to_string(),
            message: format!(
                "{} overdue item(s) must be returned before borrowing",
                overdue_count
            ),
        });
    }

    if open_fine_balance > Decimal::ZERO {
        restrictions.push(Restriction {
            restriction_type: RestrictionType::UnpaidFines,
            detail: open_fine_balance.to_string(),
            message: format!("Outstanding fines of RM{} must be settled", open_fine_balance),
        });
    }

    match eligible {
        Some(true) => {}
        Some(false) => restrictions.push(Restriction {
            restriction_type: RestrictionType::NotEligible,
            detail: "ineligible".to_string(),
            message: "Account is not eligible for borrowing".to_string(),
        }),
        None => restrictions.push(Restriction {
            restriction_type: RestrictionType::NotEligible,
            detail: "no_eligibility_record".to_string(),
            message: "No eligibility record found for this account".to_string(),
        }),
    }

    restrictions
}

#[derive(Clone)]
pub struct RestrictionsService {
    repository: Repository,
}

impl RestrictionsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Compute a user's current borrowing restrictions
    pub async fn get_restrictions(
        &self,
        user_id: i32,
        user_type: UserType,
        today: NaiveDate,
    ) -> AppResult<Vec<Restriction>> {
        let overdue_count = self
            .repository
            .borrows
            .count_overdue_for_user(user_id, today)
            .await?;
        let balance = self.repository.fines.sum_open_balance(user_id).await?;
        let eligible = self.repository.users.is_eligible(user_id, user_type).await?;

        Ok(build_restrictions(overdue_count, balance, eligible))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn unrestricted_user_has_no_entries() {
        assert!(build_restrictions(0, dec!(0.00), Some(true)).is_empty());
    }

    #[test]
    fn each_finding_becomes_one_entry() {
        let restrictions = build_restrictions(2, dec!(5.50), Some(false));
        assert_eq!(restrictions.len(), 3);
        assert_eq!(
            restrictions[0].restriction_type,
            RestrictionType::OverdueItems
        );
        assert_eq!(restrictions[0].detail, "2");
        assert_eq!(
            restrictions[1].restriction_type,
            RestrictionType::UnpaidFines
        );
        assert_eq!(restrictions[1].detail, "5.50");
        assert_eq!(
            restrictions[2].restriction_type,
            RestrictionType::NotEligible
        );
    }

    #[test]
    fn missing_eligibility_record_restricts() {
        let restrictions = build_restrictions(0, dec!(0.00), None);
        assert_eq!(restrictions.len(), 1);
        assert_eq!(
            restrictions[0].restriction_type,
            RestrictionType::NotEligible
        );
        assert_eq!(restrictions[0].detail, "no_eligibility_record");
    }
}
