//! Fine model and money arithmetic
//!
//! `amount_paid` is never stored. It is derived from the stored pair so the
//! `balance_due = fine_amount - amount_paid` invariant cannot drift apart
//! from a forgotten write site.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::enums::PaymentStatus;

pub const FINE_REASON_OVERDUE: &str = "overdue";

/// Fine row tied to a borrow record
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Fine {
    pub id: i32,
    pub borrow_id: i32,
    pub user_id: i32,
    #[schema(value_type = String)]
    pub fine_amount: Decimal,
    pub fine_reason: String,
    #[schema(value_type = String)]
    pub balance_due: Decimal,
    pub payment_status: PaymentStatus,
    pub created_date: DateTime<Utc>,
    pub updated_date: DateTime<Utc>,
}

impl Fine {
    /// Money already applied against this fine
    pub fn amount_paid(&self) -> Decimal {
        amount_paid(self.fine_amount, self.balance_due)
    }
}

/// Derive the amount paid from the stored pair
pub fn amount_paid(fine_amount: Decimal, balance_due: Decimal) -> Decimal {
    fine_amount - balance_due
}

/// Balance after recomputing the fine to a new total, preserving whatever
/// was already paid. Floored at zero for the overpaid case.
pub fn rebalanced(new_fine_amount: Decimal, amount_paid: Decimal) -> Decimal {
    let balance = new_fine_amount - amount_paid;
    if balance < Decimal::ZERO {
        Decimal::ZERO
    } else {
        balance
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn amount_paid_is_the_stored_difference() {
        assert_eq!(amount_paid(dec!(6.00), dec!(4.00)), dec!(2.00));
        assert_eq!(amount_paid(dec!(4.00), dec!(4.00)), dec!(0.00));
    }

    #[test]
    fn rebalance_preserves_partial_payment() {
        // fine grew from 6.00 to 7.00 with 2.00 already paid
        assert_eq!(rebalanced(dec!(7.00), dec!(2.00)), dec!(5.00));
    }

    #[test]
    fn rebalance_floors_overpayment_at_zero() {
        assert_eq!(rebalanced(dec!(3.00), dec!(5.00)), dec!(0.00));
    }

    #[test]
    fn invariant_holds_after_rebalance() {
        let new_amount = dec!(7.00);
        let paid = dec!(2.00);
        let balance = rebalanced(new_amount, paid);
        assert_eq!(amount_paid(new_amount, balance), paid);
    }
}
