//! Shared domain enums (stored as i16 codes in Postgres)

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ---------------------------------------------------------------------------
// BorrowStatus
// ---------------------------------------------------------------------------

/// Lifecycle status of a borrow record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
#[repr(i16)]
pub enum BorrowStatus {
    Borrowed = 0,
    Renewed = 1,
    Returned = 2,
    Overdue = 3,
    Lost = 4,
}

impl BorrowStatus {
    /// Explicit transition table. The legacy system let any status move to
    /// any other; here the graph is enumerated and everything else rejected.
    pub fn can_transition_to(self, next: BorrowStatus) -> bool {
        use BorrowStatus::*;
        matches!(
            (self, next),
            (Borrowed, Renewed | Returned | Overdue | Lost)
                | (Renewed, Renewed | Returned | Overdue | Lost)
                | (Overdue, Returned | Lost)
                | (Lost, Returned)
        )
    }

    /// Statuses counted as an active loan (the book is out)
    pub fn is_active(self) -> bool {
        matches!(
            self,
            BorrowStatus::Borrowed | BorrowStatus::Renewed | BorrowStatus::Overdue
        )
    }

    /// Statuses from which a renewal may be granted
    pub fn is_renewable(self) -> bool {
        matches!(self, BorrowStatus::Borrowed | BorrowStatus::Renewed)
    }
}

impl From<i16> for BorrowStatus {
    fn from(v: i16) -> Self {
        match v {
            1 => BorrowStatus::Renewed,
            2 => BorrowStatus::Returned,
            3 => BorrowStatus::Overdue,
            4 => BorrowStatus::Lost,
            _ => BorrowStatus::Borrowed,
        }
    }
}

impl From<BorrowStatus> for i16 {
    fn from(s: BorrowStatus) -> Self {
        s as i16
    }
}

impl std::fmt::Display for BorrowStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            BorrowStatus::Borrowed => "borrowed",
            BorrowStatus::Renewed => "renewed",
            BorrowStatus::Returned => "returned",
            BorrowStatus::Overdue => "overdue",
            BorrowStatus::Lost => "lost",
        };
        write!(f, "{}", label)
    }
}

// ---------------------------------------------------------------------------
// BookStatus
// ---------------------------------------------------------------------------

/// Status of a physical book; derived from its owning borrow record,
/// never set independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
#[repr(i16)]
pub enum BookStatus {
    Available = 0,
    Borrowed = 1,
    Reserved = 2,
    Lost = 3,
}

impl BookStatus {
    /// Recompute the book status after its borrow record changed
    pub fn derived_from(borrow: BorrowStatus) -> Self {
        match borrow {
            BorrowStatus::Returned => BookStatus::Available,
            BorrowStatus::Lost => BookStatus::Lost,
            _ => BookStatus::Borrowed,
        }
    }
}

impl From<i16> for BookStatus {
    fn from(v: i16) -> Self {
        match v {
            1 => BookStatus::Borrowed,
            2 => BookStatus::Reserved,
            3 => BookStatus::Lost,
            _ => BookStatus::Available,
        }
    }
}

impl From<BookStatus> for i16 {
    fn from(s: BookStatus) -> Self {
        s as i16
    }
}

// ---------------------------------------------------------------------------
// PaymentStatus
// ---------------------------------------------------------------------------

/// Payment status of a fine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
#[repr(i16)]
pub enum PaymentStatus {
    Unpaid = 0,
    PartialPaid = 1,
    Paid = 2,
}

impl PaymentStatus {
    /// A fine is open while money is still owed on it
    pub fn is_open(self) -> bool {
        matches!(self, PaymentStatus::Unpaid | PaymentStatus::PartialPaid)
    }
}

impl From<i16> for PaymentStatus {
    fn from(v: i16) -> Self {
        match v {
            1 => PaymentStatus::PartialPaid,
            2 => PaymentStatus::Paid,
            _ => PaymentStatus::Unpaid,
        }
    }
}

impl From<PaymentStatus> for i16 {
    fn from(s: PaymentStatus) -> Self {
        s as i16
    }
}

// ---------------------------------------------------------------------------
// ReservationStatus
// ---------------------------------------------------------------------------

/// Status of a reservation in the hold queue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
#[repr(i16)]
pub enum ReservationStatus {
    Waiting = 0,
    Fulfilled = 1,
    Cancelled = 2,
    Expired = 3,
}

impl From<i16> for ReservationStatus {
    fn from(v: i16) -> Self {
        match v {
            1 => ReservationStatus::Fulfilled,
            2 => ReservationStatus::Cancelled,
            3 => ReservationStatus::Expired,
            _ => ReservationStatus::Waiting,
        }
    }
}

impl From<ReservationStatus> for i16 {
    fn from(s: ReservationStatus) -> Self {
        s as i16
    }
}

// ---------------------------------------------------------------------------
// NotificationPriority
// ---------------------------------------------------------------------------

/// Delivery priority of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
#[repr(i16)]
pub enum NotificationPriority {
    Normal = 0,
    High = 1,
}

impl From<i16> for NotificationPriority {
    fn from(v: i16) -> Self {
        match v {
            1 => NotificationPriority::High,
            _ => NotificationPriority::Normal,
        }
    }
}

impl From<NotificationPriority> for i16 {
    fn from(p: NotificationPriority) -> Self {
        p as i16
    }
}

// ---------------------------------------------------------------------------
// RenewalMethod
// ---------------------------------------------------------------------------

/// How a renewal was performed (stored as a string in the audit row)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RenewalMethod {
    LibrarianAssisted,
    SelfService,
}

impl RenewalMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            RenewalMethod::LibrarianAssisted => "librarian_assisted",
            RenewalMethod::SelfService => "self_service",
        }
    }
}

impl std::fmt::Display for RenewalMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn borrowed_may_move_to_every_follow_up_status() {
        for next in [
            BorrowStatus::Renewed,
            BorrowStatus::Returned,
            BorrowStatus::Overdue,
            BorrowStatus::Lost,
        ] {
            assert!(BorrowStatus::Borrowed.can_transition_to(next));
        }
    }

    #[test]
    fn returned_is_terminal() {
        for next in [
            BorrowStatus::Borrowed,
            BorrowStatus::Renewed,
            BorrowStatus::Returned,
            BorrowStatus::Overdue,
            BorrowStatus::Lost,
        ] {
            assert!(!BorrowStatus::Returned.can_transition_to(next));
        }
    }

    #[test]
    fn overdue_cannot_be_renewed_only_closed() {
        assert!(BorrowStatus::Overdue.can_transition_to(BorrowStatus::Returned));
        assert!(BorrowStatus::Overdue.can_transition_to(BorrowStatus::Lost));
        assert!(!BorrowStatus::Overdue.can_transition_to(BorrowStatus::Renewed));
        assert!(!BorrowStatus::Overdue.can_transition_to(BorrowStatus::Borrowed));
    }

    #[test]
    fn lost_book_can_still_come_back() {
        assert!(BorrowStatus::Lost.can_transition_to(BorrowStatus::Returned));
        assert!(!BorrowStatus::Lost.can_transition_to(BorrowStatus::Borrowed));
    }

    #[test]
    fn no_self_transitions_except_repeat_renewal() {
        assert!(BorrowStatus::Renewed.can_transition_to(BorrowStatus::Renewed));
        assert!(!BorrowStatus::Borrowed.can_transition_to(BorrowStatus::Borrowed));
        assert!(!BorrowStatus::Overdue.can_transition_to(BorrowStatus::Overdue));
    }

    #[test]
    fn book_status_derivation() {
        assert_eq!(
            BookStatus::derived_from(BorrowStatus::Returned),
            BookStatus::Available
        );
        assert_eq!(
            BookStatus::derived_from(BorrowStatus::Lost),
            BookStatus::Lost
        );
        assert_eq!(
            BookStatus::derived_from(BorrowStatus::Borrowed),
            BookStatus::Borrowed
        );
        assert_eq!(
            BookStatus::derived_from(BorrowStatus::Overdue),
            BookStatus::Borrowed
        );
    }

    #[test]
    fn status_codes_round_trip() {
        for s in [
            BorrowStatus::Borrowed,
            BorrowStatus::Renewed,
            BorrowStatus::Returned,
            BorrowStatus::Overdue,
            BorrowStatus::Lost,
        ] {
            assert_eq!(BorrowStatus::from(i16::from(s)), s);
        }
    }
}
