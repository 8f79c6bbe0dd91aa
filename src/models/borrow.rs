//! Borrow record model and related types

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::enums::BorrowStatus;

/// One loan of one book to one user
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BorrowRecord {
    pub id: i32,
    pub user_id: i32,
    pub book_id: i32,
    pub borrow_date: NaiveDate,
    pub due_date: NaiveDate,
    pub return_date: Option<NaiveDate>,
    pub renewal_count: i16,
    pub status: BorrowStatus,
    #[schema(value_type = String)]
    pub fine_amount: Decimal,
    pub days_overdue: i32,
}

/// Active borrow with book details, for user loan listings
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BorrowDetails {
    pub id: i32,
    pub book_id: i32,
    pub book_title: String,
    pub borrow_date: NaiveDate,
    pub due_date: NaiveDate,
    pub renewal_count: i16,
    pub status: BorrowStatus,
    #[schema(value_type = String)]
    pub fine_amount: Decimal,
    pub is_overdue: bool,
}

/// Issue-loan request
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateBorrow {
    pub user_id: i32,
    pub book_id: i32,
}
