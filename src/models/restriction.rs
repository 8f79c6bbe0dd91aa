//! Borrowing restriction types

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Why a user is currently blocked (or limited) from borrowing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RestrictionType {
    OverdueItems,
    UnpaidFines,
    NotEligible,
}

/// One computed restriction entry
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Restriction {
    pub restriction_type: RestrictionType,
    pub detail: String,
    pub message: String,
}
