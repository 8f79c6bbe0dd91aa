//! Reservation model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::enums::ReservationStatus;

/// Hold placed by a user on a book
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Reservation {
    pub id: i32,
    pub user_id: i32,
    pub book_id: i32,
    pub status: ReservationStatus,
    pub queue_position: i16,
    pub created_at: DateTime<Utc>,
}
