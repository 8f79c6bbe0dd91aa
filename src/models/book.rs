//! Book model

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::enums::BookStatus;

/// Physical book in the collection
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Book {
    pub id: i32,
    pub identification: String,
    pub title: String,
    pub author: Option<String>,
    pub status: BookStatus,
}
