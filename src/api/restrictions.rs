//! Borrowing restriction endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;

use crate::{
    error::AppResult,
    models::{restriction::Restriction, user::UserType},
};

use super::AuthenticatedUser;

/// Get a user's current borrowing restrictions
#[utoipa::path(
    get,
    path = "/users/{id}/restrictions",
    tag = "restrictions",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "Current restrictions (empty when unrestricted)", body = Vec<Restriction>),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user_restrictions(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(user_id): Path<i32>,
) -> AppResult<Json<Vec<Restriction>>> {
    claims.require_librarian()?;

    let user = state.services.borrows.get_user(user_id).await?;
    let user_type = UserType::parse(&user.user_type)?;
    let today = Utc::now().date_naive();

    let restrictions = state
        .services
        .restrictions
        .get_restrictions(user_id, user_type, today)
        .await?;
    Ok(Json(restrictions))
}
