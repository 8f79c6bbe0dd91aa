//! Borrow lifecycle endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::{
        borrow::{BorrowDetails, BorrowRecord, CreateBorrow},
        enums::{BorrowStatus, RenewalMethod},
    },
};

use super::AuthenticatedUser;

/// Issue-loan request
#[derive(Deserialize, ToSchema)]
pub struct CreateBorrowRequest {
    /// Borrower user ID
    pub user_id: i32,
    /// Book ID
    pub book_id: i32,
}

/// Issue-loan response
#[derive(Serialize, ToSchema)]
pub struct CreateBorrowResponse {
    /// Borrow record ID
    pub id: i32,
    /// Due date
    pub due_date: NaiveDate,
    /// Status message
    pub message: String,
}

/// Status-change request
#[derive(Deserialize, ToSchema)]
pub struct ChangeStatusRequest {
    /// Target status
    pub new_status: BorrowStatus,
}

/// Renewal request
#[derive(Deserialize, ToSchema)]
pub struct RenewRequest {
    /// How the renewal was performed (defaults to librarian assisted)
    pub method: Option<RenewalMethod>,
}

/// Renewal response
#[derive(Serialize, ToSchema)]
pub struct RenewResponse {
    /// Borrow record ID
    pub id: i32,
    /// New due date
    pub new_due_date: NaiveDate,
    /// Renewal count after this renewal
    pub renewal_count: i16,
}

/// Issue a new loan
#[utoipa::path(
    post,
    path = "/borrows",
    tag = "borrows",
    security(("bearer_auth" = [])),
    request_body = CreateBorrowRequest,
    responses(
        (status = 201, description = "Loan issued", body = CreateBorrowResponse),
        (status = 404, description = "User or book not found"),
        (status = 409, description = "User restricted or book unavailable"),
        (status = 422, description = "Concurrent loan cap reached")
    )
)]
pub async fn create_borrow(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<CreateBorrowRequest>,
) -> AppResult<(StatusCode, Json<CreateBorrowResponse>)> {
    claims.require_librarian()?;

    let borrow = CreateBorrow {
        user_id: request.user_id,
        book_id: request.book_id,
    };
    let today = Utc::now().date_naive();
    let (id, due_date) = state
        .services
        .borrows
        .issue(&borrow, claims.user_id, today)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateBorrowResponse {
            id,
            due_date,
            message: "Book issued successfully".to_string(),
        }),
    ))
}

/// Get a borrow record
#[utoipa::path(
    get,
    path = "/borrows/{id}",
    tag = "borrows",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Borrow record ID")
    ),
    responses(
        (status = 200, description = "Borrow record", body = BorrowRecord),
        (status = 404, description = "Borrow record not found")
    )
)]
pub async fn get_borrow(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(borrow_id): Path<i32>,
) -> AppResult<Json<BorrowRecord>> {
    claims.require_librarian()?;

    let record = state.services.borrows.get(borrow_id).await?;
    Ok(Json(record))
}

/// Get active loans for a user
#[utoipa::path(
    get,
    path = "/users/{id}/borrows",
    tag = "borrows",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User's active loans", body = Vec<BorrowDetails>),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user_borrows(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(user_id): Path<i32>,
) -> AppResult<Json<Vec<BorrowDetails>>> {
    claims.require_librarian()?;

    let today = Utc::now().date_naive();
    let loans = state.services.borrows.list_for_user(user_id, today).await?;
    Ok(Json(loans))
}

/// Change the status of a borrow record
#[utoipa::path(
    post,
    path = "/borrows/{id}/status",
    tag = "borrows",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Borrow record ID")
    ),
    request_body = ChangeStatusRequest,
    responses(
        (status = 200, description = "Status changed", body = BorrowRecord),
        (status = 404, description = "Borrow record not found"),
        (status = 409, description = "Transition not allowed")
    )
)]
pub async fn change_status(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(borrow_id): Path<i32>,
    Json(request): Json<ChangeStatusRequest>,
) -> AppResult<Json<BorrowRecord>> {
    claims.require_librarian()?;

    let today = Utc::now().date_naive();
    let record = state
        .services
        .transitions
        .change_status(borrow_id, request.new_status, claims.user_id, today)
        .await?;
    Ok(Json(record))
}

/// Renew a loan
#[utoipa::path(
    post,
    path = "/borrows/{id}/renew",
    tag = "borrows",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Borrow record ID")
    ),
    request_body = RenewRequest,
    responses(
        (status = 200, description = "Loan renewed", body = RenewResponse),
        (status = 404, description = "No active loan with this ID"),
        (status = 409, description = "Another user is waiting for the book"),
        (status = 422, description = "Renewal cap reached")
    )
)]
pub async fn renew_borrow(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(borrow_id): Path<i32>,
    Json(request): Json<RenewRequest>,
) -> AppResult<Json<RenewResponse>> {
    claims.require_librarian()?;

    let method = request.method.unwrap_or(RenewalMethod::LibrarianAssisted);
    let (new_due_date, renewal_count) = state
        .services
        .renewals
        .renew(borrow_id, method, claims.user_id)
        .await?;

    Ok(Json(RenewResponse {
        id: borrow_id,
        new_due_date,
        renewal_count,
    }))
}
