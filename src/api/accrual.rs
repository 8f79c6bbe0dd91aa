//! On-demand fine accrual endpoint

use axum::{extract::State, Json};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::{error::AppResult, services::accrual::AccrualReport};

use super::AuthenticatedUser;

/// Accrual trigger request
#[derive(Deserialize, ToSchema, Default)]
pub struct RunAccrualRequest {
    /// Sweep date; defaults to today
    pub as_of: Option<NaiveDate>,
}

/// Run the daily fine accrual sweep now
#[utoipa::path(
    post,
    path = "/accrual/run",
    tag = "accrual",
    security(("bearer_auth" = [])),
    request_body = RunAccrualRequest,
    responses(
        (status = 200, description = "Sweep committed", body = AccrualReport),
        (status = 500, description = "Sweep failed and rolled back")
    )
)]
pub async fn run_accrual(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<RunAccrualRequest>,
) -> AppResult<Json<AccrualReport>> {
    claims.require_librarian()?;

    let as_of = request.as_of.unwrap_or_else(|| Utc::now().date_naive());
    let report = state.services.accrual.run_daily_accrual(as_of).await?;
    Ok(Json(report))
}
