//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{accrual, borrows, health, restrictions};
use crate::error::ErrorResponse;
use crate::models::{
    borrow::{BorrowDetails, BorrowRecord},
    enums::{BookStatus, BorrowStatus, NotificationPriority, PaymentStatus, RenewalMethod,
            ReservationStatus},
    restriction::{Restriction, RestrictionType},
    user::UserType,
};
use crate::services::accrual::AccrualReport;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Circulation API",
        version = "0.3.0",
        description = "School library circulation REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Borrows
        borrows::create_borrow,
        borrows::get_borrow,
        borrows::get_user_borrows,
        borrows::change_status,
        borrows::renew_borrow,
        // Restrictions
        restrictions::get_user_restrictions,
        // Accrual
        accrual::run_accrual,
    ),
    components(schemas(
        health::HealthResponse,
        borrows::CreateBorrowRequest,
        borrows::CreateBorrowResponse,
        borrows::ChangeStatusRequest,
        borrows::RenewRequest,
        borrows::RenewResponse,
        accrual::RunAccrualRequest,
        AccrualReport,
        BorrowRecord,
        BorrowDetails,
        BorrowStatus,
        BookStatus,
        PaymentStatus,
        ReservationStatus,
        NotificationPriority,
        RenewalMethod,
        Restriction,
        RestrictionType,
        UserType,
        ErrorResponse,
    )),
    tags(
        (name = "health", description = "Service health"),
        (name = "borrows", description = "Borrow lifecycle"),
        (name = "restrictions", description = "Borrowing restrictions"),
        (name = "accrual", description = "Fine accrual batch")
    )
)]
pub struct ApiDoc;

/// Create the Swagger UI router
pub fn create_openapi_router() -> Router {
    Router::new().merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
