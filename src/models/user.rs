//! User model, user types and JWT claims

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};

/// User model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i32,
    pub identification: String,
    pub firstname: String,
    pub lastname: String,
    pub user_type: String,
    pub created_at: DateTime<Utc>,
}

/// Borrower category, driving borrow rules and the eligibility lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    Student,
    Staff,
}

impl UserType {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserType::Student => "student",
            UserType::Staff => "staff",
        }
    }

    pub fn parse(s: &str) -> AppResult<Self> {
        match s {
            "student" => Ok(UserType::Student),
            "staff" => Ok(UserType::Staff),
            other => Err(AppError::InvalidInput(format!(
                "Unknown user type '{}'",
                other
            ))),
        }
    }
}

impl std::fmt::Display for UserType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Where the eligibility flag for a user type lives
#[derive(Debug, Clone, Copy)]
pub struct EligibilitySource {
    pub table: &'static str,
    pub column: &'static str,
}

/// Static mapping from user type to its eligibility table/column. Queries
/// are built from these constants only, never from request-supplied text.
pub static ELIGIBILITY_SOURCES: Lazy<HashMap<UserType, EligibilitySource>> = Lazy::new(|| {
    HashMap::from([
        (
            UserType::Student,
            EligibilitySource {
                table: "students",
                column: "is_eligible",
            },
        ),
        (
            UserType::Staff,
            EligibilitySource {
                table: "staff",
                column: "is_eligible",
            },
        ),
    ])
});

/// Per-user-type borrowing rule
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BorrowRule {
    pub user_type: String,
    pub max_renewals_allowed: i16,
    pub borrow_period_days: i16,
    #[schema(value_type = String)]
    pub overdue_fine_per_day: rust_decimal::Decimal,
    pub max_concurrent_loans: i16,
}

/// JWT claims supplied by the external auth service. The circulation core
/// trusts the verified identity and role carried here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserClaims {
    pub sub: String,
    pub user_id: i32,
    pub role: String,
    pub exp: i64,
    pub iat: i64,
}

impl UserClaims {
    /// Parse and verify a JWT token
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }

    /// Create a token (used by tests and tooling; production tokens are
    /// minted by the auth service)
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    pub fn require_librarian(&self) -> Result<(), AppError> {
        if self.role == "librarian" || self.role == "admin" {
            Ok(())
        } else {
            Err(AppError::Authorization(
                "Librarian role required".to_string(),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eligibility_mapping_is_total_over_user_types() {
        for ut in [UserType::Student, UserType::Staff] {
            let source = ELIGIBILITY_SOURCES.get(&ut).expect("missing mapping");
            assert!(!source.table.is_empty());
            assert_eq!(source.column, "is_eligible");
        }
    }

    #[test]
    fn user_type_parse_rejects_unknown() {
        assert!(UserType::parse("student").is_ok());
        assert!(UserType::parse("staff").is_ok());
        assert!(UserType::parse("admin; DROP TABLE users").is_err());
    }
}
