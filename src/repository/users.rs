//! Users repository: user lookup, borrow rules and the eligibility flag

use sqlx::{Pool, Postgres, Transaction};

use crate::{
    error::{AppError, AppResult},
    models::user::{BorrowRule, User, UserType, ELIGIBILITY_SOURCES},
};

#[derive(Clone)]
pub struct UsersRepository {
    pool: Pool<Postgres>,
}

impl UsersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get user by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<User> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", id)))
    }

    /// Borrow rule for a user type, read inside the caller's transaction
    pub async fn get_rule(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user_type: UserType,
    ) -> AppResult<BorrowRule> {
        sqlx::query_as::<_, BorrowRule>("SELECT * FROM borrow_rules WHERE user_type = $1")
            .bind(user_type.as_str())
            .fetch_optional(&mut **tx)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("No borrow rule for user type '{}'", user_type))
            })
    }

    /// Eligibility flag from the per-type table. The table and column come
    /// from the static mapping, never from request text; only the user ID
    /// is bound. None when the user has no row in the per-type table.
    pub async fn is_eligible(
        &self,
        user_id: i32,
        user_type: UserType,
    ) -> AppResult<Option<bool>> {
        let source = ELIGIBILITY_SOURCES
            .get(&user_type)
            .ok_or_else(|| AppError::Internal(format!("No eligibility source for {}", user_type)))?;

        let sql = format!(
            "SELECT {} FROM {} WHERE user_id = $1",
            source.column, source.table
        );

        let flag: Option<bool> = sqlx::query_scalar(&sql)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(flag)
    }
}
