//! Auth repository: bearer tokens and password reset codes.
//!
//! Tokens and reset codes are stored as SHA-256 hex digests; the plaintext
//! never touches the database.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use shortcakes_core::{CustomerId, Email, ResetId, Role};

use super::RepositoryError;
use crate::models::customer::CurrentCustomer;

/// A password reset code row.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PasswordReset {
    pub id: ResetId,
    pub customer_id: CustomerId,
    pub code_hash: String,
    pub expires_at: DateTime<Utc>,
    pub attempts: i32,
    pub used: bool,
}

/// Repository for token and reset-code database operations.
pub struct AuthRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> AuthRepository<'a> {
    /// Create a new auth repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    // Bearer tokens
    // =========================================================================

    /// Store a new bearer token hash for a customer.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn insert_token(
        &self,
        customer_id: CustomerId,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO auth_token (customer_id, token_hash, expires_at) VALUES ($1, $2, $3)",
        )
        .bind(customer_id)
        .bind(token_hash)
        .bind(expires_at)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Resolve a token hash to its customer, ignoring expired tokens.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored email is invalid.
    pub async fn resolve_token(
        &self,
        token_hash: &str,
    ) -> Result<Option<CurrentCustomer>, RepositoryError> {
        #[derive(sqlx::FromRow)]
        struct Row {
            id: i32,
            email: String,
            role: Role,
        }

        let row = sqlx::query_as::<_, Row>(
            "SELECT c.id, c.email, c.role
             FROM auth_token t
             JOIN customer c ON c.id = t.customer_id
             WHERE t.token_hash = $1 AND t.expires_at > now()",
        )
        .bind(token_hash)
        .fetch_optional(self.pool)
        .await?;

        match row {
            Some(r) => {
                let email = Email::parse(&r.email).map_err(|e| {
                    RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
                })?;
                Ok(Some(CurrentCustomer {
                    id: CustomerId::new(r.id),
                    email,
                    role: r.role,
                }))
            }
            None => Ok(None),
        }
    }

    /// Revoke a token by hash (logout). Revoking an unknown token is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn revoke_token(&self, token_hash: &str) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM auth_token WHERE token_hash = $1")
            .bind(token_hash)
            .execute(self.pool)
            .await?;
        Ok(())
    }

    // =========================================================================
    // Password reset codes
    // =========================================================================

    /// Create a reset code for a customer, superseding any active one.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create_reset(
        &self,
        customer_id: CustomerId,
        code_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("UPDATE password_reset SET used = true WHERE customer_id = $1 AND used = false")
            .bind(customer_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            "INSERT INTO password_reset (customer_id, code_hash, expires_at) VALUES ($1, $2, $3)",
        )
        .bind(customer_id)
        .bind(code_hash)
        .bind(expires_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Get the active (unused) reset code for a customer, if any.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_active_reset(
        &self,
        customer_id: CustomerId,
    ) -> Result<Option<PasswordReset>, RepositoryError> {
        let row = sqlx::query_as::<_, PasswordReset>(
            "SELECT id, customer_id, code_hash, expires_at, attempts, used
             FROM password_reset
             WHERE customer_id = $1 AND used = false
             ORDER BY id DESC
             LIMIT 1",
        )
        .bind(customer_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row)
    }

    /// Record a failed verification attempt; returns the new attempt count.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the reset row doesn't exist.
    pub async fn record_failed_attempt(&self, id: ResetId) -> Result<i32, RepositoryError> {
        let attempts: i32 = sqlx::query_scalar(
            "UPDATE password_reset SET attempts = attempts + 1 WHERE id = $1 RETURNING attempts",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(attempts)
    }

    /// Consume a reset code after a successful verification.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the reset row doesn't exist.
    pub async fn mark_reset_used(&self, id: ResetId) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE password_reset SET used = true WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
