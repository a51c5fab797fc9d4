//! Promotion repository.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use shortcakes_core::PromotionId;

use super::RepositoryError;
use crate::models::promotion::{CreatePromotionInput, Promotion, UpdatePromotionInput};

/// Internal row type for promotion queries.
#[derive(Debug, sqlx::FromRow)]
struct PromotionRow {
    id: i32,
    code: String,
    description: String,
    percent_off: i32,
    starts_at: DateTime<Utc>,
    ends_at: DateTime<Utc>,
    is_active: bool,
}

impl From<PromotionRow> for Promotion {
    fn from(row: PromotionRow) -> Self {
        Self {
            id: PromotionId::new(row.id),
            code: row.code,
            description: row.description,
            percent_off: row.percent_off,
            starts_at: row.starts_at,
            ends_at: row.ends_at,
            is_active: row.is_active,
        }
    }
}

const PROMOTION_COLUMNS: &str = "id, code, description, percent_off, starts_at, ends_at, is_active";

/// Repository for promotion database operations.
pub struct PromotionRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> PromotionRepository<'a> {
    /// Create a new promotion repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all promotions.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Promotion>, RepositoryError> {
        let rows = sqlx::query_as::<_, PromotionRow>(&format!(
            "SELECT {PROMOTION_COLUMNS} FROM promotion ORDER BY starts_at DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Look up a promotion by code, case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_code(&self, code: &str) -> Result<Option<Promotion>, RepositoryError> {
        let row = sqlx::query_as::<_, PromotionRow>(&format!(
            "SELECT {PROMOTION_COLUMNS} FROM promotion WHERE code = upper($1)"
        ))
        .bind(code)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Create a promotion. The code is stored uppercased.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the code already exists.
    pub async fn create(
        &self,
        input: &CreatePromotionInput,
    ) -> Result<Promotion, RepositoryError> {
        let row = sqlx::query_as::<_, PromotionRow>(&format!(
            "INSERT INTO promotion (code, description, percent_off, starts_at, ends_at, is_active)
             VALUES (upper($1), $2, $3, $4, $5, $6)
             RETURNING {PROMOTION_COLUMNS}"
        ))
        .bind(&input.code)
        .bind(&input.description)
        .bind(input.percent_off)
        .bind(input.starts_at)
        .bind(input.ends_at)
        .bind(input.is_active)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("promotion code already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        Ok(row.into())
    }

    /// Update a promotion. Absent fields are left unchanged.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the promotion doesn't exist.
    pub async fn update(
        &self,
        id: PromotionId,
        input: &UpdatePromotionInput,
    ) -> Result<Promotion, RepositoryError> {
        let row = sqlx::query_as::<_, PromotionRow>(&format!(
            "UPDATE promotion SET
                 description = COALESCE($2, description),
                 percent_off = COALESCE($3, percent_off),
                 starts_at = COALESCE($4, starts_at),
                 ends_at = COALESCE($5, ends_at),
                 is_active = COALESCE($6, is_active)
             WHERE id = $1
             RETURNING {PROMOTION_COLUMNS}"
        ))
        .bind(id)
        .bind(input.description.as_deref())
        .bind(input.percent_off)
        .bind(input.starts_at)
        .bind(input.ends_at)
        .bind(input.is_active)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(row.into())
    }

    /// Delete a promotion.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the promotion doesn't exist.
    pub async fn delete(&self, id: PromotionId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM promotion WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
