//! Audit log repository.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use shortcakes_core::{AuditLogId, CustomerId};

use super::{PAGE_SIZE, RepositoryError, page_offset};
use crate::models::audit::AuditEntry;

/// Internal row type for audit log queries.
#[derive(Debug, sqlx::FromRow)]
struct AuditRow {
    id: i32,
    admin_id: i32,
    action: String,
    entity: String,
    entity_id: Option<i32>,
    detail: serde_json::Value,
    created_at: DateTime<Utc>,
}

impl From<AuditRow> for AuditEntry {
    fn from(row: AuditRow) -> Self {
        Self {
            id: AuditLogId::new(row.id),
            admin_id: CustomerId::new(row.admin_id),
            action: row.action,
            entity: row.entity,
            entity_id: row.entity_id,
            detail: row.detail,
            created_at: row.created_at,
        }
    }
}

/// Repository for audit log database operations.
pub struct AuditRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> AuditRepository<'a> {
    /// Create a new audit repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Append an audit entry.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn record(
        &self,
        admin_id: CustomerId,
        action: &str,
        entity: &str,
        entity_id: Option<i32>,
        detail: serde_json::Value,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO audit_log (admin_id, action, entity, entity_id, detail)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(admin_id)
        .bind(action)
        .bind(entity)
        .bind(entity_id)
        .bind(detail)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// List audit entries, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, page: i64) -> Result<Vec<AuditEntry>, RepositoryError> {
        let rows = sqlx::query_as::<_, AuditRow>(
            "SELECT id, admin_id, action, entity, entity_id, detail, created_at
             FROM audit_log
             ORDER BY created_at DESC
             LIMIT $1 OFFSET $2",
        )
        .bind(PAGE_SIZE)
        .bind(page_offset(page))
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
