//! Contact message repository.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use shortcakes_core::ContactMessageId;

use super::{PAGE_SIZE, RepositoryError, page_offset};
use crate::models::contact::{ContactMessage, CreateContactInput};

/// Internal row type for contact message queries.
#[derive(Debug, sqlx::FromRow)]
struct ContactRow {
    id: i32,
    name: String,
    email: String,
    subject: String,
    body: String,
    is_read: bool,
    created_at: DateTime<Utc>,
}

impl From<ContactRow> for ContactMessage {
    fn from(row: ContactRow) -> Self {
        Self {
            id: ContactMessageId::new(row.id),
            name: row.name,
            email: row.email,
            subject: row.subject,
            body: row.body,
            is_read: row.is_read,
            created_at: row.created_at,
        }
    }
}

const CONTACT_COLUMNS: &str = "id, name, email, subject, body, is_read, created_at";

/// Repository for contact message database operations.
pub struct ContactRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ContactRepository<'a> {
    /// Create a new contact repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Store a submitted message.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create(
        &self,
        input: &CreateContactInput,
    ) -> Result<ContactMessage, RepositoryError> {
        let row = sqlx::query_as::<_, ContactRow>(&format!(
            "INSERT INTO contact_message (name, email, subject, body)
             VALUES ($1, $2, $3, $4)
             RETURNING {CONTACT_COLUMNS}"
        ))
        .bind(&input.name)
        .bind(&input.email)
        .bind(&input.subject)
        .bind(&input.body)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    /// List messages, newest first, optionally unread only.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(
        &self,
        unread_only: bool,
        page: i64,
    ) -> Result<Vec<ContactMessage>, RepositoryError> {
        let rows = sqlx::query_as::<_, ContactRow>(&format!(
            "SELECT {CONTACT_COLUMNS} FROM contact_message
             WHERE ($1 = false OR is_read = false)
             ORDER BY created_at DESC
             LIMIT $2 OFFSET $3"
        ))
        .bind(unread_only)
        .bind(PAGE_SIZE)
        .bind(page_offset(page))
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Mark a message as read.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the message doesn't exist.
    pub async fn mark_read(&self, id: ContactMessageId) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE contact_message SET is_read = true WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Delete a message.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the message doesn't exist.
    pub async fn delete(&self, id: ContactMessageId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM contact_message WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
