//! Weekly schedule repository.

use chrono::NaiveTime;
use sqlx::PgPool;

use shortcakes_core::ScheduleId;

use super::RepositoryError;
use crate::models::schedule::{ScheduleDay, UpsertScheduleInput};

/// Internal row type for schedule queries.
#[derive(Debug, sqlx::FromRow)]
struct ScheduleRow {
    id: i32,
    day_of_week: i32,
    opens_at: NaiveTime,
    closes_at: NaiveTime,
    is_open: bool,
    note: Option<String>,
}

impl From<ScheduleRow> for ScheduleDay {
    fn from(row: ScheduleRow) -> Self {
        Self {
            id: ScheduleId::new(row.id),
            day_of_week: row.day_of_week,
            opens_at: row.opens_at,
            closes_at: row.closes_at,
            is_open: row.is_open,
            note: row.note,
        }
    }
}

const SCHEDULE_COLUMNS: &str = "id, day_of_week, opens_at, closes_at, is_open, note";

/// Repository for schedule database operations.
pub struct ScheduleRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ScheduleRepository<'a> {
    /// Create a new schedule repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List the week, Sunday first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<ScheduleDay>, RepositoryError> {
        let rows = sqlx::query_as::<_, ScheduleRow>(&format!(
            "SELECT {SCHEDULE_COLUMNS} FROM schedule ORDER BY day_of_week"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Set one weekday's hours, inserting or replacing.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn upsert(
        &self,
        day_of_week: i32,
        input: &UpsertScheduleInput,
    ) -> Result<ScheduleDay, RepositoryError> {
        let row = sqlx::query_as::<_, ScheduleRow>(&format!(
            "INSERT INTO schedule (day_of_week, opens_at, closes_at, is_open, note)
             VALUES ($1, $2, $3, $4, $5)
             ON CONFLICT (day_of_week) DO UPDATE SET
                 opens_at = EXCLUDED.opens_at,
                 closes_at = EXCLUDED.closes_at,
                 is_open = EXCLUDED.is_open,
                 note = EXCLUDED.note
             RETURNING {SCHEDULE_COLUMNS}"
        ))
        .bind(day_of_week)
        .bind(input.opens_at)
        .bind(input.closes_at)
        .bind(input.is_open)
        .bind(input.note.as_deref())
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }
}
