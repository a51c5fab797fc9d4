//! Delivery zone repository.

use rust_decimal::Decimal;
use sqlx::PgPool;

use shortcakes_core::DeliveryZoneId;

use super::RepositoryError;
use crate::models::delivery_zone::{CreateZoneInput, DeliveryZone, UpdateZoneInput};

/// Internal row type for delivery zone queries.
#[derive(Debug, sqlx::FromRow)]
struct ZoneRow {
    id: i32,
    name: String,
    postal_prefixes: Vec<String>,
    fee: Decimal,
    is_active: bool,
}

impl From<ZoneRow> for DeliveryZone {
    fn from(row: ZoneRow) -> Self {
        Self {
            id: DeliveryZoneId::new(row.id),
            name: row.name,
            postal_prefixes: row.postal_prefixes,
            fee: row.fee,
            is_active: row.is_active,
        }
    }
}

const ZONE_COLUMNS: &str = "id, name, postal_prefixes, fee, is_active";

/// Repository for delivery zone database operations.
pub struct DeliveryZoneRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> DeliveryZoneRepository<'a> {
    /// Create a new delivery zone repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all zones.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<DeliveryZone>, RepositoryError> {
        let rows = sqlx::query_as::<_, ZoneRow>(&format!(
            "SELECT {ZONE_COLUMNS} FROM delivery_zone ORDER BY name"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Find the active zone covering a postal code, if any.
    ///
    /// Matching happens in Rust over the active zones; the zone list is
    /// small (a bakery delivers to a handful of neighborhoods).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_for_postal_code(
        &self,
        postal_code: &str,
    ) -> Result<Option<DeliveryZone>, RepositoryError> {
        let zones = self.list().await?;
        Ok(zones.into_iter().find(|z| z.covers(postal_code)))
    }

    /// Create a zone.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create(&self, input: &CreateZoneInput) -> Result<DeliveryZone, RepositoryError> {
        let row = sqlx::query_as::<_, ZoneRow>(&format!(
            "INSERT INTO delivery_zone (name, postal_prefixes, fee, is_active)
             VALUES ($1, $2, $3, $4)
             RETURNING {ZONE_COLUMNS}"
        ))
        .bind(&input.name)
        .bind(&input.postal_prefixes)
        .bind(input.fee)
        .bind(input.is_active)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    /// Update a zone. Absent fields are left unchanged.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the zone doesn't exist.
    pub async fn update(
        &self,
        id: DeliveryZoneId,
        input: &UpdateZoneInput,
    ) -> Result<DeliveryZone, RepositoryError> {
        let row = sqlx::query_as::<_, ZoneRow>(&format!(
            "UPDATE delivery_zone SET
                 name = COALESCE($2, name),
                 postal_prefixes = COALESCE($3, postal_prefixes),
                 fee = COALESCE($4, fee),
                 is_active = COALESCE($5, is_active)
             WHERE id = $1
             RETURNING {ZONE_COLUMNS}"
        ))
        .bind(id)
        .bind(input.name.as_deref())
        .bind(input.postal_prefixes.as_deref())
        .bind(input.fee)
        .bind(input.is_active)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(row.into())
    }

    /// Delete a zone.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the zone doesn't exist.
    pub async fn delete(&self, id: DeliveryZoneId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM delivery_zone WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
