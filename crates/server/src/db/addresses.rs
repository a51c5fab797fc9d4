//! Address book repository.

use sqlx::PgPool;

use shortcakes_core::{AddressId, CustomerId};

use super::RepositoryError;
use crate::models::customer::{Address, CreateAddressInput, UpdateAddressInput};

/// Internal row type for address queries.
#[derive(Debug, sqlx::FromRow)]
struct AddressRow {
    id: i32,
    customer_id: i32,
    label: String,
    street: String,
    city: String,
    postal_code: String,
    notes: Option<String>,
    is_default: bool,
}

impl From<AddressRow> for Address {
    fn from(row: AddressRow) -> Self {
        Self {
            id: AddressId::new(row.id),
            customer_id: CustomerId::new(row.customer_id),
            label: row.label,
            street: row.street,
            city: row.city,
            postal_code: row.postal_code,
            notes: row.notes,
            is_default: row.is_default,
        }
    }
}

const ADDRESS_COLUMNS: &str = "id, customer_id, label, street, city, postal_code, notes, is_default";

/// Repository for address database operations.
pub struct AddressRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> AddressRepository<'a> {
    /// Create a new address repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List a customer's addresses, default first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_customer(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<Address>, RepositoryError> {
        let rows = sqlx::query_as::<_, AddressRow>(&format!(
            "SELECT {ADDRESS_COLUMNS} FROM address
             WHERE customer_id = $1
             ORDER BY is_default DESC, id"
        ))
        .bind(customer_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Get one address, scoped to its owner.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(
        &self,
        customer_id: CustomerId,
        id: AddressId,
    ) -> Result<Option<Address>, RepositoryError> {
        let row = sqlx::query_as::<_, AddressRow>(&format!(
            "SELECT {ADDRESS_COLUMNS} FROM address WHERE id = $1 AND customer_id = $2"
        ))
        .bind(id)
        .bind(customer_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Create an address. Marking it default clears the previous default.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create(
        &self,
        customer_id: CustomerId,
        input: &CreateAddressInput,
    ) -> Result<Address, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        if input.is_default {
            sqlx::query("UPDATE address SET is_default = false WHERE customer_id = $1")
                .bind(customer_id)
                .execute(&mut *tx)
                .await?;
        }

        let row = sqlx::query_as::<_, AddressRow>(&format!(
            "INSERT INTO address (customer_id, label, street, city, postal_code, notes, is_default)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {ADDRESS_COLUMNS}"
        ))
        .bind(customer_id)
        .bind(&input.label)
        .bind(&input.street)
        .bind(&input.city)
        .bind(&input.postal_code)
        .bind(input.notes.as_deref())
        .bind(input.is_default)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(row.into())
    }

    /// Update an address. Absent fields are left unchanged.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the address doesn't exist or
    /// belongs to another customer.
    pub async fn update(
        &self,
        customer_id: CustomerId,
        id: AddressId,
        input: &UpdateAddressInput,
    ) -> Result<Address, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        if input.is_default == Some(true) {
            sqlx::query("UPDATE address SET is_default = false WHERE customer_id = $1")
                .bind(customer_id)
                .execute(&mut *tx)
                .await?;
        }

        let row = sqlx::query_as::<_, AddressRow>(&format!(
            "UPDATE address SET
                 label = COALESCE($3, label),
                 street = COALESCE($4, street),
                 city = COALESCE($5, city),
                 postal_code = COALESCE($6, postal_code),
                 notes = COALESCE($7, notes),
                 is_default = COALESCE($8, is_default)
             WHERE id = $1 AND customer_id = $2
             RETURNING {ADDRESS_COLUMNS}"
        ))
        .bind(id)
        .bind(customer_id)
        .bind(input.label.as_deref())
        .bind(input.street.as_deref())
        .bind(input.city.as_deref())
        .bind(input.postal_code.as_deref())
        .bind(input.notes.as_deref())
        .bind(input.is_default)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        tx.commit().await?;
        Ok(row.into())
    }

    /// Delete an address, scoped to its owner.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the address doesn't exist or
    /// belongs to another customer.
    pub async fn delete(
        &self,
        customer_id: CustomerId,
        id: AddressId,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM address WHERE id = $1 AND customer_id = $2")
            .bind(id)
            .bind(customer_id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
