//! Inventory repository: ingredients and their append-only movement log.
//!
//! Every quantity change goes through a movement writer so the log stays
//! consistent with the `quantity` column. Deductions for order confirmation
//! run inside the caller's transaction; see [`deduct`].

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};

use shortcakes_core::{IngredientCategory, IngredientId, MovementId, MovementKind, OrderId};

use super::RepositoryError;
use crate::models::inventory::{CreateItemInput, InventoryItem, Movement, UpdateItemInput};

/// Internal row type for inventory item queries.
#[derive(Debug, sqlx::FromRow)]
struct ItemRow {
    id: i32,
    name: String,
    category: IngredientCategory,
    quantity: Decimal,
    unit: String,
    threshold: Decimal,
    cost_per_unit: Decimal,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ItemRow> for InventoryItem {
    fn from(row: ItemRow) -> Self {
        Self {
            id: IngredientId::new(row.id),
            name: row.name,
            category: row.category,
            quantity: row.quantity,
            unit: row.unit,
            threshold: row.threshold,
            cost_per_unit: row.cost_per_unit,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Internal row type for movement queries.
#[derive(Debug, sqlx::FromRow)]
struct MovementRow {
    id: i32,
    item_id: i32,
    kind: MovementKind,
    change: Decimal,
    quantity_after: Decimal,
    order_id: Option<i32>,
    note: Option<String>,
    occurred_at: DateTime<Utc>,
}

impl From<MovementRow> for Movement {
    fn from(row: MovementRow) -> Self {
        Self {
            id: MovementId::new(row.id),
            item_id: IngredientId::new(row.item_id),
            kind: row.kind,
            change: row.change,
            quantity_after: row.quantity_after,
            order_id: row.order_id.map(OrderId::new),
            note: row.note,
            occurred_at: row.occurred_at,
        }
    }
}

const ITEM_COLUMNS: &str =
    "id, name, category, quantity, unit, threshold, cost_per_unit, created_at, updated_at";

const MOVEMENT_COLUMNS: &str =
    "id, item_id, kind, change, quantity_after, order_id, note, occurred_at";

/// Repository for inventory database operations.
pub struct InventoryRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> InventoryRepository<'a> {
    /// Create a new inventory repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all ingredients, alphabetically.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<InventoryItem>, RepositoryError> {
        let rows = sqlx::query_as::<_, ItemRow>(&format!(
            "SELECT {ITEM_COLUMNS} FROM inventory_item ORDER BY name"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Get one ingredient by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: IngredientId) -> Result<Option<InventoryItem>, RepositoryError> {
        let row = sqlx::query_as::<_, ItemRow>(&format!(
            "SELECT {ITEM_COLUMNS} FROM inventory_item WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Create an ingredient. A non-zero starting quantity is recorded as an
    /// initial `restock` movement.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the name already exists.
    pub async fn create(&self, input: &CreateItemInput) -> Result<InventoryItem, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, ItemRow>(&format!(
            "INSERT INTO inventory_item (name, category, quantity, unit, threshold, cost_per_unit)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {ITEM_COLUMNS}"
        ))
        .bind(&input.name)
        .bind(input.category)
        .bind(input.quantity)
        .bind(&input.unit)
        .bind(input.threshold)
        .bind(input.cost_per_unit)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("ingredient name already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        if input.quantity > Decimal::ZERO {
            record_movement(
                &mut tx,
                IngredientId::new(row.id),
                MovementKind::Restock,
                input.quantity,
                input.quantity,
                None,
                Some("initial stock"),
            )
            .await?;
        }

        tx.commit().await?;
        Ok(row.into())
    }

    /// Update ingredient metadata. Quantity changes go through
    /// [`Self::restock`] / [`Self::adjust`] instead.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the ingredient doesn't exist.
    pub async fn update(
        &self,
        id: IngredientId,
        input: &UpdateItemInput,
    ) -> Result<InventoryItem, RepositoryError> {
        let row = sqlx::query_as::<_, ItemRow>(&format!(
            "UPDATE inventory_item SET
                 name = COALESCE($2, name),
                 category = COALESCE($3, category),
                 unit = COALESCE($4, unit),
                 threshold = COALESCE($5, threshold),
                 cost_per_unit = COALESCE($6, cost_per_unit),
                 updated_at = now()
             WHERE id = $1
             RETURNING {ITEM_COLUMNS}"
        ))
        .bind(id)
        .bind(input.name.as_deref())
        .bind(input.category)
        .bind(input.unit.as_deref())
        .bind(input.threshold)
        .bind(input.cost_per_unit)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(row.into())
    }

    /// Restock an ingredient by a positive quantity.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the ingredient doesn't exist.
    pub async fn restock(
        &self,
        id: IngredientId,
        quantity: Decimal,
        note: Option<&str>,
    ) -> Result<InventoryItem, RepositoryError> {
        self.apply_change(id, MovementKind::Restock, quantity, note)
            .await
    }

    /// Apply a manual adjustment (may be negative).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the ingredient doesn't exist.
    pub async fn adjust(
        &self,
        id: IngredientId,
        change: Decimal,
        note: Option<&str>,
    ) -> Result<InventoryItem, RepositoryError> {
        self.apply_change(id, MovementKind::Adjust, change, note)
            .await
    }

    async fn apply_change(
        &self,
        id: IngredientId,
        kind: MovementKind,
        change: Decimal,
        note: Option<&str>,
    ) -> Result<InventoryItem, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, ItemRow>(&format!(
            "UPDATE inventory_item
             SET quantity = quantity + $2, updated_at = now()
             WHERE id = $1
             RETURNING {ITEM_COLUMNS}"
        ))
        .bind(id)
        .bind(change)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        record_movement(&mut tx, id, kind, change, row.quantity, None, note).await?;

        tx.commit().await?;
        Ok(row.into())
    }

    /// Recent movements for an ingredient, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn movements(
        &self,
        id: IngredientId,
        limit: i64,
    ) -> Result<Vec<Movement>, RepositoryError> {
        let rows = sqlx::query_as::<_, MovementRow>(&format!(
            "SELECT {MOVEMENT_COLUMNS} FROM inventory_movement
             WHERE item_id = $1
             ORDER BY occurred_at DESC
             LIMIT $2"
        ))
        .bind(id)
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Deduct movements for an ingredient since a point in time, oldest first.
    ///
    /// Used by the usage analytics in `services::stock`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn deduct_movements_since(
        &self,
        id: IngredientId,
        since: DateTime<Utc>,
    ) -> Result<Vec<Movement>, RepositoryError> {
        let rows = sqlx::query_as::<_, MovementRow>(&format!(
            "SELECT {MOVEMENT_COLUMNS} FROM inventory_movement
             WHERE item_id = $1 AND kind = 'deduct' AND occurred_at >= $2
             ORDER BY occurred_at"
        ))
        .bind(id)
        .bind(since)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}

/// Deduct `amount` of an ingredient inside the caller's transaction,
/// recording a `deduct` movement tied to the order.
///
/// Returns the quantity on hand after the deduction. The quantity may go
/// negative; overselling is surfaced through restock alerts rather than
/// rejected at confirmation time.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` if the ingredient doesn't exist.
pub async fn deduct(
    conn: &mut PgConnection,
    id: IngredientId,
    amount: Decimal,
    order_id: OrderId,
) -> Result<Decimal, RepositoryError> {
    let quantity_after: Decimal = sqlx::query_scalar(
        "UPDATE inventory_item
         SET quantity = quantity - $2, updated_at = now()
         WHERE id = $1
         RETURNING quantity",
    )
    .bind(id)
    .bind(amount)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or(RepositoryError::NotFound)?;

    sqlx::query(
        "INSERT INTO inventory_movement (item_id, kind, change, quantity_after, order_id)
         VALUES ($1, 'deduct', $2, $3, $4)",
    )
    .bind(id)
    .bind(-amount)
    .bind(quantity_after)
    .bind(order_id)
    .execute(&mut *conn)
    .await?;

    Ok(quantity_after)
}

/// Insert a movement row inside an open transaction.
async fn record_movement(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    item_id: IngredientId,
    kind: MovementKind,
    change: Decimal,
    quantity_after: Decimal,
    order_id: Option<OrderId>,
    note: Option<&str>,
) -> Result<(), RepositoryError> {
    sqlx::query(
        "INSERT INTO inventory_movement (item_id, kind, change, quantity_after, order_id, note)
         VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .bind(item_id)
    .bind(kind)
    .bind(change)
    .bind(quantity_after)
    .bind(order_id)
    .bind(note)
    .execute(&mut **tx)
    .await?;

    Ok(())
}
