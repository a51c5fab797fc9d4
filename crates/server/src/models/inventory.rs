//! Inventory domain models: ingredients and their movement log.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use shortcakes_core::{IngredientCategory, IngredientId, MovementId, MovementKind, OrderId};

/// An ingredient tracked in inventory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryItem {
    /// Unique ingredient ID.
    pub id: IngredientId,
    /// Ingredient name (unique).
    pub name: String,
    /// Inventory grouping.
    pub category: IngredientCategory,
    /// Current quantity on hand, in `unit`.
    pub quantity: Decimal,
    /// Unit of measure (g, kg, ml, l, unit, ...).
    pub unit: String,
    /// Restock threshold; at or below this the item is critical.
    pub threshold: Decimal,
    /// Cost per unit, for restock cost estimates.
    pub cost_per_unit: Decimal,
    /// When the item was created.
    pub created_at: DateTime<Utc>,
    /// When the item was last updated.
    pub updated_at: DateTime<Utc>,
}

/// One entry in the append-only movement log of an ingredient.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Movement {
    /// Unique movement ID.
    pub id: MovementId,
    /// Ingredient the movement belongs to.
    pub item_id: IngredientId,
    /// Why the quantity changed.
    pub kind: MovementKind,
    /// Signed change (negative for deductions).
    pub change: Decimal,
    /// Quantity on hand after the movement.
    pub quantity_after: Decimal,
    /// Order that caused a deduction, if any.
    pub order_id: Option<OrderId>,
    /// Free-form note (restock supplier, adjustment reason).
    pub note: Option<String>,
    /// When the movement happened.
    pub occurred_at: DateTime<Utc>,
}

/// Input for creating an ingredient.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateItemInput {
    pub name: String,
    pub category: IngredientCategory,
    pub quantity: Decimal,
    pub unit: String,
    pub threshold: Decimal,
    pub cost_per_unit: Decimal,
}

/// Input for updating an ingredient. Absent fields are left unchanged.
///
/// Quantity is deliberately not updatable here; it only changes through
/// restock/adjust operations so the movement log stays consistent.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateItemInput {
    pub name: Option<String>,
    pub category: Option<IngredientCategory>,
    pub unit: Option<String>,
    pub threshold: Option<Decimal>,
    pub cost_per_unit: Option<Decimal>,
}

/// Input for a manual restock.
#[derive(Debug, Clone, Deserialize)]
pub struct RestockInput {
    /// Quantity received; must be positive.
    pub quantity: Decimal,
    pub note: Option<String>,
}

/// Input for a manual adjustment (stocktake, spoilage). May be negative.
#[derive(Debug, Clone, Deserialize)]
pub struct AdjustInput {
    pub change: Decimal,
    pub note: Option<String>,
}
