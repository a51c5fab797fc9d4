//! Admin inventory management and usage analytics.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::Utc;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

use shortcakes_core::IngredientId;

use crate::db::InventoryRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::models::inventory::{
    AdjustInput, CreateItemInput, InventoryItem, Movement, RestockInput, UpdateItemInput,
};
use crate::services::stock::{self, REPORT_WINDOW_DAYS, RestockLine, UsageTrend};
use crate::state::AppState;

/// List all ingredients.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<Vec<InventoryItem>>> {
    let items = InventoryRepository::new(state.pool()).list().await?;
    Ok(Json(items))
}

/// Show one ingredient.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<IngredientId>,
) -> Result<Json<InventoryItem>> {
    let item = InventoryRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("ingredient {id}")))?;
    Ok(Json(item))
}

/// Create an ingredient.
#[instrument(skip(state, admin, input), fields(admin = %admin.email, name = %input.name))]
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(input): Json<CreateItemInput>,
) -> Result<(StatusCode, Json<InventoryItem>)> {
    if input.quantity < Decimal::ZERO || input.threshold < Decimal::ZERO {
        return Err(AppError::BadRequest(
            "quantity and threshold must not be negative".to_string(),
        ));
    }

    let item = InventoryRepository::new(state.pool()).create(&input).await?;

    super::audit(
        &state,
        admin.id,
        "inventory.create",
        "inventory_item",
        Some(item.id.as_i32()),
        json!({ "name": item.name, "quantity": item.quantity }),
    )
    .await;

    Ok((StatusCode::CREATED, Json(item)))
}

/// Update ingredient metadata (not quantity).
#[instrument(skip(state, admin, input), fields(admin = %admin.email))]
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<IngredientId>,
    Json(input): Json<UpdateItemInput>,
) -> Result<Json<InventoryItem>> {
    let item = InventoryRepository::new(state.pool())
        .update(id, &input)
        .await
        .map_err(|e| match e {
            crate::db::RepositoryError::NotFound => {
                AppError::NotFound(format!("ingredient {id}"))
            }
            other => other.into(),
        })?;

    super::audit(
        &state,
        admin.id,
        "inventory.update",
        "inventory_item",
        Some(id.as_i32()),
        json!({ "name": item.name }),
    )
    .await;

    Ok(Json(item))
}

/// Restock an ingredient.
#[instrument(skip(state, admin, input), fields(admin = %admin.email))]
pub async fn restock(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<IngredientId>,
    Json(input): Json<RestockInput>,
) -> Result<Json<InventoryItem>> {
    if input.quantity <= Decimal::ZERO {
        return Err(AppError::BadRequest(
            "restock quantity must be positive".to_string(),
        ));
    }

    let item = InventoryRepository::new(state.pool())
        .restock(id, input.quantity, input.note.as_deref())
        .await
        .map_err(|e| match e {
            crate::db::RepositoryError::NotFound => {
                AppError::NotFound(format!("ingredient {id}"))
            }
            other => other.into(),
        })?;

    super::audit(
        &state,
        admin.id,
        "inventory.restock",
        "inventory_item",
        Some(id.as_i32()),
        json!({ "quantity": input.quantity, "note": input.note }),
    )
    .await;

    Ok(Json(item))
}

/// Apply a manual adjustment (stocktake, spoilage).
#[instrument(skip(state, admin, input), fields(admin = %admin.email))]
pub async fn adjust(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<IngredientId>,
    Json(input): Json<AdjustInput>,
) -> Result<Json<InventoryItem>> {
    if input.change == Decimal::ZERO {
        return Err(AppError::BadRequest("change must be non-zero".to_string()));
    }

    let item = InventoryRepository::new(state.pool())
        .adjust(id, input.change, input.note.as_deref())
        .await
        .map_err(|e| match e {
            crate::db::RepositoryError::NotFound => {
                AppError::NotFound(format!("ingredient {id}"))
            }
            other => other.into(),
        })?;

    super::audit(
        &state,
        admin.id,
        "inventory.adjust",
        "inventory_item",
        Some(id.as_i32()),
        json!({ "change": input.change, "note": input.note }),
    )
    .await;

    Ok(Json(item))
}

/// Query parameters for the movement listing.
#[derive(Debug, Default, Deserialize)]
pub struct MovementsQuery {
    pub limit: Option<i64>,
}

/// List recent movements for an ingredient.
#[instrument(skip(state))]
pub async fn movements(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<IngredientId>,
    Query(query): Query<MovementsQuery>,
) -> Result<Json<Vec<Movement>>> {
    let limit = query.limit.unwrap_or(100).clamp(1, 1000);
    let movements = InventoryRepository::new(state.pool())
        .movements(id, limit)
        .await?;
    Ok(Json(movements))
}

/// The restock report: every ingredient with an alert tier, most severe
/// first.
#[instrument(skip(state))]
pub async fn restock_report(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<Vec<RestockLine>>> {
    let inventory = InventoryRepository::new(state.pool());
    let report = stock::restock_report(&inventory, Utc::now()).await?;
    Ok(Json(report))
}

/// Query parameters for the trend endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct TrendQuery {
    pub days: Option<i64>,
}

/// Usage trend and linear predictions for one ingredient.
#[instrument(skip(state))]
pub async fn trend(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<IngredientId>,
    Query(query): Query<TrendQuery>,
) -> Result<Json<UsageTrend>> {
    let inventory = InventoryRepository::new(state.pool());
    let days = query.days.unwrap_or(REPORT_WINDOW_DAYS).clamp(7, 365);

    // 404 for unknown ingredients rather than an empty trend
    inventory
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("ingredient {id}")))?;

    let trend = stock::item_trend(&inventory, id, days, Utc::now()).await?;
    Ok(Json(trend))
}
