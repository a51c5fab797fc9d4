//! Public catalog route handlers.
//!
//! Listings are cached for a minute; admin product mutations invalidate
//! the cache.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use tracing::instrument;

use shortcakes_core::ProductCategory;

use crate::db::ProductRepository;
use crate::error::{AppError, Result};
use crate::models::product::Product;
use crate::state::AppState;

/// Query parameters for the product listing.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub category: Option<ProductCategory>,
}

/// List active products, optionally filtered by category.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Product>>> {
    let cache_key = query
        .category
        .map_or_else(|| "all".to_string(), |c| c.to_string());

    if let Some(cached) = state.catalog_cache().get(&cache_key).await {
        return Ok(Json(cached.as_ref().clone()));
    }

    let products = ProductRepository::new(state.pool())
        .list(true, query.category)
        .await?;

    state
        .catalog_cache()
        .insert(cache_key, Arc::new(products.clone()))
        .await;

    Ok(Json(products))
}

/// Show one product by slug. Inactive products are hidden.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Product>> {
    let product = ProductRepository::new(state.pool())
        .get_by_slug(&slug)
        .await?
        .filter(|p| p.is_active)
        .ok_or_else(|| AppError::NotFound(format!("product '{slug}'")))?;

    Ok(Json(product))
}
