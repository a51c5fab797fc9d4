//! Admin product management.
//!
//! Mutations invalidate the public catalog cache.

use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::StatusCode,
};
use serde_json::json;
use tracing::instrument;

use shortcakes_core::ProductId;

use crate::db::ProductRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::models::product::{
    CreateProductInput, Product, ProductWithRecipe, UpdateProductInput,
};
use crate::services::uploads::{self, UploadKind};
use crate::state::AppState;

/// List all products, inactive included.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<Vec<Product>>> {
    let products = ProductRepository::new(state.pool()).list(false, None).await?;
    Ok(Json(products))
}

/// Show one product with its recipe.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<ProductId>,
) -> Result<Json<ProductWithRecipe>> {
    let product = ProductRepository::new(state.pool())
        .get_with_recipe(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;
    Ok(Json(product))
}

/// Create a product with its recipe.
#[instrument(skip(state, admin, input), fields(admin = %admin.email, name = %input.name))]
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(input): Json<CreateProductInput>,
) -> Result<(StatusCode, Json<Product>)> {
    if input.price <= rust_decimal::Decimal::ZERO {
        return Err(AppError::BadRequest("price must be positive".to_string()));
    }

    let product = ProductRepository::new(state.pool()).create(&input).await?;
    state.invalidate_catalog();

    super::audit(
        &state,
        admin.id,
        "product.create",
        "product",
        Some(product.id.as_i32()),
        json!({ "name": product.name }),
    )
    .await;

    Ok((StatusCode::CREATED, Json(product)))
}

/// Update a product; a present `recipe` replaces the whole recipe.
#[instrument(skip(state, admin, input), fields(admin = %admin.email))]
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<ProductId>,
    Json(input): Json<UpdateProductInput>,
) -> Result<Json<Product>> {
    let product = ProductRepository::new(state.pool())
        .update(id, &input)
        .await
        .map_err(|e| match e {
            crate::db::RepositoryError::NotFound => AppError::NotFound(format!("product {id}")),
            other => other.into(),
        })?;
    state.invalidate_catalog();

    super::audit(
        &state,
        admin.id,
        "product.update",
        "product",
        Some(id.as_i32()),
        json!({ "name": product.name }),
    )
    .await;

    Ok(Json(product))
}

/// Upload a product image.
#[instrument(skip(state, admin, multipart), fields(admin = %admin.email))]
pub async fn upload_image(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<ProductId>,
    mut multipart: Multipart,
) -> Result<Json<Product>> {
    let repo = ProductRepository::new(state.pool());
    repo.get_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;

    let field = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("invalid multipart body: {e}")))?
        .ok_or_else(|| AppError::BadRequest("missing file field".to_string()))?;

    let content_type = field
        .content_type()
        .map(ToString::to_string)
        .ok_or_else(|| AppError::BadRequest("missing file content type".to_string()))?;
    let bytes = field
        .bytes()
        .await
        .map_err(|e| AppError::BadRequest(format!("failed to read upload: {e}")))?;

    let path = uploads::store(
        &state.config().upload_root,
        UploadKind::ProductImage,
        &content_type,
        &bytes,
    )
    .await?;

    repo.set_image(id, &path).await?;
    state.invalidate_catalog();

    super::audit(
        &state,
        admin.id,
        "product.image",
        "product",
        Some(id.as_i32()),
        json!({ "path": path }),
    )
    .await;

    let product = repo
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;
    Ok(Json(product))
}
