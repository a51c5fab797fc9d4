//! Admin delivery zone management.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde_json::json;
use tracing::instrument;

use shortcakes_core::DeliveryZoneId;

use crate::db::DeliveryZoneRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::models::delivery_zone::{CreateZoneInput, DeliveryZone, UpdateZoneInput};
use crate::state::AppState;

/// List all delivery zones.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<Vec<DeliveryZone>>> {
    let zones = DeliveryZoneRepository::new(state.pool()).list().await?;
    Ok(Json(zones))
}

/// Create a delivery zone.
#[instrument(skip(state, admin, input), fields(admin = %admin.email, name = %input.name))]
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(input): Json<CreateZoneInput>,
) -> Result<(StatusCode, Json<DeliveryZone>)> {
    if input.postal_prefixes.is_empty() {
        return Err(AppError::BadRequest(
            "at least one postal prefix is required".to_string(),
        ));
    }
    if input.fee < rust_decimal::Decimal::ZERO {
        return Err(AppError::BadRequest("fee must not be negative".to_string()));
    }

    let zone = DeliveryZoneRepository::new(state.pool()).create(&input).await?;

    super::audit(
        &state,
        admin.id,
        "delivery_zone.create",
        "delivery_zone",
        Some(zone.id.as_i32()),
        json!({ "name": zone.name }),
    )
    .await;

    Ok((StatusCode::CREATED, Json(zone)))
}

/// Update a delivery zone.
#[instrument(skip(state, admin, input), fields(admin = %admin.email))]
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DeliveryZoneId>,
    Json(input): Json<UpdateZoneInput>,
) -> Result<Json<DeliveryZone>> {
    let zone = DeliveryZoneRepository::new(state.pool())
        .update(id, &input)
        .await
        .map_err(|e| match e {
            crate::db::RepositoryError::NotFound => {
                AppError::NotFound("delivery zone".to_string())
            }
            other => other.into(),
        })?;

    super::audit(
        &state,
        admin.id,
        "delivery_zone.update",
        "delivery_zone",
        Some(id.as_i32()),
        json!({ "name": zone.name }),
    )
    .await;

    Ok(Json(zone))
}

/// Delete a delivery zone.
#[instrument(skip(state, admin), fields(admin = %admin.email))]
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DeliveryZoneId>,
) -> Result<StatusCode> {
    DeliveryZoneRepository::new(state.pool())
        .delete(id)
        .await
        .map_err(|e| match e {
            crate::db::RepositoryError::NotFound => {
                AppError::NotFound("delivery zone".to_string())
            }
            other => other.into(),
        })?;

    super::audit(
        &state,
        admin.id,
        "delivery_zone.delete",
        "delivery_zone",
        Some(id.as_i32()),
        json!({}),
    )
    .await;

    Ok(StatusCode::NO_CONTENT)
}
