//! Admin promotion management.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde_json::json;
use tracing::instrument;

use shortcakes_core::PromotionId;

use crate::db::PromotionRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::models::promotion::{CreatePromotionInput, Promotion, UpdatePromotionInput};
use crate::state::AppState;

fn validate_percent(percent_off: i32) -> Result<()> {
    if !(1..=100).contains(&percent_off) {
        return Err(AppError::BadRequest(
            "percent_off must be between 1 and 100".to_string(),
        ));
    }
    Ok(())
}

/// List all promotions.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<Vec<Promotion>>> {
    let promotions = PromotionRepository::new(state.pool()).list().await?;
    Ok(Json(promotions))
}

/// Create a promotion.
#[instrument(skip(state, admin, input), fields(admin = %admin.email, code = %input.code))]
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(input): Json<CreatePromotionInput>,
) -> Result<(StatusCode, Json<Promotion>)> {
    validate_percent(input.percent_off)?;
    if input.ends_at <= input.starts_at {
        return Err(AppError::BadRequest(
            "ends_at must be after starts_at".to_string(),
        ));
    }

    let promotion = PromotionRepository::new(state.pool()).create(&input).await?;

    super::audit(
        &state,
        admin.id,
        "promotion.create",
        "promotion",
        Some(promotion.id.as_i32()),
        json!({ "code": promotion.code }),
    )
    .await;

    Ok((StatusCode::CREATED, Json(promotion)))
}

/// Update a promotion.
#[instrument(skip(state, admin, input), fields(admin = %admin.email))]
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<PromotionId>,
    Json(input): Json<UpdatePromotionInput>,
) -> Result<Json<Promotion>> {
    if let Some(percent_off) = input.percent_off {
        validate_percent(percent_off)?;
    }

    let promotion = PromotionRepository::new(state.pool())
        .update(id, &input)
        .await
        .map_err(|e| match e {
            crate::db::RepositoryError::NotFound => AppError::NotFound("promotion".to_string()),
            other => other.into(),
        })?;

    super::audit(
        &state,
        admin.id,
        "promotion.update",
        "promotion",
        Some(id.as_i32()),
        json!({ "code": promotion.code }),
    )
    .await;

    Ok(Json(promotion))
}

/// Delete a promotion.
#[instrument(skip(state, admin), fields(admin = %admin.email))]
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<PromotionId>,
) -> Result<StatusCode> {
    PromotionRepository::new(state.pool())
        .delete(id)
        .await
        .map_err(|e| match e {
            crate::db::RepositoryError::NotFound => AppError::NotFound("promotion".to_string()),
            other => other.into(),
        })?;

    super::audit(
        &state,
        admin.id,
        "promotion.delete",
        "promotion",
        Some(id.as_i32()),
        json!({}),
    )
    .await;

    Ok(StatusCode::NO_CONTENT)
}
