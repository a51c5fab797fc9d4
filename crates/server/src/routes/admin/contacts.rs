//! Admin contact message management.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

use shortcakes_core::ContactMessageId;

use crate::db::ContactRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::models::contact::ContactMessage;
use crate::state::AppState;

/// Query parameters for the contact message listing.
#[derive(Debug, Default, Deserialize)]
pub struct ContactQuery {
    pub unread: Option<bool>,
    pub page: Option<i64>,
}

/// List contact messages, newest first.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(query): Query<ContactQuery>,
) -> Result<Json<Vec<ContactMessage>>> {
    let messages = ContactRepository::new(state.pool())
        .list(query.unread.unwrap_or(false), query.page.unwrap_or(1))
        .await?;
    Ok(Json(messages))
}

/// Mark a message as read.
#[instrument(skip(state, admin), fields(admin = %admin.email))]
pub async fn mark_read(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<ContactMessageId>,
) -> Result<StatusCode> {
    ContactRepository::new(state.pool())
        .mark_read(id)
        .await
        .map_err(|e| match e {
            crate::db::RepositoryError::NotFound => AppError::NotFound("message".to_string()),
            other => other.into(),
        })?;

    super::audit(
        &state,
        admin.id,
        "contact.read",
        "contact_message",
        Some(id.as_i32()),
        json!({}),
    )
    .await;

    Ok(StatusCode::NO_CONTENT)
}

/// Delete a message.
#[instrument(skip(state, admin), fields(admin = %admin.email))]
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<ContactMessageId>,
) -> Result<StatusCode> {
    ContactRepository::new(state.pool())
        .delete(id)
        .await
        .map_err(|e| match e {
            crate::db::RepositoryError::NotFound => AppError::NotFound("message".to_string()),
            other => other.into(),
        })?;

    super::audit(
        &state,
        admin.id,
        "contact.delete",
        "contact_message",
        Some(id.as_i32()),
        json!({}),
    )
    .await;

    Ok(StatusCode::NO_CONTENT)
}
