//! Contact form route handler.

use axum::{Json, extract::State, http::StatusCode};
use tracing::instrument;

use shortcakes_core::Email;

use crate::db::ContactRepository;
use crate::error::{AppError, Result};
use crate::models::contact::{ContactMessage, CreateContactInput};
use crate::state::AppState;

/// Submit a contact message.
#[instrument(skip(state, input), fields(subject = %input.subject))]
pub async fn submit(
    State(state): State<AppState>,
    Json(input): Json<CreateContactInput>,
) -> Result<(StatusCode, Json<ContactMessage>)> {
    Email::parse(&input.email)
        .map_err(|e| AppError::BadRequest(format!("invalid email: {e}")))?;
    if input.name.trim().is_empty() || input.subject.trim().is_empty() || input.body.trim().is_empty()
    {
        return Err(AppError::BadRequest(
            "name, subject and message are required".to_string(),
        ));
    }

    let message = ContactRepository::new(state.pool()).create(&input).await?;
    Ok((StatusCode::CREATED, Json(message)))
}
