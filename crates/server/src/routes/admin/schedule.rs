//! Admin schedule management.

use axum::{
    Json,
    extract::{Path, State},
};
use serde_json::json;
use tracing::instrument;

use crate::db::ScheduleRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::models::schedule::{ScheduleDay, UpsertScheduleInput};
use crate::state::AppState;

/// Set one weekday's opening hours (0 = Sunday through 6 = Saturday).
#[instrument(skip(state, admin, input), fields(admin = %admin.email))]
pub async fn upsert(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(day_of_week): Path<i32>,
    Json(input): Json<UpsertScheduleInput>,
) -> Result<Json<ScheduleDay>> {
    if !(0..=6).contains(&day_of_week) {
        return Err(AppError::BadRequest(
            "day_of_week must be between 0 and 6".to_string(),
        ));
    }
    if input.closes_at <= input.opens_at {
        return Err(AppError::BadRequest(
            "closes_at must be after opens_at".to_string(),
        ));
    }

    let day = ScheduleRepository::new(state.pool())
        .upsert(day_of_week, &input)
        .await?;

    super::audit(
        &state,
        admin.id,
        "schedule.upsert",
        "schedule",
        Some(day.id.as_i32()),
        json!({ "day_of_week": day_of_week, "is_open": day.is_open }),
    )
    .await;

    Ok(Json(day))
}
