//! Public schedule route handler.

use axum::{Json, extract::State};
use tracing::instrument;

use crate::db::ScheduleRepository;
use crate::error::Result;
use crate::models::schedule::ScheduleDay;
use crate::state::AppState;

/// The bakery's weekly opening/pickup hours.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<ScheduleDay>>> {
    let days = ScheduleRepository::new(state.pool()).list().await?;
    Ok(Json(days))
}
