//! Admin sales reports.

use axum::{
    Json,
    extract::{Query, State},
};
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use tracing::instrument;

use crate::db::OrderRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::models::order::SalesReport;
use crate::state::AppState;

/// Query parameters for the sales report. Defaults to the trailing 30 days.
#[derive(Debug, Default, Deserialize)]
pub struct SalesQuery {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

/// Aggregated sales report for a date window.
#[instrument(skip(state))]
pub async fn sales(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(query): Query<SalesQuery>,
) -> Result<Json<SalesReport>> {
    let to = query.to.unwrap_or_else(Utc::now);
    let from = query.from.unwrap_or_else(|| to - Duration::days(30));

    if from >= to {
        return Err(AppError::BadRequest(
            "'from' must be before 'to'".to_string(),
        ));
    }

    let report = OrderRepository::new(state.pool())
        .sales_report(from, to)
        .await?;
    Ok(Json(report))
}
