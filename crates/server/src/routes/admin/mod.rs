//! Admin dashboard route handlers.
//!
//! Every handler takes `RequireAdmin`; mutations append to the audit log.
//!
//! ```text
//! GET  /api/admin/orders                        ?status=&page=
//! GET  /api/admin/orders/{id}
//! POST /api/admin/orders/{id}/status            {status}
//!
//! GET  /api/admin/inventory
//! POST /api/admin/inventory
//! GET  /api/admin/inventory/restock-report
//! GET  /api/admin/inventory/{id}
//! PUT  /api/admin/inventory/{id}
//! POST /api/admin/inventory/{id}/restock        {quantity, note?}
//! POST /api/admin/inventory/{id}/adjust         {change, note?}
//! GET  /api/admin/inventory/{id}/movements      ?limit=
//! GET  /api/admin/inventory/{id}/trend          ?days=
//!
//! GET  /api/admin/customers                     ?page=
//! GET  /api/admin/customers/{id}
//!
//! GET  /api/admin/reports/sales                 ?from=&to=
//!
//! GET    /api/admin/contact-messages            ?unread=&page=
//! POST   /api/admin/contact-messages/{id}/read
//! DELETE /api/admin/contact-messages/{id}
//!
//! GET/POST   /api/admin/products
//! GET/PUT    /api/admin/products/{id}
//! POST       /api/admin/products/{id}/image     (multipart)
//!
//! GET/POST   /api/admin/promotions
//! PUT/DELETE /api/admin/promotions/{id}
//!
//! GET/POST   /api/admin/delivery-zones
//! PUT/DELETE /api/admin/delivery-zones/{id}
//!
//! PUT  /api/admin/schedule/{day}                set a weekday's hours
//!
//! GET  /api/admin/audit-log                     ?page=
//! ```

pub mod contacts;
pub mod customers;
pub mod delivery_zones;
pub mod inventory;
pub mod orders;
pub mod products;
pub mod promotions;
pub mod reports;
pub mod schedule;

use axum::{
    Json,
    extract::{Query, State},
    routing::{get, post, put},
    Router,
};
use serde::Deserialize;
use tracing::instrument;

use shortcakes_core::CustomerId;

use crate::db::AuditRepository;
use crate::error::Result;
use crate::middleware::RequireAdmin;
use crate::models::audit::AuditEntry;
use crate::state::AppState;

/// Create the admin routes router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/orders", get(orders::index))
        .route("/orders/{id}", get(orders::show))
        .route("/orders/{id}/status", post(orders::transition))
        .route(
            "/inventory",
            get(inventory::index).post(inventory::create),
        )
        .route("/inventory/restock-report", get(inventory::restock_report))
        .route(
            "/inventory/{id}",
            get(inventory::show).put(inventory::update),
        )
        .route("/inventory/{id}/restock", post(inventory::restock))
        .route("/inventory/{id}/adjust", post(inventory::adjust))
        .route("/inventory/{id}/movements", get(inventory::movements))
        .route("/inventory/{id}/trend", get(inventory::trend))
        .route("/customers", get(customers::index))
        .route("/customers/{id}", get(customers::show))
        .route("/reports/sales", get(reports::sales))
        .route("/contact-messages", get(contacts::index))
        .route("/contact-messages/{id}/read", post(contacts::mark_read))
        .route(
            "/contact-messages/{id}",
            axum::routing::delete(contacts::delete),
        )
        .route("/products", get(products::index).post(products::create))
        .route("/products/{id}", get(products::show).put(products::update))
        .route("/products/{id}/image", post(products::upload_image))
        .route(
            "/promotions",
            get(promotions::index).post(promotions::create),
        )
        .route(
            "/promotions/{id}",
            put(promotions::update).delete(promotions::delete),
        )
        .route(
            "/delivery-zones",
            get(delivery_zones::index).post(delivery_zones::create),
        )
        .route(
            "/delivery-zones/{id}",
            put(delivery_zones::update).delete(delivery_zones::delete),
        )
        .route("/schedule/{day}", put(schedule::upsert))
        .route("/audit-log", get(audit_log))
}

/// Append an audit entry; failures are logged, never surfaced.
pub(crate) async fn audit(
    state: &AppState,
    admin_id: CustomerId,
    action: &str,
    entity: &str,
    entity_id: Option<i32>,
    detail: serde_json::Value,
) {
    if let Err(e) = AuditRepository::new(state.pool())
        .record(admin_id, action, entity, entity_id, detail)
        .await
    {
        tracing::warn!(action, "Failed to record audit entry: {e}");
    }
}

/// Query parameters for paged listings.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<i64>,
}

/// List audit entries, newest first.
#[instrument(skip(state))]
pub async fn audit_log(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(query): Query<PageQuery>,
) -> Result<Json<Vec<AuditEntry>>> {
    let entries = AuditRepository::new(state.pool())
        .list(query.page.unwrap_or(1))
        .await?;
    Ok(Json(entries))
}
