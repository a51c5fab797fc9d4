//! Audit log domain models.

use chrono::{DateTime, Utc};
use serde::Serialize;

use shortcakes_core::{AuditLogId, CustomerId};

/// One audit log entry recording an admin mutation.
#[derive(Debug, Clone, Serialize)]
pub struct AuditEntry {
    /// Unique entry ID.
    pub id: AuditLogId,
    /// Admin who performed the action.
    pub admin_id: CustomerId,
    /// Action verb ("order.transition", "inventory.restock", ...).
    pub action: String,
    /// Entity kind ("order", "product", ...).
    pub entity: String,
    /// Entity ID, when applicable.
    pub entity_id: Option<i32>,
    /// Structured detail payload.
    pub detail: serde_json::Value,
    /// When the action happened.
    pub created_at: DateTime<Utc>,
}
