//! Delivery zone domain models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use shortcakes_core::DeliveryZoneId;

/// A delivery zone with a flat fee, matched by postal code prefix.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryZone {
    /// Unique zone ID.
    pub id: DeliveryZoneId,
    /// Zone name ("Downtown", "North side").
    pub name: String,
    /// Postal code prefixes covered by the zone.
    pub postal_prefixes: Vec<String>,
    /// Flat delivery fee.
    pub fee: Decimal,
    /// Inactive zones are never matched.
    pub is_active: bool,
}

impl DeliveryZone {
    /// Whether this zone covers the given postal code.
    #[must_use]
    pub fn covers(&self, postal_code: &str) -> bool {
        self.is_active
            && self
                .postal_prefixes
                .iter()
                .any(|prefix| postal_code.starts_with(prefix.as_str()))
    }
}

/// Input for creating a delivery zone.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateZoneInput {
    pub name: String,
    pub postal_prefixes: Vec<String>,
    pub fee: Decimal,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

/// Input for updating a delivery zone. Absent fields are left unchanged.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateZoneInput {
    pub name: Option<String>,
    pub postal_prefixes: Option<Vec<String>>,
    pub fee: Option<Decimal>,
    pub is_active: Option<bool>,
}

const fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zone(active: bool) -> DeliveryZone {
        DeliveryZone {
            id: DeliveryZoneId::new(1),
            name: "Downtown".to_string(),
            postal_prefixes: vec!["100".to_string(), "101".to_string()],
            fee: "5.00".parse().expect("decimal"),
            is_active: active,
        }
    }

    #[test]
    fn test_covers_matching_prefix() {
        assert!(zone(true).covers("10001"));
        assert!(zone(true).covers("10155"));
    }

    #[test]
    fn test_does_not_cover_other_prefix() {
        assert!(!zone(true).covers("20001"));
    }

    #[test]
    fn test_inactive_zone_never_covers() {
        assert!(!zone(false).covers("10001"));
    }
}
