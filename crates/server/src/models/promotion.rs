//! Promotion (discount code) domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shortcakes_core::PromotionId;

/// A percentage-off promotion code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Promotion {
    /// Unique promotion ID.
    pub id: PromotionId,
    /// Code entered at checkout (stored uppercased, matched case-insensitively).
    pub code: String,
    /// Description shown in the admin dashboard.
    pub description: String,
    /// Percent off the subtotal, 1-100.
    pub percent_off: i32,
    /// Start of the validity window.
    pub starts_at: DateTime<Utc>,
    /// End of the validity window.
    pub ends_at: DateTime<Utc>,
    /// Inactive promotions are never applied.
    pub is_active: bool,
}

impl Promotion {
    /// Whether the promotion applies at the given instant.
    #[must_use]
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.is_active && self.starts_at <= now && now < self.ends_at
    }
}

/// Input for creating a promotion.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePromotionInput {
    pub code: String,
    pub description: String,
    pub percent_off: i32,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

/// Input for updating a promotion. Absent fields are left unchanged.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdatePromotionInput {
    pub description: Option<String>,
    pub percent_off: Option<i32>,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    pub is_active: Option<bool>,
}

const fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn promo(active: bool) -> Promotion {
        Promotion {
            id: PromotionId::new(1),
            code: "SUMMER10".to_string(),
            description: "10% off".to_string(),
            percent_off: 10,
            starts_at: Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).single().expect("date"),
            ends_at: Utc.with_ymd_and_hms(2025, 9, 1, 0, 0, 0).single().expect("date"),
            is_active: active,
        }
    }

    #[test]
    fn test_valid_inside_window() {
        let now = Utc.with_ymd_and_hms(2025, 7, 15, 12, 0, 0).single().expect("date");
        assert!(promo(true).is_valid_at(now));
    }

    #[test]
    fn test_invalid_outside_window() {
        let before = Utc.with_ymd_and_hms(2025, 5, 31, 0, 0, 0).single().expect("date");
        let after = Utc.with_ymd_and_hms(2025, 9, 1, 0, 0, 0).single().expect("date");
        assert!(!promo(true).is_valid_at(before));
        // End is exclusive
        assert!(!promo(true).is_valid_at(after));
    }

    #[test]
    fn test_invalid_when_inactive() {
        let now = Utc.with_ymd_and_hms(2025, 7, 15, 12, 0, 0).single().expect("date");
        assert!(!promo(false).is_valid_at(now));
    }
}
