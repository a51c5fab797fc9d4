//! Inventory usage analytics: restock alerting and usage trends.
//!
//! All arithmetic works over the ingredient movement log. The alert and
//! estimation rules:
//!
//! - tiers, inclusive at each boundary: `quantity <= threshold` critical,
//!   `<= 1.5 × threshold` warning, `<= 2 × threshold` watch;
//! - average daily usage counts only `deduct` movements in the trailing
//!   window (30 days for reports);
//! - days until empty = `quantity / average daily usage`;
//! - recommended order = `max(2 × threshold, estimated monthly usage +
//!   threshold)`;
//! - trend direction compares the early and late halves of the window and
//!   predictions are linear extrapolations of the average daily rate.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;

use crate::db::{InventoryRepository, RepositoryError};
use crate::models::inventory::{InventoryItem, Movement};

use shortcakes_core::MovementKind;

/// Window used by the restock report and default trend analysis.
pub const REPORT_WINDOW_DAYS: i64 = 30;

/// Percentage change beyond which a trend counts as rising/falling.
const TREND_THRESHOLD_PCT: f64 = 10.0;

/// Restock alert tier, most severe last so `Ord` sorts by severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertTier {
    /// At or below twice the threshold.
    Watch,
    /// At or below 1.5 times the threshold.
    Warning,
    /// At or below the threshold.
    Critical,
}

/// Classify an ingredient quantity against its threshold.
///
/// Boundaries are inclusive: exactly `threshold` is critical, exactly
/// `1.5 × threshold` is warning, exactly `2 × threshold` is watch.
#[must_use]
pub fn classify(quantity: Decimal, threshold: Decimal) -> Option<AlertTier> {
    let three_halves = threshold * Decimal::new(15, 1);
    if quantity <= threshold {
        Some(AlertTier::Critical)
    } else if quantity <= three_halves {
        Some(AlertTier::Warning)
    } else if quantity <= threshold * Decimal::TWO {
        Some(AlertTier::Watch)
    } else {
        None
    }
}

/// Usage statistics over a trailing window.
#[derive(Debug, Clone, Serialize)]
pub struct UsageStats {
    /// Average daily usage over the window.
    pub avg_daily_usage: Decimal,
    /// `quantity / avg_daily_usage`; `None` when there is no usage.
    pub days_until_empty: Option<Decimal>,
    /// Linear estimate of a month of usage.
    pub estimated_monthly_usage: Decimal,
    /// `max(2 × threshold, estimated monthly + threshold)`.
    pub recommended_order_quantity: Decimal,
}

/// Compute usage statistics from deduct movements over `window_days`.
#[must_use]
pub fn usage_stats(
    quantity: Decimal,
    threshold: Decimal,
    movements: &[Movement],
    window_days: i64,
) -> UsageStats {
    let total_used: Decimal = movements
        .iter()
        .filter(|m| m.kind == MovementKind::Deduct)
        .map(|m| m.change.abs())
        .sum();

    let window = Decimal::from(window_days.max(1));
    let avg_daily_usage = (total_used / window).round_dp(4);

    let days_until_empty = if avg_daily_usage > Decimal::ZERO {
        Some((quantity / avg_daily_usage).round_dp(1))
    } else {
        None
    };

    let estimated_monthly_usage = (avg_daily_usage * Decimal::from(30)).round_dp(2);
    let recommended_order_quantity =
        (threshold * Decimal::TWO).max(estimated_monthly_usage + threshold);

    UsageStats {
        avg_daily_usage,
        days_until_empty,
        estimated_monthly_usage,
        recommended_order_quantity,
    }
}

/// Direction of a usage trend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Rising,
    Falling,
    Stable,
}

/// Usage trend over an analysis window.
#[derive(Debug, Clone, Serialize)]
pub struct UsageTrend {
    /// Direction derived from early vs late half-window usage.
    pub direction: TrendDirection,
    /// Percentage change of the late half vs the early half.
    pub percent_change: f64,
    /// Heuristic confidence in `0.25..=1.0`.
    pub confidence: f64,
    /// Average daily usage over the whole window.
    pub avg_daily_usage: Decimal,
    /// Linear prediction: `avg_daily_usage × 7`.
    pub predicted_next_week: Decimal,
    /// Linear prediction: `avg_daily_usage × 30`.
    pub predicted_next_month: Decimal,
}

/// Aggregate deduct movements into per-day usage, oldest first.
#[must_use]
pub fn daily_usage(movements: &[Movement]) -> Vec<(NaiveDate, Decimal)> {
    let mut days: std::collections::BTreeMap<NaiveDate, Decimal> = std::collections::BTreeMap::new();
    for m in movements {
        if m.kind == MovementKind::Deduct {
            *days.entry(m.occurred_at.date_naive()).or_default() += m.change.abs();
        }
    }
    days.into_iter().collect()
}

/// Analyze the usage trend of an ingredient over `[since, now)`.
///
/// The window is split at its midpoint; the percentage change of the late
/// half's daily mean against the early half's gives the direction. This is
/// a heuristic over small bakery volumes, not a statistical model.
#[must_use]
pub fn analyze_trend(
    movements: &[Movement],
    since: DateTime<Utc>,
    now: DateTime<Utc>,
) -> UsageTrend {
    let window_days = (now - since).num_days().max(1);
    let midpoint = since + Duration::days(window_days / 2);

    let mut early_total = Decimal::ZERO;
    let mut late_total = Decimal::ZERO;
    for m in movements {
        if m.kind != MovementKind::Deduct || m.occurred_at < since || m.occurred_at >= now {
            continue;
        }
        if m.occurred_at < midpoint {
            early_total += m.change.abs();
        } else {
            late_total += m.change.abs();
        }
    }

    let total = early_total + late_total;
    let avg_daily_usage = (total / Decimal::from(window_days)).round_dp(4);

    let early = early_total.to_f64().unwrap_or(0.0);
    let late = late_total.to_f64().unwrap_or(0.0);

    let (percent_change, direction, confidence) = if early > 0.0 {
        let pct = (late - early) / early * 100.0;
        let direction = if pct > TREND_THRESHOLD_PCT {
            TrendDirection::Rising
        } else if pct < -TREND_THRESHOLD_PCT {
            TrendDirection::Falling
        } else {
            TrendDirection::Stable
        };
        let confidence = (pct.abs() / 50.0).clamp(0.25, 1.0);
        (pct, direction, confidence)
    } else if late > 0.0 {
        // No early usage at all: everything is new demand.
        (100.0, TrendDirection::Rising, 0.25)
    } else {
        (0.0, TrendDirection::Stable, 0.25)
    };

    UsageTrend {
        direction,
        percent_change,
        confidence,
        avg_daily_usage,
        predicted_next_week: (avg_daily_usage * Decimal::from(7)).round_dp(2),
        predicted_next_month: (avg_daily_usage * Decimal::from(30)).round_dp(2),
    }
}

/// One line of the restock report.
#[derive(Debug, Clone, Serialize)]
pub struct RestockLine {
    /// The ingredient.
    #[serde(flatten)]
    pub item: InventoryItem,
    /// Alert tier.
    pub tier: AlertTier,
    /// Usage statistics over the trailing 30 days.
    #[serde(flatten)]
    pub stats: UsageStats,
    /// `recommended order quantity × cost per unit`.
    pub estimated_cost: Decimal,
}

/// Build the restock report: every ingredient with an alert tier, most
/// severe first, closest-to-empty first within a tier.
///
/// # Errors
///
/// Returns `RepositoryError` if any query fails.
pub async fn restock_report(
    inventory: &InventoryRepository<'_>,
    now: DateTime<Utc>,
) -> Result<Vec<RestockLine>, RepositoryError> {
    let since = now - Duration::days(REPORT_WINDOW_DAYS);
    let mut lines = Vec::new();

    for item in inventory.list().await? {
        let Some(tier) = classify(item.quantity, item.threshold) else {
            continue;
        };
        let movements = inventory.deduct_movements_since(item.id, since).await?;
        let stats = usage_stats(item.quantity, item.threshold, &movements, REPORT_WINDOW_DAYS);
        let estimated_cost = (stats.recommended_order_quantity * item.cost_per_unit).round_dp(2);
        lines.push(RestockLine {
            item,
            tier,
            stats,
            estimated_cost,
        });
    }

    lines.sort_by(|a, b| {
        b.tier.cmp(&a.tier).then_with(|| {
            let a_days = a.stats.days_until_empty.unwrap_or(Decimal::MAX);
            let b_days = b.stats.days_until_empty.unwrap_or(Decimal::MAX);
            a_days.cmp(&b_days)
        })
    });

    Ok(lines)
}

/// Analyze one ingredient's trend over the trailing `days`.
///
/// # Errors
///
/// Returns `RepositoryError` if any query fails.
pub async fn item_trend(
    inventory: &InventoryRepository<'_>,
    item_id: shortcakes_core::IngredientId,
    days: i64,
    now: DateTime<Utc>,
) -> Result<UsageTrend, RepositoryError> {
    let since = now - Duration::days(days.max(1));
    let movements = inventory.deduct_movements_since(item_id, since).await?;
    Ok(analyze_trend(&movements, since, now))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use shortcakes_core::{IngredientId, MovementId};

    fn dec(s: &str) -> Decimal {
        s.parse().expect("decimal literal")
    }

    fn movement(kind: MovementKind, change: &str, occurred_at: DateTime<Utc>) -> Movement {
        Movement {
            id: MovementId::new(1),
            item_id: IngredientId::new(1),
            kind,
            change: dec(change),
            quantity_after: Decimal::ZERO,
            order_id: None,
            note: None,
            occurred_at,
        }
    }

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 7, day, hour, 0, 0)
            .single()
            .expect("date")
    }

    // =========================================================================
    // Alert tiers (inclusive boundaries)
    // =========================================================================

    #[test]
    fn test_classify_critical_at_threshold() {
        assert_eq!(classify(dec("10"), dec("10")), Some(AlertTier::Critical));
        assert_eq!(classify(dec("3"), dec("10")), Some(AlertTier::Critical));
        assert_eq!(classify(dec("0"), dec("10")), Some(AlertTier::Critical));
    }

    #[test]
    fn test_classify_warning_boundary_inclusive() {
        // 1.5 × 10 = 15 is still warning
        assert_eq!(classify(dec("15"), dec("10")), Some(AlertTier::Warning));
        assert_eq!(classify(dec("10.01"), dec("10")), Some(AlertTier::Warning));
    }

    #[test]
    fn test_classify_watch_boundary_inclusive() {
        // 2 × 10 = 20 is still watch
        assert_eq!(classify(dec("20"), dec("10")), Some(AlertTier::Watch));
        assert_eq!(classify(dec("15.01"), dec("10")), Some(AlertTier::Watch));
    }

    #[test]
    fn test_classify_none_above_double_threshold() {
        assert_eq!(classify(dec("20.01"), dec("10")), None);
        assert_eq!(classify(dec("100"), dec("10")), None);
    }

    #[test]
    fn test_classify_zero_threshold() {
        assert_eq!(classify(dec("0"), dec("0")), Some(AlertTier::Critical));
        assert_eq!(classify(dec("1"), dec("0")), None);
    }

    #[test]
    fn test_tier_ordering_by_severity() {
        assert!(AlertTier::Critical > AlertTier::Warning);
        assert!(AlertTier::Warning > AlertTier::Watch);
    }

    // =========================================================================
    // Usage statistics
    // =========================================================================

    #[test]
    fn test_usage_stats_average_and_days_until_empty() {
        // 60 units deducted over a 30-day window: 2/day
        let movements = vec![
            movement(MovementKind::Deduct, "-40", at(1, 10)),
            movement(MovementKind::Deduct, "-20", at(15, 10)),
        ];
        let stats = usage_stats(dec("10"), dec("4"), &movements, 30);
        assert_eq!(stats.avg_daily_usage, dec("2"));
        assert_eq!(stats.days_until_empty, Some(dec("5.0")));
        assert_eq!(stats.estimated_monthly_usage, dec("60.00"));
    }

    #[test]
    fn test_usage_stats_ignores_non_deduct_movements() {
        let movements = vec![
            movement(MovementKind::Deduct, "-30", at(1, 10)),
            movement(MovementKind::Restock, "100", at(2, 10)),
            movement(MovementKind::Adjust, "-15", at(3, 10)),
        ];
        let stats = usage_stats(dec("10"), dec("4"), &movements, 30);
        assert_eq!(stats.avg_daily_usage, dec("1"));
    }

    #[test]
    fn test_usage_stats_no_usage() {
        let stats = usage_stats(dec("10"), dec("4"), &[], 30);
        assert_eq!(stats.avg_daily_usage, dec("0"));
        assert_eq!(stats.days_until_empty, None);
        // Falls back to 2 × threshold
        assert_eq!(stats.recommended_order_quantity, dec("8"));
    }

    #[test]
    fn test_recommended_order_quantity_takes_max() {
        // Heavy usage: estimated monthly 60 + threshold 4 = 64 > 2 × 4
        let movements = vec![movement(MovementKind::Deduct, "-60", at(1, 10))];
        let stats = usage_stats(dec("10"), dec("4"), &movements, 30);
        assert_eq!(stats.recommended_order_quantity, dec("64.00"));

        // Light usage: 2 × threshold wins
        let movements = vec![movement(MovementKind::Deduct, "-3", at(1, 10))];
        let stats = usage_stats(dec("10"), dec("40"), &movements, 30);
        assert_eq!(stats.recommended_order_quantity, dec("80"));
    }

    // =========================================================================
    // Trends
    // =========================================================================

    #[test]
    fn test_daily_usage_aggregates_by_day() {
        let movements = vec![
            movement(MovementKind::Deduct, "-2", at(1, 9)),
            movement(MovementKind::Deduct, "-3", at(1, 15)),
            movement(MovementKind::Deduct, "-4", at(2, 9)),
            movement(MovementKind::Restock, "50", at(2, 10)),
        ];
        let daily = daily_usage(&movements);
        assert_eq!(daily.len(), 2);
        assert_eq!(daily.first().map(|d| d.1), Some(dec("5")));
        assert_eq!(daily.last().map(|d| d.1), Some(dec("4")));
    }

    #[test]
    fn test_trend_rising() {
        let since = at(1, 0);
        let now = at(31, 0);
        // Early half: 10, late half: 20 -> +100%
        let movements = vec![
            movement(MovementKind::Deduct, "-10", at(5, 10)),
            movement(MovementKind::Deduct, "-20", at(25, 10)),
        ];
        let trend = analyze_trend(&movements, since, now);
        assert_eq!(trend.direction, TrendDirection::Rising);
        assert!((trend.percent_change - 100.0).abs() < f64::EPSILON);
        assert!((trend.confidence - 1.0).abs() < f64::EPSILON);
        assert_eq!(trend.avg_daily_usage, dec("1"));
        assert_eq!(trend.predicted_next_week, dec("7.00"));
        assert_eq!(trend.predicted_next_month, dec("30.00"));
    }

    #[test]
    fn test_trend_falling() {
        let since = at(1, 0);
        let now = at(31, 0);
        let movements = vec![
            movement(MovementKind::Deduct, "-20", at(5, 10)),
            movement(MovementKind::Deduct, "-10", at(25, 10)),
        ];
        let trend = analyze_trend(&movements, since, now);
        assert_eq!(trend.direction, TrendDirection::Falling);
        assert!((trend.percent_change - (-50.0)).abs() < f64::EPSILON);
    }

    #[test]
    fn test_trend_stable_within_threshold() {
        let since = at(1, 0);
        let now = at(31, 0);
        let movements = vec![
            movement(MovementKind::Deduct, "-10", at(5, 10)),
            movement(MovementKind::Deduct, "-10.5", at(25, 10)),
        ];
        let trend = analyze_trend(&movements, since, now);
        // +5% is inside the ±10% stability band
        assert_eq!(trend.direction, TrendDirection::Stable);
        // Confidence is floored
        assert!((trend.confidence - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn test_trend_no_early_usage_is_rising_low_confidence() {
        let since = at(1, 0);
        let now = at(31, 0);
        let movements = vec![movement(MovementKind::Deduct, "-10", at(25, 10))];
        let trend = analyze_trend(&movements, since, now);
        assert_eq!(trend.direction, TrendDirection::Rising);
        assert!((trend.confidence - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn test_trend_no_usage_is_stable() {
        let trend = analyze_trend(&[], at(1, 0), at(31, 0));
        assert_eq!(trend.direction, TrendDirection::Stable);
        assert_eq!(trend.avg_daily_usage, dec("0"));
        assert_eq!(trend.predicted_next_week, dec("0.00"));
    }

    #[test]
    fn test_trend_ignores_movements_outside_window() {
        let since = at(10, 0);
        let now = at(31, 0);
        let movements = vec![
            movement(MovementKind::Deduct, "-1000", at(1, 10)), // before window
            movement(MovementKind::Deduct, "-10", at(12, 10)),
            movement(MovementKind::Deduct, "-10", at(28, 10)),
        ];
        let trend = analyze_trend(&movements, since, now);
        assert_eq!(trend.direction, TrendDirection::Stable);
    }
}
