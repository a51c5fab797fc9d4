//! Weekly opening/pickup schedule domain models.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use shortcakes_core::ScheduleId;

/// Opening hours for one weekday.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleDay {
    /// Unique schedule row ID.
    pub id: ScheduleId,
    /// Weekday, 0 = Sunday through 6 = Saturday.
    pub day_of_week: i32,
    /// Opening time.
    pub opens_at: NaiveTime,
    /// Closing time.
    pub closes_at: NaiveTime,
    /// Closed days keep their hours but are flagged shut.
    pub is_open: bool,
    /// Note shown to customers ("holiday hours").
    pub note: Option<String>,
}

/// Input for setting a weekday's hours.
#[derive(Debug, Clone, Deserialize)]
pub struct UpsertScheduleInput {
    pub opens_at: NaiveTime,
    pub closes_at: NaiveTime,
    #[serde(default = "default_true")]
    pub is_open: bool,
    pub note: Option<String>,
}

const fn default_true() -> bool {
    true
}
