//! Shift Model

use serde::{Deserialize, Serialize};

/// Shift entity - a bounded staffing window at one café
///
/// Timestamps are Unix millis. The window must lie inside the owning
/// café's operating hours, and shifts of the same café never overlap
/// (touching boundaries are fine: one shift may end exactly when the
/// next one starts).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Shift {
    pub id: i64,
    pub cafe_id: i64,
    /// Shift start (Unix millis)
    pub start_time: i64,
    /// Shift end (Unix millis), strictly after `start_time`
    pub end_time: i64,
    /// Required headcount (1..=5)
    pub capacity: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create shift payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShiftCreate {
    pub cafe_id: i64,
    pub start_time: i64,
    pub end_time: i64,
    /// Required headcount (default 1)
    #[serde(default = "default_capacity")]
    pub capacity: i64,
}

fn default_capacity() -> i64 {
    1
}

/// Update shift payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShiftUpdate {
    pub cafe_id: Option<i64>,
    pub start_time: Option<i64>,
    pub end_time: Option<i64>,
    pub capacity: Option<i64>,
}
