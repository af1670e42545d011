//! Cafe Model

use serde::{Deserialize, Serialize};

/// Cafe entity
///
/// `open_time`/`close_time` are wall-clock "HH:MM" strings in the chain's
/// business timezone. Closing time is strictly after opening time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Cafe {
    pub id: i64,
    pub name: String,
    pub city: String,
    pub address: String,
    /// Opening time of day ("HH:MM")
    pub open_time: String,
    /// Closing time of day ("HH:MM"), strictly after `open_time`
    pub close_time: String,
    pub phone: String,
    pub description: Option<String>,
    pub is_active: bool,
    /// Manager staff reference (nullable; cleared when the manager is removed)
    pub manager_id: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create cafe payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CafeCreate {
    pub name: String,
    pub city: String,
    pub address: String,
    pub open_time: String,
    pub close_time: String,
    pub phone: String,
    pub description: Option<String>,
    /// 0 or absent clears the assignment
    pub manager_id: Option<i64>,
}

/// Update cafe payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CafeUpdate {
    pub name: Option<String>,
    pub city: Option<String>,
    pub address: Option<String>,
    pub open_time: Option<String>,
    pub close_time: Option<String>,
    pub phone: Option<String>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
    pub manager_id: Option<i64>,
}
