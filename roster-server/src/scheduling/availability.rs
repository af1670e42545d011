//! Availability Query
//!
//! Read path listing the shifts one staff member could book right now:
//! upcoming shifts of the home café (or the whole city), minus shifts
//! already booked, full, or colliding with the member's own schedule.
//! Advisory only — the booking path re-validates inside its own
//! transaction.

use shared::models::Shift;
use sqlx::SqlitePool;

use super::SchedulePolicy;
use super::conflict::{TimeRange, find_conflict};
use crate::db::repository::{cafe, reservation, shift, staff};
use crate::utils::{AppError, AppResult};
use std::collections::HashSet;

/// How far the staff member wants to browse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AvailabilityScope {
    /// Shifts of the member's home café only
    #[default]
    HomeCafe,
    /// Shifts of every active café in the member's city
    City,
}

impl AvailabilityScope {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "home" => Some(Self::HomeCafe),
            "city" => Some(Self::City),
            _ => None,
        }
    }
}

/// Shifts open for booking by `staff_id` within the policy horizon,
/// ascending by start time.
pub async fn list_available_shifts(
    pool: &SqlitePool,
    policy: SchedulePolicy,
    staff_id: i64,
    scope: AvailabilityScope,
) -> AppResult<Vec<Shift>> {
    let mut conn = pool.acquire().await?;

    let staff = staff::find_by_id(&mut conn, staff_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Staff member {staff_id} not found")))?;
    let cafe_id = staff.cafe_id.ok_or_else(|| {
        AppError::validation("Staff member is not attached to a café; ask an administrator")
    })?;

    let now = shared::util::now_millis();
    let horizon_end = now + policy.horizon_millis();

    let candidates = match scope {
        AvailabilityScope::HomeCafe => {
            shift::find_in_cafe_window(&mut conn, cafe_id, now, horizon_end).await?
        }
        AvailabilityScope::City => {
            let home = cafe::find_by_id(&mut conn, cafe_id)
                .await?
                .ok_or_else(|| AppError::not_found(format!("Cafe {cafe_id} not found")))?;
            shift::find_in_city_window(&mut conn, &home.city, now, horizon_end).await?
        }
    };

    // The member's own effective bookings: both the booked-shift filter
    // and the conflict windows come from this one snapshot
    let slots = reservation::find_effective_slots(&mut conn, staff_id).await?;
    let booked: HashSet<i64> = slots.iter().map(|s| s.shift_id).collect();
    let windows: Vec<TimeRange> = slots
        .iter()
        .map(|s| TimeRange::new(s.start_time, s.end_time))
        .collect();

    let mut available = Vec::new();
    for candidate in candidates {
        if booked.contains(&candidate.id) {
            continue;
        }
        let active = reservation::count_active_by_shift(&mut conn, candidate.id).await?;
        if active >= candidate.capacity {
            continue;
        }
        let window = TimeRange::new(candidate.start_time, candidate.end_time);
        if find_conflict(window, windows.iter().copied(), policy.min_gap_millis()).is_some() {
            continue;
        }
        available.push(candidate);
    }

    Ok(available)
}
