//! Scheduling core — 排班与预订引擎
//!
//! The reservation and conflict-resolution engine behind both the REST
//! API and the bot dialogs:
//!
//! - [`conflict`] - pure interval overlap / minimum-gap detection
//! - [`capacity`] - free-slot accounting and per-status summaries
//! - [`reservations`] - reservation lifecycle (create, cancel, status
//!   transitions, attendance check-in)
//! - [`booking`] - manager-driven reassignment of a shift slot
//! - [`availability`] - bookable-shift query for one staff member
//!
//! Every mutating operation runs its read-validate-write sequence inside
//! a single store transaction; a concurrent booking against the same
//! shift is serialized by the store, not by application locks. The
//! availability query is advisory only and is re-validated at booking
//! time.

pub mod availability;
pub mod booking;
pub mod capacity;
pub mod conflict;
pub mod reservations;

#[cfg(test)]
mod tests;

pub use availability::{AvailabilityScope, list_available_shifts};
pub use booking::change_booking;
pub use capacity::{ShiftLoad, ShiftStatusSummary, shift_load, status_summary};
pub use conflict::{Conflict, ConflictKind, TimeRange, find_conflict};
pub use reservations::{
    cancel_reservation, confirm_attendance, create_reservation, remove_reservation,
    update_reservation_status,
};

/// Tunables of the scheduling engine, derived from [`crate::core::Config`]
#[derive(Debug, Clone, Copy)]
pub struct SchedulePolicy {
    /// Minimum rest between two of one staff member's shifts (minutes)
    pub min_gap_minutes: i64,
    /// How far ahead the availability query looks (days)
    pub horizon_days: i64,
    /// Business timezone as a fixed UTC offset (minutes)
    pub tz_offset_minutes: i32,
}

impl SchedulePolicy {
    pub fn min_gap_millis(&self) -> i64 {
        self.min_gap_minutes * 60_000
    }

    pub fn horizon_millis(&self) -> i64 {
        self.horizon_days * 24 * 3_600_000
    }
}

impl Default for SchedulePolicy {
    fn default() -> Self {
        Self {
            min_gap_minutes: 60,
            horizon_days: 14,
            tz_offset_minutes: 0,
        }
    }
}
