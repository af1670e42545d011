//! Capacity Tracker
//!
//! Free-slot accounting for a shift. Cancelled reservations are inert
//! history and never count. A negative free-slot figure means an earlier
//! invariant was broken; it surfaces as an internal error instead of
//! being clamped away.

use serde::Serialize;
use shared::models::{Reservation, ReservationStatus, Shift};
use sqlx::SqlitePool;

use crate::db::repository::{reservation, shift};
use crate::utils::{AppError, AppResult};

/// Occupancy of one shift
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ShiftLoad {
    pub capacity: i64,
    pub active_count: i64,
    pub free_slots: i64,
}

impl ShiftLoad {
    pub fn is_full(&self) -> bool {
        self.free_slots <= 0
    }
}

/// Compute occupancy from a shift and its full reservation list.
pub fn shift_load(shift: &Shift, reservations: &[Reservation]) -> AppResult<ShiftLoad> {
    let active_count = reservations
        .iter()
        .filter(|r| r.status.is_effective())
        .count() as i64;
    let free_slots = shift.capacity - active_count;
    if free_slots < 0 {
        return Err(AppError::internal(format!(
            "Shift {} holds {} active reservations over its capacity of {}",
            shift.id, active_count, shift.capacity
        )));
    }
    Ok(ShiftLoad {
        capacity: shift.capacity,
        active_count,
        free_slots,
    })
}

/// Occupancy plus per-status history counts for one shift
#[derive(Debug, Clone, Serialize)]
pub struct ShiftStatusSummary {
    pub shift_id: i64,
    pub capacity: i64,
    pub active_count: i64,
    pub free_slots: i64,
    pub reserved: i64,
    pub onconfirm: i64,
    pub attended: i64,
    pub cancelled: i64,
}

/// Per-status breakdown of a shift's reservations (manager view).
pub async fn status_summary(pool: &SqlitePool, shift_id: i64) -> AppResult<ShiftStatusSummary> {
    let mut conn = pool.acquire().await?;

    let shift = shift::find_by_id(&mut conn, shift_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Shift {shift_id} not found")))?;

    let mut summary = ShiftStatusSummary {
        shift_id,
        capacity: shift.capacity,
        active_count: 0,
        free_slots: 0,
        reserved: 0,
        onconfirm: 0,
        attended: 0,
        cancelled: 0,
    };

    for (status, count) in reservation::count_by_status(&mut conn, shift_id).await? {
        let Some(status) = ReservationStatus::parse(&status) else {
            return Err(AppError::internal(format!(
                "Unknown reservation status {status:?} on shift {shift_id}"
            )));
        };
        match status {
            ReservationStatus::Reserved => summary.reserved = count,
            ReservationStatus::OnConfirm => summary.onconfirm = count,
            ReservationStatus::Attended => summary.attended = count,
            ReservationStatus::Cancelled => summary.cancelled = count,
        }
    }

    summary.active_count = summary.reserved + summary.onconfirm + summary.attended;
    summary.free_slots = shift.capacity - summary.active_count;
    if summary.free_slots < 0 {
        return Err(AppError::internal(format!(
            "Shift {} holds {} active reservations over its capacity of {}",
            shift_id, summary.active_count, shift.capacity
        )));
    }
    Ok(summary)
}
