//! Reservation Lifecycle Manager
//!
//! The state machine for a single reservation: creation, cancellation,
//! status transitions and attendance check-in. Each operation runs its
//! read-validate-write sequence inside one store transaction so that
//! concurrent bookings against the same shift are serialized by the
//! store.

use shared::models::{Reservation, ReservationStatus};
use sqlx::SqlitePool;

use super::conflict::{ConflictKind, TimeRange, find_conflict};
use super::{SchedulePolicy, capacity};
use crate::db::repository::{reservation, shift, staff};
use crate::utils::time::format_window;
use crate::utils::{AppError, AppResult};

/// Self-service booking: validates existence, capacity, duplicates and
/// the staff member's own schedule, then writes a RESERVED row.
pub async fn create_reservation(
    pool: &SqlitePool,
    policy: SchedulePolicy,
    staff_id: i64,
    shift_id: i64,
) -> AppResult<Reservation> {
    let mut tx = pool.begin().await?;

    let shift = shift::find_by_id(&mut *tx, shift_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Shift {shift_id} not found")))?;
    let staff = staff::find_by_id(&mut *tx, staff_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Staff member {staff_id} not found")))?;
    if !staff.is_active {
        return Err(AppError::forbidden(
            "Staff member is not confirmed yet and cannot book shifts",
        ));
    }

    // Capacity check, same transaction as the write (lost-update defense)
    let existing = reservation::find_by_shift(&mut *tx, shift_id).await?;
    let load = capacity::shift_load(&shift, &existing)?;
    if load.is_full() {
        return Err(AppError::CapacityExceeded(format!(
            "Shift {} is already fully staffed ({}/{})",
            shift_id, load.active_count, shift.capacity
        )));
    }

    if reservation::find_effective_for_pair(&mut *tx, staff_id, shift_id)
        .await?
        .is_some()
    {
        return Err(AppError::DuplicateBooking(format!(
            "Staff member {staff_id} already holds a booking on shift {shift_id}"
        )));
    }

    check_schedule(&mut *tx, policy, staff_id, shift_id, shift.start_time, shift.end_time).await?;

    let created =
        reservation::create(&mut *tx, staff_id, shift_id, ReservationStatus::Reserved).await?;
    tx.commit().await?;

    tracing::info!(
        reservation_id = created.id,
        staff_id,
        shift_id,
        "Reservation created"
    );
    Ok(created)
}

/// Overlap / minimum-gap check of a candidate window against every other
/// effective booking of the staff member.
pub(super) async fn check_schedule(
    conn: &mut sqlx::SqliteConnection,
    policy: SchedulePolicy,
    staff_id: i64,
    shift_id: i64,
    start_time: i64,
    end_time: i64,
) -> AppResult<()> {
    let slots = reservation::find_effective_slots(conn, staff_id).await?;
    let others = slots
        .iter()
        .filter(|s| s.shift_id != shift_id)
        .map(|s| TimeRange::new(s.start_time, s.end_time));

    if let Some(found) = find_conflict(TimeRange::new(start_time, end_time), others, policy.min_gap_millis()) {
        let window = format_window(found.other.start, found.other.end, policy.tz_offset_minutes);
        let message = match found.kind {
            ConflictKind::Overlap => {
                format!("Booking overlaps another shift of yours at {window}")
            }
            ConflictKind::GapBefore => format!(
                "Less than {} minutes after your previous shift at {window}",
                policy.min_gap_minutes
            ),
            ConflictKind::GapAfter => format!(
                "Less than {} minutes before your next shift at {window}",
                policy.min_gap_minutes
            ),
        };
        return Err(AppError::ScheduleConflict(message));
    }
    Ok(())
}

/// Cancel a reservation. Cancelling an already-cancelled row is an
/// idempotent no-op, not an error.
pub async fn cancel_reservation(pool: &SqlitePool, reservation_id: i64) -> AppResult<Reservation> {
    update_reservation_status(pool, reservation_id, ReservationStatus::Cancelled).await
}

/// Transition a reservation to `new_status`, enforcing the transition
/// table: terminal statuses only permit the idempotent self-edge.
pub async fn update_reservation_status(
    pool: &SqlitePool,
    reservation_id: i64,
    new_status: ReservationStatus,
) -> AppResult<Reservation> {
    let mut tx = pool.begin().await?;

    let current = reservation::find_by_id(&mut *tx, reservation_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Reservation {reservation_id} not found")))?;

    if current.status == new_status {
        // Self-edge: leave the row untouched
        return Ok(current);
    }
    if !current.status.can_transition_to(new_status) {
        return Err(AppError::BusinessRule(format!(
            "Reservation {} is {} and cannot move to {}",
            reservation_id, current.status, new_status
        )));
    }

    let updated = reservation::update_status(&mut *tx, reservation_id, new_status).await?;
    tx.commit().await?;

    tracing::info!(
        reservation_id,
        from = %current.status,
        to = %new_status,
        "Reservation status updated"
    );
    Ok(updated)
}

/// Staff check-in: find the nearest confirmable reservation whose shift
/// window contains now and mark it ATTENDED.
pub async fn confirm_attendance(pool: &SqlitePool, staff_id: i64) -> AppResult<Reservation> {
    let mut tx = pool.begin().await?;

    staff::find_by_id(&mut *tx, staff_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Staff member {staff_id} not found")))?;

    let now = shared::util::now_millis();
    let active = reservation::find_active_at(&mut *tx, staff_id, now).await?;
    let Some(slot) = active.first() else {
        return Err(AppError::NoActiveShift(
            "No shift of yours is running right now".into(),
        ));
    };

    let updated =
        reservation::update_status(&mut *tx, slot.id, ReservationStatus::Attended).await?;
    tx.commit().await?;

    tracing::info!(reservation_id = slot.id, staff_id, "Attendance confirmed");
    Ok(updated)
}

/// Manager-initiated hard delete; the slot opens up immediately.
pub async fn remove_reservation(pool: &SqlitePool, reservation_id: i64) -> AppResult<Reservation> {
    let mut tx = pool.begin().await?;

    let current = reservation::find_by_id(&mut *tx, reservation_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Reservation {reservation_id} not found")))?;
    reservation::delete(&mut *tx, reservation_id).await?;
    tx.commit().await?;

    tracing::info!(reservation_id, "Reservation removed");
    Ok(current)
}
