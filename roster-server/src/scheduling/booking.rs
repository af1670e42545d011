//! Booking Change Orchestrator
//!
//! Manager-driven reassignment of one shift slot: release the old staff
//! member's claim, optionally hand the slot to somebody else as a
//! pending (ONCONFIRM) assignment. All-or-nothing against the store; a
//! failed reassignment leaves the old booking untouched. Notifications
//! go out only after the transaction commits.

use shared::models::{Reservation, ReservationStatus};
use sqlx::SqlitePool;

use super::{SchedulePolicy, capacity, reservations};
use crate::db::repository::{reservation, shift, staff};
use crate::services::Notifier;
use crate::utils::time::format_window;
use crate::utils::{AppError, AppResult};

/// Reassign or release one staff member's slot on a shift.
///
/// Returns the newly created pending reservation, or `None` when the
/// slot was simply released.
pub async fn change_booking(
    pool: &SqlitePool,
    policy: SchedulePolicy,
    notifier: &Notifier,
    shift_id: i64,
    old_staff_id: i64,
    new_staff_id: Option<i64>,
) -> AppResult<Option<Reservation>> {
    let mut tx = pool.begin().await?;

    let shift = shift::find_by_id(&mut *tx, shift_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Shift {shift_id} not found")))?;

    // 1. Release the displaced staff member's claim, if any
    let old_reservation = reservation::find_effective_for_pair(&mut *tx, old_staff_id, shift_id).await?;
    let displaced = match &old_reservation {
        Some(r) => {
            reservation::update_status(&mut *tx, r.id, ReservationStatus::Cancelled).await?;
            staff::find_by_id(&mut *tx, old_staff_id).await?
        }
        None => None,
    };

    // 2. Hand the slot to the new staff member as a pending assignment
    let mut assigned = None;
    let created = match new_staff_id {
        Some(new_id) => {
            let new_staff = staff::find_by_id(&mut *tx, new_id)
                .await?
                .ok_or_else(|| AppError::not_found(format!("Staff member {new_id} not found")))?;

            if reservation::find_effective_for_pair(&mut *tx, new_id, shift_id)
                .await?
                .is_some()
            {
                return Err(AppError::DuplicateBooking(format!(
                    "Staff member {new_id} is already booked on shift {shift_id}"
                )));
            }

            // The change grows the active count only when nobody was
            // displaced; re-check capacity in that case
            if old_reservation.is_none() {
                let existing = reservation::find_by_shift(&mut *tx, shift_id).await?;
                let load = capacity::shift_load(&shift, &existing)?;
                if load.is_full() {
                    return Err(AppError::CapacityExceeded(format!(
                        "Shift {} is already fully staffed ({}/{})",
                        shift_id, load.active_count, shift.capacity
                    )));
                }
            }

            // A pending assignment is effective, so it must obey the
            // staff member's schedule like any other booking
            reservations::check_schedule(
                &mut *tx,
                policy,
                new_id,
                shift_id,
                shift.start_time,
                shift.end_time,
            )
            .await?;

            let row =
                reservation::create(&mut *tx, new_id, shift_id, ReservationStatus::OnConfirm)
                    .await?;
            assigned = Some(new_staff);
            Some(row)
        }
        None => None,
    };

    tx.commit().await?;

    // 3. Best-effort notifications, after the state change is durable
    let window = format_window(shift.start_time, shift.end_time, policy.tz_offset_minutes);
    if let Some(staff) = displaced {
        notifier.notify(
            staff.chat_id,
            format!("Your booking for the shift {window} was cancelled."),
        );
    }
    if let Some(staff) = &assigned {
        notifier.notify(
            staff.chat_id,
            format!("You have been assigned the shift {window}. Please confirm or decline it."),
        );
    }

    tracing::info!(
        shift_id,
        old_staff_id,
        new_staff_id = ?new_staff_id,
        reassigned = created.is_some(),
        "Booking changed"
    );
    Ok(created)
}
