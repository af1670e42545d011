//! Barista dialogs: browse and book shifts, review pending assignments,
//! confirm attendance.

use shared::models::{ReservationStatus, StaffMember, StaffRole};

use super::{BotReply, DialogSession, parse_choice};
use crate::core::ServerState;
use crate::db::repository::{cafe, reservation, shift};
use crate::scheduling::{self, AvailabilityScope};
use crate::utils::AppResult;
use crate::utils::time::format_window;

/// `slots` — list bookable shifts across the barista's city
pub async fn start_slots(state: &ServerState, staff: &StaffMember) -> AppResult<BotReply> {
    if staff.role != StaffRole::Barista {
        return Ok(BotReply::text("Only baristas book shifts here."));
    }

    let policy = state.policy();
    let available = match scheduling::list_available_shifts(
        state.pool(),
        policy,
        staff.id,
        AvailabilityScope::City,
    )
    .await
    {
        Ok(shifts) => shifts,
        Err(e) => return Ok(BotReply::text(format!("⚠️ {e}"))),
    };

    if available.is_empty() {
        return Ok(BotReply::text(format!(
            "No bookable shifts in your city for the next {} days.",
            policy.horizon_days
        )));
    }

    let mut conn = state.pool().acquire().await?;
    let mut lines = vec!["📅 Available shifts:".to_string()];
    let mut offered = Vec::with_capacity(available.len());
    for (index, item) in available.iter().enumerate() {
        let cafe_name = cafe::find_by_id(&mut conn, item.cafe_id)
            .await?
            .map(|c| c.name)
            .unwrap_or_else(|| "café".to_string());
        let active = reservation::count_active_by_shift(&mut conn, item.id).await?;
        lines.push(format!(
            "{}. {} · {} ({} free)",
            index + 1,
            format_window(item.start_time, item.end_time, policy.tz_offset_minutes),
            cafe_name,
            item.capacity - active
        ));
        offered.push(item.id);
    }
    lines.push("Reply with a number to pick a shift.".to_string());

    let options = (1..=offered.len()).map(|n| n.to_string()).collect();
    state
        .sessions
        .set(staff.chat_id, DialogSession::SelectingShift { offered });
    Ok(BotReply::with_options(lines.join("\n"), options))
}

/// Numbered pick from the offered list; shows details and asks to confirm
pub async fn select_shift(
    state: &ServerState,
    staff: &StaffMember,
    offered: &[i64],
    text: &str,
) -> AppResult<BotReply> {
    let Some(shift_id) = parse_choice(text, offered) else {
        state.sessions.set(
            staff.chat_id,
            DialogSession::SelectingShift {
                offered: offered.to_vec(),
            },
        );
        return Ok(BotReply::text("Please reply with one of the numbers."));
    };

    let mut conn = state.pool().acquire().await?;
    let Some(selected) = shift::find_by_id(&mut conn, shift_id).await? else {
        return Ok(BotReply::text("That shift is gone. Send `slots` to refresh."));
    };
    let owner = cafe::find_by_id(&mut conn, selected.cafe_id).await?;
    drop(conn);

    let policy = state.policy();
    let summary = scheduling::status_summary(state.pool(), shift_id).await?;
    let place = owner
        .map(|c| format!("{} · {}, {}", c.name, c.city, c.address))
        .unwrap_or_else(|| "café".to_string());

    state
        .sessions
        .set(staff.chat_id, DialogSession::ConfirmingShift { shift_id });
    Ok(BotReply::with_options(
        format!(
            "ℹ️ {}\n📍 {}\n👥 Free slots: {}/{}\nBook this shift?",
            format_window(selected.start_time, selected.end_time, policy.tz_offset_minutes),
            place,
            summary.free_slots,
            summary.capacity
        ),
        vec!["confirm".to_string(), "cancel".to_string()],
    ))
}

/// Final booking step; validation runs again inside the core
pub async fn confirm_booking(
    state: &ServerState,
    staff: &StaffMember,
    shift_id: i64,
    text: &str,
) -> AppResult<BotReply> {
    if !text.eq_ignore_ascii_case("confirm") {
        return Ok(BotReply::text("Booking cancelled."));
    }

    let policy = state.policy();
    match scheduling::create_reservation(state.pool(), policy, staff.id, shift_id).await {
        Ok(created) => {
            let mut conn = state.pool().acquire().await?;
            let booked = shift::find_by_id(&mut conn, created.shift_id).await?;
            // Tell the café's manager a slot was taken
            if let Some(booked) = &booked
                && let Some(owner) = cafe::find_by_id(&mut conn, booked.cafe_id).await?
                && let Some(manager_id) = owner.manager_id
                && let Some(manager) =
                    crate::db::repository::staff::find_by_id(&mut conn, manager_id).await?
            {
                state.notifier.notify(
                    manager.chat_id,
                    format!(
                        "{} booked the shift {} at {}.",
                        staff.name,
                        format_window(booked.start_time, booked.end_time, policy.tz_offset_minutes),
                        owner.name
                    ),
                );
            }
            let window = booked
                .map(|s| format_window(s.start_time, s.end_time, policy.tz_offset_minutes))
                .unwrap_or_default();
            Ok(BotReply::text(format!(
                "✅ You are booked for {window}. See you there!"
            )))
        }
        Err(e) => Ok(BotReply::text(format!("⚠️ Could not book: {e}"))),
    }
}

/// `my` — effective bookings, with accept/decline for pending assignments
pub async fn my_slots(state: &ServerState, staff: &StaffMember) -> AppResult<BotReply> {
    let policy = state.policy();
    let mut conn = state.pool().acquire().await?;
    let slots = reservation::find_effective_slots(&mut conn, staff.id).await?;
    drop(conn);

    if slots.is_empty() {
        return Ok(BotReply::text("You have no bookings."));
    }

    let mut lines = vec!["🗓 Your bookings:".to_string()];
    let mut pending = Vec::new();
    for slot in &slots {
        let window = format_window(slot.start_time, slot.end_time, policy.tz_offset_minutes);
        match slot.status {
            ReservationStatus::OnConfirm => {
                pending.push(slot.id);
                lines.push(format!(
                    "{}. {} — awaiting your confirmation",
                    pending.len(),
                    window
                ));
            }
            status => lines.push(format!("• {} — {}", window, status)),
        }
    }

    if pending.is_empty() {
        return Ok(BotReply::text(lines.join("\n")));
    }

    lines.push("Reply `accept <n>` or `decline <n>` for pending assignments.".to_string());
    state
        .sessions
        .set(staff.chat_id, DialogSession::ReviewingPending { pending });
    Ok(BotReply::text(lines.join("\n")))
}

/// `accept <n>` / `decline <n>` resolution of a pending assignment
pub async fn resolve_pending(
    state: &ServerState,
    staff: &StaffMember,
    pending: &[i64],
    text: &str,
) -> AppResult<BotReply> {
    let mut parts = text.split_whitespace();
    let verb = parts.next().unwrap_or_default().to_lowercase();
    let choice = parts.next().unwrap_or_default();

    let target = match verb.as_str() {
        "accept" | "decline" => parse_choice(choice, pending),
        _ => None,
    };
    let Some(reservation_id) = target else {
        state.sessions.set(
            staff.chat_id,
            DialogSession::ReviewingPending {
                pending: pending.to_vec(),
            },
        );
        return Ok(BotReply::text(
            "Please reply `accept <n>` or `decline <n>`.",
        ));
    };

    // The list was built for this chat, but re-check ownership anyway
    let mut conn = state.pool().acquire().await?;
    let owned = reservation::find_by_id(&mut conn, reservation_id)
        .await?
        .map(|r| r.staff_id == staff.id)
        .unwrap_or(false);
    drop(conn);
    if !owned {
        return Ok(BotReply::text("That assignment is not yours anymore."));
    }

    let new_status = if verb == "accept" {
        ReservationStatus::Reserved
    } else {
        ReservationStatus::Cancelled
    };
    match scheduling::update_reservation_status(state.pool(), reservation_id, new_status).await {
        Ok(_) if new_status == ReservationStatus::Reserved => {
            Ok(BotReply::text("✅ Assignment confirmed."))
        }
        Ok(_) => Ok(BotReply::text("Assignment declined.")),
        Err(e) => Ok(BotReply::text(format!("⚠️ {e}"))),
    }
}

/// `going` — attendance check-in for the currently running shift
pub async fn confirm_going(state: &ServerState, staff: &StaffMember) -> AppResult<BotReply> {
    if staff.role != StaffRole::Barista {
        return Ok(BotReply::text("Only baristas check in for shifts."));
    }
    match scheduling::confirm_attendance(state.pool(), staff.id).await {
        Ok(attended) => {
            let policy = state.policy();
            let mut conn = state.pool().acquire().await?;
            let window = shift::find_by_id(&mut conn, attended.shift_id)
                .await?
                .map(|s| format_window(s.start_time, s.end_time, policy.tz_offset_minutes))
                .unwrap_or_default();
            Ok(BotReply::text(format!("✅ Checked in for {window}.")))
        }
        Err(e) => Ok(BotReply::text(format!("⚠️ {e}"))),
    }
}
