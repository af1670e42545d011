//! Manager dialog: reassign or release shift slots of the home café.

use std::collections::HashSet;

use shared::models::StaffMember;

use super::{BotReply, DialogSession, parse_choice};
use crate::core::ServerState;
use crate::db::repository::{reservation, shift, staff};
use crate::scheduling;
use crate::utils::AppResult;
use crate::utils::time::{day_end_millis, day_start_millis, format_window, parse_date, to_local};

/// `change` — entry point; manager picks the day to edit
pub async fn start_change(state: &ServerState, staff: &StaffMember) -> AppResult<BotReply> {
    if !staff.role.can_manage() {
        return Ok(BotReply::text("Only managers change bookings."));
    }
    if staff.cafe_id.is_none() {
        return Ok(BotReply::text(
            "You are not attached to a café; ask an administrator.",
        ));
    }

    state
        .sessions
        .set(staff.chat_id, DialogSession::ChangeSelectingDay);
    Ok(BotReply::with_options(
        "Which day do you want to edit? (today, tomorrow, or YYYY-MM-DD)",
        vec![
            "today".to_string(),
            "tomorrow".to_string(),
            "cancel".to_string(),
        ],
    ))
}

/// Day picked; list that day's shifts with their occupancy
pub async fn select_day(
    state: &ServerState,
    staff: &StaffMember,
    text: &str,
) -> AppResult<BotReply> {
    let policy = state.policy();
    let today = to_local(shared::util::now_millis(), policy.tz_offset_minutes).date();
    let date = match text.to_lowercase().as_str() {
        "today" => today,
        "tomorrow" => today.succ_opt().unwrap_or(today),
        other => match parse_date(other) {
            Ok(date) => date,
            Err(_) => {
                state
                    .sessions
                    .set(staff.chat_id, DialogSession::ChangeSelectingDay);
                return Ok(BotReply::text(
                    "Please answer `today`, `tomorrow` or a date like 2026-08-05.",
                ));
            }
        },
    };

    // The attachment can disappear mid-dialog (admin edit); re-check
    let Some(cafe_id) = staff.cafe_id else {
        return Ok(BotReply::text(
            "You are not attached to a café; ask an administrator.",
        ));
    };
    let from = day_start_millis(date, policy.tz_offset_minutes);
    let to = day_end_millis(date, policy.tz_offset_minutes) - 1;

    let mut conn = state.pool().acquire().await?;
    let shifts = shift::find_in_cafe_window(&mut conn, cafe_id, from, to).await?;
    drop(conn);

    if shifts.is_empty() {
        return Ok(BotReply::text(format!("No shifts on {date}.")));
    }

    let mut lines = vec![format!("Shifts on {date}:")];
    let mut offered = Vec::with_capacity(shifts.len());
    for (index, item) in shifts.iter().enumerate() {
        let summary = scheduling::status_summary(state.pool(), item.id).await?;
        let marker = if summary.free_slots == 0 {
            "🔴 full"
        } else if summary.active_count > 0 {
            "🟡 partial"
        } else {
            "🟢 open"
        };
        lines.push(format!(
            "{}. {} {} ({}/{} staffed)",
            index + 1,
            format_window(item.start_time, item.end_time, policy.tz_offset_minutes),
            marker,
            summary.active_count,
            summary.capacity
        ));
        offered.push(item.id);
    }
    lines.push("Reply with a number to edit a shift.".to_string());

    let options = (1..=offered.len()).map(|n| n.to_string()).collect();
    state
        .sessions
        .set(staff.chat_id, DialogSession::ChangeSelectingShift { offered });
    Ok(BotReply::with_options(lines.join("\n"), options))
}

/// Shift picked; show its reservations and the possible actions
pub async fn select_shift(
    state: &ServerState,
    staff: &StaffMember,
    offered: &[i64],
    text: &str,
) -> AppResult<BotReply> {
    let Some(shift_id) = parse_choice(text, offered) else {
        state.sessions.set(
            staff.chat_id,
            DialogSession::ChangeSelectingShift {
                offered: offered.to_vec(),
            },
        );
        return Ok(BotReply::text("Please reply with one of the numbers."));
    };

    let mut conn = state.pool().acquire().await?;
    let Some(selected) = shift::find_by_id(&mut conn, shift_id).await? else {
        return Ok(BotReply::text("That shift is gone. Send `change` to refresh."));
    };
    let effective = reservation::find_effective_by_shift(&mut conn, shift_id).await?;

    let policy = state.policy();
    let mut lines = vec![format!(
        "Shift {}:",
        format_window(selected.start_time, selected.end_time, policy.tz_offset_minutes)
    )];
    let mut reservations = Vec::with_capacity(effective.len());
    for (index, booking) in effective.iter().enumerate() {
        let name = staff::find_by_id(&mut conn, booking.staff_id)
            .await?
            .map(|s| s.name)
            .unwrap_or_else(|| format!("staff {}", booking.staff_id));
        lines.push(format!("{}. {} — {}", index + 1, name, booking.status));
        reservations.push(booking.id);
    }
    drop(conn);

    let mut options = Vec::new();
    if reservations.is_empty() {
        lines.push("The shift is completely open.".to_string());
    } else {
        lines.push("Reply `release <n>` or `replace <n>`.".to_string());
        options.push("release 1".to_string());
        options.push("replace 1".to_string());
    }
    if (reservations.len() as i64) < selected.capacity {
        lines.push("Reply `assign` to add a barista.".to_string());
        options.push("assign".to_string());
    }
    options.push("cancel".to_string());

    state.sessions.set(
        staff.chat_id,
        DialogSession::ChangeChoosingAction {
            shift_id,
            reservations,
        },
    );
    Ok(BotReply::with_options(lines.join("\n"), options))
}

/// Action picked: release a booking, replace its holder, or assign a new
/// barista to an open slot
pub async fn choose_action(
    state: &ServerState,
    staff: &StaffMember,
    shift_id: i64,
    reservations: &[i64],
    text: &str,
) -> AppResult<BotReply> {
    let mut parts = text.split_whitespace();
    let verb = parts.next().unwrap_or_default().to_lowercase();
    let choice = parts.next().unwrap_or_default();

    match verb.as_str() {
        "release" | "replace" => {
            let Some(reservation_id) = parse_choice(choice, reservations) else {
                state.sessions.set(
                    staff.chat_id,
                    DialogSession::ChangeChoosingAction {
                        shift_id,
                        reservations: reservations.to_vec(),
                    },
                );
                return Ok(BotReply::text("Please name a booking number, e.g. `release 1`."));
            };

            let mut conn = state.pool().acquire().await?;
            let Some(booking) = reservation::find_by_id(&mut conn, reservation_id).await? else {
                return Ok(BotReply::text("That booking is gone. Send `change` to refresh."));
            };
            drop(conn);

            if verb == "release" {
                let policy = state.policy();
                scheduling::change_booking(
                    state.pool(),
                    policy,
                    &state.notifier,
                    shift_id,
                    booking.staff_id,
                    None,
                )
                .await?;
                return Ok(BotReply::text("Booking released; the barista was notified."));
            }

            let candidates = assignment_candidates(state, staff, shift_id).await?;
            offer_candidates(state, staff, shift_id, Some(booking.staff_id), candidates).await
        }
        "assign" => {
            let candidates = assignment_candidates(state, staff, shift_id).await?;
            offer_candidates(state, staff, shift_id, None, candidates).await
        }
        _ => {
            state.sessions.set(
                staff.chat_id,
                DialogSession::ChangeChoosingAction {
                    shift_id,
                    reservations: reservations.to_vec(),
                },
            );
            Ok(BotReply::text(
                "Please reply `release <n>`, `replace <n>` or `assign`.",
            ))
        }
    }
}

/// Active baristas of the manager's café without an effective claim on
/// this shift
async fn assignment_candidates(
    state: &ServerState,
    staff: &StaffMember,
    shift_id: i64,
) -> AppResult<Vec<(i64, String)>> {
    let cafe_id = staff
        .cafe_id
        .ok_or_else(|| crate::utils::AppError::validation("Manager has no café attached"))?;
    let mut conn = state.pool().acquire().await?;
    let booked: HashSet<i64> = reservation::find_effective_by_shift(&mut conn, shift_id)
        .await?
        .iter()
        .map(|r| r.staff_id)
        .collect();
    let candidates = staff::find_active_baristas(&mut conn, cafe_id)
        .await?
        .into_iter()
        .filter(|b| !booked.contains(&b.id))
        .map(|b| (b.id, b.name))
        .collect();
    Ok(candidates)
}

async fn offer_candidates(
    state: &ServerState,
    staff: &StaffMember,
    shift_id: i64,
    displaced: Option<i64>,
    candidates: Vec<(i64, String)>,
) -> AppResult<BotReply> {
    if candidates.is_empty() {
        return Ok(BotReply::text(
            "No free baristas in your café for this shift.",
        ));
    }

    let mut lines = vec!["Pick a barista:".to_string()];
    for (index, (_, name)) in candidates.iter().enumerate() {
        lines.push(format!("{}. {}", index + 1, name));
    }
    let options = (1..=candidates.len()).map(|n| n.to_string()).collect();

    state.sessions.set(
        staff.chat_id,
        DialogSession::ChangeChoosingBarista {
            shift_id,
            displaced,
            candidates: candidates.iter().map(|(id, _)| *id).collect(),
        },
    );
    Ok(BotReply::with_options(lines.join("\n"), options))
}

/// Barista picked; run the reassignment through the orchestrator
pub async fn choose_barista(
    state: &ServerState,
    staff: &StaffMember,
    shift_id: i64,
    displaced: Option<i64>,
    candidates: &[i64],
    text: &str,
) -> AppResult<BotReply> {
    let Some(new_staff_id) = parse_choice(text, candidates) else {
        state.sessions.set(
            staff.chat_id,
            DialogSession::ChangeChoosingBarista {
                shift_id,
                displaced,
                candidates: candidates.to_vec(),
            },
        );
        return Ok(BotReply::text("Please reply with one of the numbers."));
    };

    // With no displaced staff the candidate holds no booking on this
    // shift (the list filtered them out), so the locate step inside the
    // orchestrator is a no-op.
    let old_staff_id = displaced.unwrap_or(new_staff_id);
    let policy = state.policy();
    match scheduling::change_booking(
        state.pool(),
        policy,
        &state.notifier,
        shift_id,
        old_staff_id,
        Some(new_staff_id),
    )
    .await
    {
        Ok(_) => Ok(BotReply::text(
            "✅ Assignment sent; the barista was asked to confirm.",
        )),
        Err(e) => Ok(BotReply::text(format!("⚠️ Could not assign: {e}"))),
    }
}
