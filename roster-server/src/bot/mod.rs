//! Bot 对话层
//!
//! Thin conversational front-end over the scheduling core. The bot
//! platform relays each inbound message to `/api/bot/update`; replies
//! carry the response text plus an option keyboard. Dialog state lives
//! in [`SessionStore`] as an explicit per-chat state machine.
//!
//! Commands: `slots` (browse + book), `my` (bookings and pending
//! assignments), `going` (attendance check-in), `change` (manager slot
//! reassignment), `cancel`, `help`.

mod barista;
mod manager;
pub mod session;

pub use session::{DialogSession, SessionStore};

use serde::{Deserialize, Serialize};
use shared::models::StaffMember;

use crate::core::ServerState;
use crate::db::repository::staff;
use crate::utils::AppResult;

/// Inbound message relayed by the bot platform
#[derive(Debug, Clone, Deserialize)]
pub struct BotUpdate {
    pub chat_id: i64,
    pub text: String,
}

/// Outbound reply: text plus an optional one-tap keyboard
#[derive(Debug, Clone, Serialize)]
pub struct BotReply {
    pub text: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}

impl BotReply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            options: Vec::new(),
        }
    }

    pub fn with_options(text: impl Into<String>, options: Vec<String>) -> Self {
        Self {
            text: text.into(),
            options,
        }
    }
}

/// Role-aware main menu; always tears the current dialog down
fn main_menu(staff: &StaffMember) -> BotReply {
    let mut options = vec!["slots".to_string(), "my".to_string(), "going".to_string()];
    if staff.role.can_manage() {
        options.push("change".to_string());
    }
    BotReply::with_options(
        format!("Hi {}! What would you like to do?", staff.name),
        options,
    )
}

/// Dispatch one inbound message: global commands first, then the active
/// dialog step, falling back to the menu.
pub async fn handle_update(state: &ServerState, update: BotUpdate) -> AppResult<BotReply> {
    let mut conn = state.pool().acquire().await?;
    let staff = staff::find_by_chat_id(&mut conn, update.chat_id).await?;
    drop(conn);

    let Some(staff) = staff else {
        state.sessions.clear(update.chat_id);
        return Ok(BotReply::text(
            "You are not registered. Ask your manager to add you.",
        ));
    };
    if !staff.is_active {
        state.sessions.clear(update.chat_id);
        return Ok(BotReply::text(
            "Your account is awaiting confirmation by a manager.",
        ));
    }

    let text = update.text.trim();

    // Global commands reset whatever dialog was running
    match text.to_lowercase().as_str() {
        "cancel" => {
            state.sessions.clear(staff.chat_id);
            return Ok(BotReply::text("Okay, cancelled."));
        }
        "help" | "start" | "menu" => {
            state.sessions.clear(staff.chat_id);
            return Ok(main_menu(&staff));
        }
        "slots" => {
            state.sessions.clear(staff.chat_id);
            return barista::start_slots(state, &staff).await;
        }
        "my" => {
            state.sessions.clear(staff.chat_id);
            return barista::my_slots(state, &staff).await;
        }
        "going" => {
            state.sessions.clear(staff.chat_id);
            return barista::confirm_going(state, &staff).await;
        }
        "change" => {
            state.sessions.clear(staff.chat_id);
            return manager::start_change(state, &staff).await;
        }
        _ => {}
    }

    // Continue the active dialog, if there is one
    let Some(session) = state.sessions.take(staff.chat_id) else {
        return Ok(main_menu(&staff));
    };

    match session {
        DialogSession::SelectingShift { offered } => {
            barista::select_shift(state, &staff, &offered, text).await
        }
        DialogSession::ConfirmingShift { shift_id } => {
            barista::confirm_booking(state, &staff, shift_id, text).await
        }
        DialogSession::ReviewingPending { pending } => {
            barista::resolve_pending(state, &staff, &pending, text).await
        }
        DialogSession::ChangeSelectingDay => manager::select_day(state, &staff, text).await,
        DialogSession::ChangeSelectingShift { offered } => {
            manager::select_shift(state, &staff, &offered, text).await
        }
        DialogSession::ChangeChoosingAction {
            shift_id,
            reservations,
        } => manager::choose_action(state, &staff, shift_id, &reservations, text).await,
        DialogSession::ChangeChoosingBarista {
            shift_id,
            displaced,
            candidates,
        } => manager::choose_barista(state, &staff, shift_id, displaced, &candidates, text).await,
    }
}

/// Parse a 1-based option number against the offered list
fn parse_choice(text: &str, offered: &[i64]) -> Option<i64> {
    let index: usize = text.parse().ok()?;
    if index == 0 {
        return None;
    }
    offered.get(index - 1).copied()
}
