//! Dialog session store
//!
//! One explicit finite-state machine per chat, keyed by the external
//! chat id. Steps *take* the session out of the store and re-insert it
//! only when the dialog continues, so an abandoned or completed flow
//! never leaks a half-filled draft into the next conversation.

use dashmap::DashMap;

/// Where a chat currently is in a dialog
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogSession {
    /// Barista browsed available shifts and picks one by number
    SelectingShift { offered: Vec<i64> },
    /// Barista saw the shift details and confirms or cancels
    ConfirmingShift { shift_id: i64 },
    /// Barista answers accept/decline for pending assignments
    ReviewingPending { pending: Vec<i64> },
    /// Manager picks the day to edit
    ChangeSelectingDay,
    /// Manager picks one of the day's shifts by number
    ChangeSelectingShift { offered: Vec<i64> },
    /// Manager picks release/replace/assign on the shift
    ChangeChoosingAction {
        shift_id: i64,
        reservations: Vec<i64>,
    },
    /// Manager picks the barista to hand the slot to
    ChangeChoosingBarista {
        shift_id: i64,
        /// Staff member being replaced, if any
        displaced: Option<i64>,
        candidates: Vec<i64>,
    },
}

/// Sessions of every ongoing dialog
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: DashMap<i64, DialogSession>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }

    /// Set or replace the chat's dialog state
    pub fn set(&self, chat_id: i64, session: DialogSession) {
        self.sessions.insert(chat_id, session);
    }

    /// Remove and return the chat's dialog state
    pub fn take(&self, chat_id: i64) -> Option<DialogSession> {
        self.sessions.remove(&chat_id).map(|(_, s)| s)
    }

    /// Tear down the chat's dialog state, if any
    pub fn clear(&self, chat_id: i64) {
        self.sessions.remove(&chat_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_removes_the_session() {
        let store = SessionStore::new();
        store.set(7, DialogSession::ChangeSelectingDay);
        assert_eq!(store.take(7), Some(DialogSession::ChangeSelectingDay));
        assert_eq!(store.take(7), None);
    }

    #[test]
    fn set_replaces_the_previous_state() {
        let store = SessionStore::new();
        store.set(7, DialogSession::ChangeSelectingDay);
        store.set(7, DialogSession::ConfirmingShift { shift_id: 1 });
        assert_eq!(
            store.take(7),
            Some(DialogSession::ConfirmingShift { shift_id: 1 })
        );
    }

    #[test]
    fn clear_is_idempotent() {
        let store = SessionStore::new();
        store.set(7, DialogSession::ChangeSelectingDay);
        store.clear(7);
        store.clear(7);
        assert_eq!(store.take(7), None);
    }
}
