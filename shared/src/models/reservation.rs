//! Reservation Model

use serde::{Deserialize, Serialize};

/// Reservation status
///
/// `Reserved`, `OnConfirm` and `Attended` are *effective*: they count
/// against shift capacity and staff-schedule conflicts. `Cancelled`
/// rows are inert history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
pub enum ReservationStatus {
    /// Self-service booking, or a pending assignment accepted by staff
    #[serde(rename = "RESERVED")]
    #[cfg_attr(feature = "db", sqlx(rename = "RESERVED"))]
    Reserved,
    /// Manager assignment awaiting the staff member's confirmation
    #[serde(rename = "ONCONFIRM")]
    #[cfg_attr(feature = "db", sqlx(rename = "ONCONFIRM"))]
    OnConfirm,
    /// Staff checked in during the shift window (terminal)
    #[serde(rename = "ATTENDED")]
    #[cfg_attr(feature = "db", sqlx(rename = "ATTENDED"))]
    Attended,
    /// Released slot (terminal)
    #[serde(rename = "CANCELLED")]
    #[cfg_attr(feature = "db", sqlx(rename = "CANCELLED"))]
    Cancelled,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Reserved => "RESERVED",
            Self::OnConfirm => "ONCONFIRM",
            Self::Attended => "ATTENDED",
            Self::Cancelled => "CANCELLED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "RESERVED" => Some(Self::Reserved),
            "ONCONFIRM" => Some(Self::OnConfirm),
            "ATTENDED" => Some(Self::Attended),
            "CANCELLED" => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// Counts toward capacity and schedule conflicts
    pub fn is_effective(&self) -> bool {
        match self {
            Self::Reserved | Self::OnConfirm | Self::Attended => true,
            Self::Cancelled => false,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Attended | Self::Cancelled)
    }

    /// Status transition table.
    ///
    /// Terminal statuses only permit the idempotent self-edge (so
    /// cancelling a cancelled reservation stays a no-op). Reserved and
    /// OnConfirm may move anywhere, covering check-in, release and the
    /// manager confirm/decline resolution of a pending assignment.
    pub fn can_transition_to(&self, next: ReservationStatus) -> bool {
        if *self == next {
            return true;
        }
        match self {
            Self::Reserved | Self::OnConfirm => true,
            Self::Attended | Self::Cancelled => false,
        }
    }
}

impl std::fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reservation entity - one staff member's claim on one shift slot
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Reservation {
    pub id: i64,
    pub staff_id: i64,
    pub shift_id: i64,
    pub status: ReservationStatus,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create reservation payload
///
/// The status is decided by the core: self-service booking starts at
/// RESERVED, manager assignment at ONCONFIRM.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationCreate {
    pub shift_id: i64,
    /// Defaults to the authenticated caller; managers may book for others
    pub staff_id: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effective_statuses() {
        assert!(ReservationStatus::Reserved.is_effective());
        assert!(ReservationStatus::OnConfirm.is_effective());
        assert!(ReservationStatus::Attended.is_effective());
        assert!(!ReservationStatus::Cancelled.is_effective());
    }

    #[test]
    fn terminal_statuses_only_allow_self_edge() {
        use ReservationStatus::*;
        assert!(Cancelled.can_transition_to(Cancelled));
        assert!(Attended.can_transition_to(Attended));
        assert!(!Cancelled.can_transition_to(Reserved));
        assert!(!Attended.can_transition_to(Reserved));
        assert!(!Attended.can_transition_to(Cancelled));
    }

    #[test]
    fn open_statuses_allow_every_edge() {
        use ReservationStatus::*;
        for next in [Reserved, OnConfirm, Attended, Cancelled] {
            assert!(Reserved.can_transition_to(next));
            assert!(OnConfirm.can_transition_to(next));
        }
    }

    #[test]
    fn status_round_trips_through_wire_names() {
        use ReservationStatus::*;
        for status in [Reserved, OnConfirm, Attended, Cancelled] {
            assert_eq!(ReservationStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(ReservationStatus::parse("reserved"), None);
    }
}
