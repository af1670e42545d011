//! Domain models
//!
//! Entity structs plus the Create/Update payloads accepted by the API.
//! Statuses and roles are closed enums; every consumer matches
//! exhaustively, so adding a variant forces a revisit of each decision
//! point.

pub mod cafe;
pub mod reservation;
pub mod shift;
pub mod staff;

pub use cafe::{Cafe, CafeCreate, CafeUpdate};
pub use reservation::{Reservation, ReservationCreate, ReservationStatus};
pub use shift::{Shift, ShiftCreate, ShiftUpdate};
pub use staff::{StaffCreate, StaffMember, StaffRole, StaffUpdate};
