//! Reservation domain module.
//!
//! Reservations, waiting-list entries, their status state machine and the
//! waiting-list position calculation.

mod aggregate;
mod errors;
mod position;
mod status;
mod waiting;

pub use aggregate::Reservation;
pub use errors::ReservationError;
pub use position::{PositionCalculator, WaitPosition, DEFAULT_POSITION_WINDOW};
pub use status::ReservationStatus;
pub use waiting::ReservationWaiting;
