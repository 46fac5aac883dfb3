//! Reservation command and query handlers.

mod approve_cancel;
mod approve_reservation;
mod create_reservation;
mod create_waiting;
mod delete_reservation;
mod delete_waiting;
mod list_my_reservations;
mod list_my_waitings;
mod list_reservations;
mod list_themes;
mod reject_reservation;
mod request_cancel;
#[cfg(test)]
mod test_support;

pub use approve_cancel::{ApproveCancelCommand, ApproveCancelHandler, ApproveCancelResult};
pub use approve_reservation::{
    ApproveReservationCommand, ApproveReservationHandler, ApproveReservationResult,
};
pub use create_reservation::{
    CreateReservationCommand, CreateReservationHandler, CreateReservationResult,
};
pub use create_waiting::{CreateWaitingCommand, CreateWaitingHandler, CreateWaitingResult};
pub use delete_reservation::{DeleteReservationCommand, DeleteReservationHandler};
pub use delete_waiting::{DeleteWaitingCommand, DeleteWaitingHandler};
pub use list_my_reservations::{ListMyReservationsHandler, ListMyReservationsQuery};
pub use list_my_waitings::{ListMyWaitingsHandler, ListMyWaitingsQuery};
pub use list_reservations::{ListReservationsHandler, ListReservationsQuery};
pub use list_themes::ListThemesHandler;
pub use reject_reservation::{
    RejectReservationCommand, RejectReservationHandler, RejectReservationResult,
};
pub use request_cancel::{RequestCancelCommand, RequestCancelHandler, RequestCancelResult};
