//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Following CQRS, it separates command handlers (write) from query handlers (read).

pub mod handlers;

pub use handlers::reservation::{
    // Commands
    ApproveCancelCommand, ApproveCancelHandler, ApproveCancelResult,
    ApproveReservationCommand, ApproveReservationHandler, ApproveReservationResult,
    CreateReservationCommand, CreateReservationHandler, CreateReservationResult,
    CreateWaitingCommand, CreateWaitingHandler, CreateWaitingResult,
    DeleteReservationCommand, DeleteReservationHandler,
    DeleteWaitingCommand, DeleteWaitingHandler,
    RejectReservationCommand, RejectReservationHandler, RejectReservationResult,
    RequestCancelCommand, RequestCancelHandler, RequestCancelResult,
    // Queries
    ListMyReservationsHandler, ListMyReservationsQuery,
    ListMyWaitingsHandler, ListMyWaitingsQuery,
    ListReservationsHandler, ListReservationsQuery,
    ListThemesHandler,
};
