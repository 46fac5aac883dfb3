//! HTTP adapters - REST API implementations.
//!
//! - `middleware` - Trusted-header caller identity
//! - `reservation` - Reservation, waiting-list and catalog endpoints
//! - `router` - Application assembly with tracing, timeout and request-id layers

pub mod middleware;
pub mod reservation;
pub mod router;

pub use reservation::{reservation_router, ReservationAppState};
pub use router::build_app;
