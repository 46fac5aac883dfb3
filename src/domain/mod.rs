//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (ids, errors, state machine, ownership, identity)
//! - `catalog` - Theme and schedule reference data
//! - `reservation` - Reservation lifecycle, waiting list, position calculation

pub mod catalog;
pub mod foundation;
pub mod reservation;
