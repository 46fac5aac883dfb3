//! In-memory adapters.
//!
//! Back the ports with process-local state for tests and for running the
//! service without a database.

mod catalog;
mod reservation_store;

pub use catalog::InMemoryCatalog;
pub use reservation_store::InMemoryReservationStore;
