//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `http` - axum REST API
//! - `memory` - In-process stores for tests and local runs
//! - `postgres` - PostgreSQL persistence

pub mod http;
pub mod memory;
pub mod postgres;

pub use memory::{InMemoryCatalog, InMemoryReservationStore};
