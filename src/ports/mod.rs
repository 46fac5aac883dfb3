//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `CatalogReader` - Theme and schedule reference data
//! - `ReservationRepository` - Reservation persistence and slot exclusivity
//! - `WaitingRepository` - Per-schedule waiting queues with computed positions
//! - `CancellationPromoter` - Atomic approve-cancel plus waitlist promotion

mod cancellation_promoter;
mod catalog_reader;
mod reservation_repository;
mod waiting_repository;

pub use cancellation_promoter::{CancellationPromoter, Promotion};
pub use catalog_reader::CatalogReader;
pub use reservation_repository::ReservationRepository;
pub use waiting_repository::WaitingRepository;
