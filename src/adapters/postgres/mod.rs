//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! - `PostgresCatalogReader` - Theme and schedule lookups
//! - `PostgresReservationRepository` - Reservations, slot exclusivity via a partial unique index
//! - `PostgresWaitingRepository` - Waiting queues with windowed position counts
//! - `PostgresCancellationPromoter` - Transactional approve-cancel and promotion

mod cancellation_promoter;
mod catalog_reader;
mod pool;
mod reservation_repository;
mod rows;
mod waiting_repository;

pub use cancellation_promoter::PostgresCancellationPromoter;
pub use catalog_reader::PostgresCatalogReader;
pub use pool::{connect, migrate};
pub use reservation_repository::PostgresReservationRepository;
pub use waiting_repository::PostgresWaitingRepository;
