//! Catalog reader port (reference data).
//!
//! Themes and schedules are owned by another part of the system; this
//! service only reads them.

use async_trait::async_trait;

use crate::domain::catalog::{Schedule, Theme};
use crate::domain::foundation::{DomainError, ScheduleId};

/// Read-only access to themes and schedules.
#[async_trait]
pub trait CatalogReader: Send + Sync {
    /// Find a schedule by its ID.
    ///
    /// Returns `None` if not found.
    async fn find_schedule(&self, id: ScheduleId) -> Result<Option<Schedule>, DomainError>;

    /// List all themes ordered by id.
    async fn list_themes(&self) -> Result<Vec<Theme>, DomainError>;
}
