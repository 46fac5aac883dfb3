//! Waiting repository port.
//!
//! Each schedule has an append-only queue ordered by insertion. Entries
//! returned from this port carry their computed position.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, MemberId, ScheduleId, WaitingId};
use crate::domain::reservation::ReservationWaiting;

/// Repository port for waiting-list entries.
#[async_trait]
pub trait WaitingRepository: Send + Sync {
    /// Append an entry to the tail of the schedule's queue.
    ///
    /// If the member already waits on the schedule, returns the existing
    /// entry's id instead of queueing twice.
    async fn save(
        &self,
        member_id: &MemberId,
        schedule_id: ScheduleId,
    ) -> Result<WaitingId, DomainError>;

    /// Find an entry by its ID, with position.
    ///
    /// Returns `None` if not found.
    async fn find_by_id(&self, id: WaitingId) -> Result<Option<ReservationWaiting>, DomainError>;

    /// The earliest-inserted entry of a schedule's queue.
    async fn find_head_by_schedule_id(
        &self,
        schedule_id: ScheduleId,
    ) -> Result<Option<ReservationWaiting>, DomainError>;

    /// Entries owned by a member, ordered by id, each with position.
    async fn find_by_member(
        &self,
        member_id: &MemberId,
    ) -> Result<Vec<ReservationWaiting>, DomainError>;

    /// Remove an entry.
    ///
    /// # Errors
    ///
    /// - `WaitingNotFound` if the entry doesn't exist
    async fn delete_by_id(&self, id: WaitingId) -> Result<(), DomainError>;
}
