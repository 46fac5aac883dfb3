//! Reservation repository port.
//!
//! # Design
//!
//! - **Store-assigned ids**: `save` returns the id from a monotonic sequence
//! - **Slot exclusivity**: at most one slot-holding reservation per schedule,
//!   enforced atomically by the implementation
//! - **Compare-and-set updates**: status changes name the status they expect

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::foundation::{DomainError, MemberId, ReservationId, ScheduleId, ThemeId};
use crate::domain::reservation::{Reservation, ReservationStatus};

/// Repository port for reservation persistence.
#[async_trait]
pub trait ReservationRepository: Send + Sync {
    /// Insert a reservation with the given initial status.
    ///
    /// # Errors
    ///
    /// - `SlotConflict` if `status` holds the slot and the schedule already
    ///   has a slot-holding reservation
    /// - `DatabaseError` on persistence failure
    async fn save(
        &self,
        member_id: &MemberId,
        schedule_id: ScheduleId,
        status: ReservationStatus,
    ) -> Result<ReservationId, DomainError>;

    /// Find a reservation by its ID.
    ///
    /// Returns `None` if not found.
    async fn find_by_id(&self, id: ReservationId) -> Result<Option<Reservation>, DomainError>;

    /// Reservations on schedules of `theme_id` taking place on `date`, ordered by id.
    async fn find_by_theme_and_date(
        &self,
        theme_id: ThemeId,
        date: NaiveDate,
    ) -> Result<Vec<Reservation>, DomainError>;

    /// Reservations owned by a member, ordered by id.
    async fn find_by_member(&self, member_id: &MemberId) -> Result<Vec<Reservation>, DomainError>;

    /// The reservation currently occupying a schedule, if any.
    async fn find_slot_holder(
        &self,
        schedule_id: ScheduleId,
    ) -> Result<Option<Reservation>, DomainError>;

    /// Change a reservation's status from `from` to `to`.
    ///
    /// # Errors
    ///
    /// - `ReservationNotFound` if the row doesn't exist
    /// - `ConcurrencyConflict` if the row's status is no longer `from`
    /// - `SlotConflict` if `to` holds the slot and another holder exists
    async fn update_status(
        &self,
        id: ReservationId,
        from: ReservationStatus,
        to: ReservationStatus,
    ) -> Result<(), DomainError>;

    /// Hard delete a reservation.
    ///
    /// # Errors
    ///
    /// - `ReservationNotFound` if the row doesn't exist
    async fn delete_by_id(&self, id: ReservationId) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reservation_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn ReservationRepository) {}
    }
}
