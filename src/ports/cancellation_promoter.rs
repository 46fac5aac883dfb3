//! Cancellation promoter port.
//!
//! Approving a cancellation frees the slot and hands it to the head of the
//! schedule's waiting list. The three writes involved (status change, queue
//! pop, reservation insert) must commit together: a concurrent removal of
//! the head entry must never lead to a double promotion or to promoting an
//! entry that no longer exists.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, ReservationId, ScheduleId, WaitingId};
use crate::domain::reservation::Reservation;

/// A waiting entry converted into a reservation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Promotion {
    /// The waiting entry that was removed.
    pub waiting_id: WaitingId,

    /// The APPROVED reservation created for its member.
    pub reservation: Reservation,
}

/// Unit-of-work port for the approve-cancel transition.
#[async_trait]
pub trait CancellationPromoter: Send + Sync {
    /// Atomically mark `reservation_id` CANCEL_APPROVED and promote the head
    /// of `schedule_id`'s waiting list.
    ///
    /// Returns `None` when the queue was empty.
    ///
    /// # Errors
    ///
    /// - `ReservationNotFound` if the reservation doesn't exist
    /// - `ConcurrencyConflict` if the reservation is no longer CANCEL_REQUESTED
    /// - `DatabaseError` on persistence failure (nothing is committed)
    async fn approve_cancel_and_promote(
        &self,
        reservation_id: ReservationId,
        schedule_id: ScheduleId,
    ) -> Result<Option<Promotion>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancellation_promoter_is_object_safe() {
        fn _accepts_dyn(_promoter: &dyn CancellationPromoter) {}
    }
}
