//! DeleteReservationHandler - Command handler for withdrawing a pending reservation.

use std::sync::Arc;

use tracing::info;

use crate::domain::foundation::{CommandMetadata, MemberId, ReservationId};
use crate::domain::reservation::ReservationError;
use crate::ports::ReservationRepository;

/// Command to hard-delete a reservation.
#[derive(Debug, Clone)]
pub struct DeleteReservationCommand {
    pub reservation_id: ReservationId,
    pub member_id: MemberId,
}

/// Handler for deleting reservations.
///
/// Only REQUESTED reservations may be deleted. They never held the slot,
/// so deletion does not promote anyone from the waiting list.
pub struct DeleteReservationHandler {
    repository: Arc<dyn ReservationRepository>,
}

impl DeleteReservationHandler {
    pub fn new(repository: Arc<dyn ReservationRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(
        &self,
        cmd: DeleteReservationCommand,
        metadata: CommandMetadata,
    ) -> Result<(), ReservationError> {
        // 1. Load
        let reservation = self
            .repository
            .find_by_id(cmd.reservation_id)
            .await?
            .ok_or(ReservationError::ReservationNotFound(cmd.reservation_id))?;

        // 2. Owner only, and only while pending
        reservation.ensure_deletable_by(&cmd.member_id)?;

        // 3. Delete
        self.repository
            .delete_by_id(cmd.reservation_id)
            .await
            .map_err(|e| {
                ReservationError::for_reservation(e, cmd.reservation_id, reservation.schedule_id())
            })?;

        info!(
            reservation_id = %cmd.reservation_id,
            member_id = %cmd.member_id,
            correlation_id = %metadata.correlation_id(),
            "Reservation deleted"
        );

        Ok(())
    }
}
