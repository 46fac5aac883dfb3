//! RejectReservationHandler - Admin command handler refusing a pending reservation.

use std::sync::Arc;

use tracing::info;

use crate::domain::foundation::{AdminCapability, CommandMetadata, ReservationId};
use crate::domain::reservation::{Reservation, ReservationError};
use crate::ports::ReservationRepository;

/// Command to reject a REQUESTED reservation.
#[derive(Debug, Clone)]
pub struct RejectReservationCommand {
    pub reservation_id: ReservationId,
}

/// Result carrying the REJECTED reservation.
#[derive(Debug, Clone)]
pub struct RejectReservationResult {
    pub reservation: Reservation,
}

/// Handler for REQUESTED → REJECTED.
pub struct RejectReservationHandler {
    repository: Arc<dyn ReservationRepository>,
}

impl RejectReservationHandler {
    pub fn new(repository: Arc<dyn ReservationRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(
        &self,
        cmd: RejectReservationCommand,
        _admin: AdminCapability,
        metadata: CommandMetadata,
    ) -> Result<RejectReservationResult, ReservationError> {
        let mut reservation = self
            .repository
            .find_by_id(cmd.reservation_id)
            .await?
            .ok_or(ReservationError::ReservationNotFound(cmd.reservation_id))?;

        let previous = reservation.reject()?;

        self.repository
            .update_status(reservation.id(), previous, reservation.status())
            .await
            .map_err(|e| {
                ReservationError::for_reservation(e, reservation.id(), reservation.schedule_id())
            })?;

        info!(
            reservation_id = %reservation.id(),
            schedule_id = %reservation.schedule_id(),
            admin_id = %metadata.member_id,
            correlation_id = %metadata.correlation_id(),
            "Reservation rejected"
        );

        Ok(RejectReservationResult { reservation })
    }
}
