//! ApproveReservationHandler - Admin command handler confirming a pending reservation.

use std::sync::Arc;

use tracing::info;

use crate::domain::foundation::{AdminCapability, CommandMetadata, ReservationId};
use crate::domain::reservation::{Reservation, ReservationError};
use crate::ports::ReservationRepository;

/// Command to approve a REQUESTED reservation.
#[derive(Debug, Clone)]
pub struct ApproveReservationCommand {
    pub reservation_id: ReservationId,
}

/// Result carrying the APPROVED reservation.
#[derive(Debug, Clone)]
pub struct ApproveReservationResult {
    pub reservation: Reservation,
}

/// Handler for REQUESTED → APPROVED.
pub struct ApproveReservationHandler {
    repository: Arc<dyn ReservationRepository>,
}

impl ApproveReservationHandler {
    pub fn new(repository: Arc<dyn ReservationRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(
        &self,
        cmd: ApproveReservationCommand,
        _admin: AdminCapability,
        metadata: CommandMetadata,
    ) -> Result<ApproveReservationResult, ReservationError> {
        // 1. Load
        let mut reservation = self
            .repository
            .find_by_id(cmd.reservation_id)
            .await?
            .ok_or(ReservationError::ReservationNotFound(cmd.reservation_id))?;

        // 2. Transition
        let previous = reservation.approve()?;

        // 3. The schedule must not already be occupied
        let schedule_id = reservation.schedule_id();
        if self.repository.find_slot_holder(schedule_id).await?.is_some() {
            return Err(ReservationError::SlotTaken(schedule_id));
        }

        // 4. Compare-and-set persist; the store arbitrates racing approvals
        self.repository
            .update_status(reservation.id(), previous, reservation.status())
            .await
            .map_err(|e| ReservationError::for_reservation(e, reservation.id(), schedule_id))?;

        info!(
            reservation_id = %reservation.id(),
            schedule_id = %schedule_id,
            admin_id = %metadata.member_id,
            correlation_id = %metadata.correlation_id(),
            "Reservation approved"
        );

        Ok(ApproveReservationResult { reservation })
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{member, metadata, Fixture};
    use super::*;
    use crate::domain::foundation::test_admin_capability;
    use crate::domain::reservation::ReservationStatus;

    async fn approve(
        fx: &Fixture,
        id: ReservationId,
    ) -> Result<ApproveReservationResult, ReservationError> {
        ApproveReservationHandler::new(fx.store.clone())
            .handle(
                ApproveReservationCommand { reservation_id: id },
                test_admin_capability(),
                metadata(&member("admin")),
            )
            .await
    }

    async fn status_of(fx: &Fixture, id: ReservationId) -> ReservationStatus {
        ReservationRepository::find_by_id(fx.store.as_ref(), id)
            .await
            .unwrap()
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn approves_requested_reservation() {
        let fx = Fixture::new().await;
        let id = fx.reservation(&member("m-1"), ReservationStatus::Requested).await;

        let result = approve(&fx, id).await.unwrap();

        assert_eq!(result.reservation.status(), ReservationStatus::Approved);
        assert_eq!(status_of(&fx, id).await, ReservationStatus::Approved);
    }

    #[tokio::test]
    async fn non_requested_fails_and_status_is_unchanged() {
        let fx = Fixture::new().await;
        let id = fx.reservation(&member("m-1"), ReservationStatus::Approved).await;

        let err = approve(&fx, id).await.unwrap_err();

        assert!(matches!(err, ReservationError::InvalidState(_)));
        assert_eq!(status_of(&fx, id).await, ReservationStatus::Approved);
    }

    #[tokio::test]
    async fn occupied_schedule_fails_with_slot_taken() {
        let fx = Fixture::new().await;
        fx.reservation(&member("m-1"), ReservationStatus::Approved).await;
        let pending = fx.reservation(&member("m-2"), ReservationStatus::Requested).await;

        let err = approve(&fx, pending).await.unwrap_err();

        assert_eq!(err, ReservationError::SlotTaken(fx.schedule.id));
        assert_eq!(status_of(&fx, pending).await, ReservationStatus::Requested);
        assert_eq!(
            fx.store
                .count_with_status(fx.schedule.id, ReservationStatus::Approved)
                .await,
            1
        );
    }

    #[tokio::test]
    async fn missing_reservation_is_not_found() {
        let fx = Fixture::new().await;
        let err = approve(&fx, ReservationId::new(5)).await.unwrap_err();
        assert_eq!(err, ReservationError::ReservationNotFound(ReservationId::new(5)));
    }
}
