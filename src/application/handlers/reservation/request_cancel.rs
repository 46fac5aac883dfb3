//! RequestCancelHandler - Command handler for asking to cancel a confirmed reservation.

use std::sync::Arc;

use tracing::info;

use crate::domain::foundation::{CommandMetadata, MemberId, ReservationId};
use crate::domain::reservation::{Reservation, ReservationError};
use crate::ports::ReservationRepository;

/// Command to request cancellation.
#[derive(Debug, Clone)]
pub struct RequestCancelCommand {
    pub reservation_id: ReservationId,
    pub member_id: MemberId,
}

/// Result carrying the CANCEL_REQUESTED reservation.
#[derive(Debug, Clone)]
pub struct RequestCancelResult {
    pub reservation: Reservation,
}

/// Handler for APPROVED → CANCEL_REQUESTED.
///
/// The reservation keeps its slot until an admin approves the cancellation.
pub struct RequestCancelHandler {
    repository: Arc<dyn ReservationRepository>,
}

impl RequestCancelHandler {
    pub fn new(repository: Arc<dyn ReservationRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(
        &self,
        cmd: RequestCancelCommand,
        metadata: CommandMetadata,
    ) -> Result<RequestCancelResult, ReservationError> {
        // 1. Load
        let mut reservation = self
            .repository
            .find_by_id(cmd.reservation_id)
            .await?
            .ok_or(ReservationError::ReservationNotFound(cmd.reservation_id))?;

        // 2. Owner check and transition
        let previous = reservation.request_cancel(&cmd.member_id)?;

        // 3. Compare-and-set persist
        self.repository
            .update_status(reservation.id(), previous, reservation.status())
            .await
            .map_err(|e| {
                ReservationError::for_reservation(e, reservation.id(), reservation.schedule_id())
            })?;

        info!(
            reservation_id = %reservation.id(),
            schedule_id = %reservation.schedule_id(),
            member_id = %cmd.member_id,
            correlation_id = %metadata.correlation_id(),
            "Cancellation requested"
        );

        Ok(RequestCancelResult { reservation })
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{member, metadata, Fixture};
    use super::*;
    use crate::domain::reservation::ReservationStatus;

    fn handler(fx: &Fixture) -> RequestCancelHandler {
        RequestCancelHandler::new(fx.store.clone())
    }

    #[tokio::test]
    async fn owner_moves_approved_to_cancel_requested() {
        let fx = Fixture::new().await;
        let m1 = member("m-1");
        let id = fx.reservation(&m1, ReservationStatus::Approved).await;

        let result = handler(&fx)
            .handle(
                RequestCancelCommand {
                    reservation_id: id,
                    member_id: m1.clone(),
                },
                metadata(&m1),
            )
            .await
            .unwrap();

        assert_eq!(result.reservation.status(), ReservationStatus::CancelRequested);
        // still occupies the slot
        let holder = fx.store.find_slot_holder(fx.schedule.id).await.unwrap();
        assert_eq!(holder.map(|r| r.id()), Some(id));
    }

    #[tokio::test]
    async fn non_owner_is_forbidden() {
        let fx = Fixture::new().await;
        let (m1, m2) = (member("m-1"), member("m-2"));
        let id = fx.reservation(&m1, ReservationStatus::Approved).await;

        let err = handler(&fx)
            .handle(
                RequestCancelCommand {
                    reservation_id: id,
                    member_id: m2.clone(),
                },
                metadata(&m2),
            )
            .await
            .unwrap_err();

        assert_eq!(err, ReservationError::Forbidden);
    }

    #[tokio::test]
    async fn requested_reservation_cannot_request_cancel() {
        let fx = Fixture::new().await;
        let m1 = member("m-1");
        let id = fx.reservation(&m1, ReservationStatus::Requested).await;

        let err = handler(&fx)
            .handle(
                RequestCancelCommand {
                    reservation_id: id,
                    member_id: m1.clone(),
                },
                metadata(&m1),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, ReservationError::InvalidState(_)));
        let stored = ReservationRepository::find_by_id(fx.store.as_ref(), id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.status(), ReservationStatus::Requested);
    }
}
