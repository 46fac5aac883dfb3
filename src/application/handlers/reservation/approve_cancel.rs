//! ApproveCancelHandler - Admin command handler finalizing a cancellation.
//!
//! Approving a cancellation frees the schedule and hands it to the head of
//! its waiting list in the same unit of work.

use std::sync::Arc;

use tracing::info;

use crate::domain::foundation::{AdminCapability, CommandMetadata, ReservationId};
use crate::domain::reservation::{Reservation, ReservationError};
use crate::ports::{CancellationPromoter, Promotion, ReservationRepository};

/// Command to approve a CANCEL_REQUESTED reservation.
#[derive(Debug, Clone)]
pub struct ApproveCancelCommand {
    pub reservation_id: ReservationId,
}

/// Result carrying the CANCEL_APPROVED reservation and the promotion, if any.
#[derive(Debug, Clone)]
pub struct ApproveCancelResult {
    pub reservation: Reservation,
    pub promotion: Option<Promotion>,
}

/// Handler for CANCEL_REQUESTED → CANCEL_APPROVED plus waitlist promotion.
pub struct ApproveCancelHandler {
    repository: Arc<dyn ReservationRepository>,
    promoter: Arc<dyn CancellationPromoter>,
}

impl ApproveCancelHandler {
    pub fn new(
        repository: Arc<dyn ReservationRepository>,
        promoter: Arc<dyn CancellationPromoter>,
    ) -> Self {
        Self {
            repository,
            promoter,
        }
    }

    pub async fn handle(
        &self,
        cmd: ApproveCancelCommand,
        _admin: AdminCapability,
        metadata: CommandMetadata,
    ) -> Result<ApproveCancelResult, ReservationError> {
        // 1. Load
        let mut reservation = self
            .repository
            .find_by_id(cmd.reservation_id)
            .await?
            .ok_or(ReservationError::ReservationNotFound(cmd.reservation_id))?;

        // 2. Validate the transition before touching the store
        reservation.approve_cancel()?;
        let schedule_id = reservation.schedule_id();

        // 3. Status change and promotion commit together
        let promotion = self
            .promoter
            .approve_cancel_and_promote(reservation.id(), schedule_id)
            .await
            .map_err(|e| ReservationError::for_reservation(e, reservation.id(), schedule_id))?;

        let correlation_id = metadata.correlation_id();
        info!(
            reservation_id = %reservation.id(),
            schedule_id = %schedule_id,
            admin_id = %metadata.member_id,
            correlation_id = %correlation_id,
            "Cancellation approved"
        );
        if let Some(promotion) = &promotion {
            info!(
                waiting_id = %promotion.waiting_id,
                reservation_id = %promotion.reservation.id(),
                schedule_id = %schedule_id,
                member_id = %promotion.reservation.member_id(),
                correlation_id = %correlation_id,
                "Waiting entry promoted"
            );
        }

        Ok(ApproveCancelResult {
            reservation,
            promotion,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{member, metadata, Fixture};
    use super::*;
    use crate::domain::foundation::test_admin_capability;
    use crate::domain::reservation::ReservationStatus;
    use crate::ports::WaitingRepository;

    async fn approve_cancel(
        fx: &Fixture,
        id: ReservationId,
    ) -> Result<ApproveCancelResult, ReservationError> {
        ApproveCancelHandler::new(fx.store.clone(), fx.store.clone())
            .handle(
                ApproveCancelCommand { reservation_id: id },
                test_admin_capability(),
                metadata(&member("admin")),
            )
            .await
    }

    #[tokio::test]
    async fn promotes_head_of_waiting_list() {
        let fx = Fixture::new().await;
        let (m1, m2, m3) = (member("m-1"), member("m-2"), member("m-3"));
        let id = fx.reservation(&m1, ReservationStatus::CancelRequested).await;
        let head = fx.wait(&m2, fx.schedule.id).await;
        let next = fx.wait(&m3, fx.schedule.id).await;

        let result = approve_cancel(&fx, id).await.unwrap();

        assert_eq!(result.reservation.status(), ReservationStatus::CancelApproved);
        let promotion = result.promotion.unwrap();
        assert_eq!(promotion.waiting_id, head);
        assert_eq!(promotion.reservation.member_id(), &m2);
        assert_eq!(promotion.reservation.status(), ReservationStatus::Approved);

        let holder = fx.store.find_slot_holder(fx.schedule.id).await.unwrap().unwrap();
        assert_eq!(holder.member_id(), &m2);
        let new_head = WaitingRepository::find_by_id(fx.store.as_ref(), next)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(new_head.position().value(), 1);
    }

    #[tokio::test]
    async fn empty_queue_leaves_schedule_free() {
        let fx = Fixture::new().await;
        let id = fx
            .reservation(&member("m-1"), ReservationStatus::CancelRequested)
            .await;

        let result = approve_cancel(&fx, id).await.unwrap();

        assert!(result.promotion.is_none());
        assert_eq!(
            fx.store
                .count_with_status(fx.schedule.id, ReservationStatus::Approved)
                .await,
            0
        );
    }

    #[tokio::test]
    async fn approved_reservation_is_invalid_state_and_queue_untouched() {
        let fx = Fixture::new().await;
        let id = fx.reservation(&member("m-1"), ReservationStatus::Approved).await;
        fx.wait(&member("m-2"), fx.schedule.id).await;

        let err = approve_cancel(&fx, id).await.unwrap_err();

        assert!(matches!(err, ReservationError::InvalidState(_)));
        assert_eq!(fx.store.queue_len(fx.schedule.id).await, 1);
    }

    #[tokio::test]
    async fn missing_reservation_is_not_found() {
        let fx = Fixture::new().await;
        let err = approve_cancel(&fx, ReservationId::new(8)).await.unwrap_err();
        assert_eq!(err, ReservationError::ReservationNotFound(ReservationId::new(8)));
    }
}
