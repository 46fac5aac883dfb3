//! CreateReservationHandler - Command handler for booking a schedule.

use std::sync::Arc;

use tracing::info;

use crate::domain::foundation::{CommandMetadata, MemberId, ScheduleId, ThemeId};
use crate::domain::reservation::{Reservation, ReservationError, ReservationStatus};
use crate::ports::{CatalogReader, ReservationRepository};

/// Command to reserve a schedule.
#[derive(Debug, Clone)]
pub struct CreateReservationCommand {
    pub member_id: MemberId,
    pub schedule_id: ScheduleId,
    pub theme_id: ThemeId,
}

/// Result of a successful booking.
#[derive(Debug, Clone)]
pub struct CreateReservationResult {
    pub reservation: Reservation,
}

/// Handler for creating reservations.
pub struct CreateReservationHandler {
    catalog: Arc<dyn CatalogReader>,
    repository: Arc<dyn ReservationRepository>,
    initial_status: ReservationStatus,
}

impl CreateReservationHandler {
    pub fn new(
        catalog: Arc<dyn CatalogReader>,
        repository: Arc<dyn ReservationRepository>,
        initial_status: ReservationStatus,
    ) -> Self {
        Self {
            catalog,
            repository,
            initial_status,
        }
    }

    pub async fn handle(
        &self,
        cmd: CreateReservationCommand,
        metadata: CommandMetadata,
    ) -> Result<CreateReservationResult, ReservationError> {
        // 1. Resolve the schedule and check it belongs to the theme
        let schedule = self
            .catalog
            .find_schedule(cmd.schedule_id)
            .await?
            .ok_or(ReservationError::ScheduleNotFound(cmd.schedule_id))?;
        schedule.ensure_theme(cmd.theme_id)?;

        // 2. Fail fast when the slot is visibly taken
        if self.repository.find_slot_holder(schedule.id).await?.is_some() {
            return Err(ReservationError::SlotTaken(schedule.id));
        }

        // 3. Persist; the store arbitrates racing creates
        let id = self
            .repository
            .save(&cmd.member_id, schedule.id, self.initial_status)
            .await
            .map_err(|e| ReservationError::from_store(e, schedule.id))?;

        info!(
            reservation_id = %id,
            schedule_id = %schedule.id,
            member_id = %cmd.member_id,
            status = %self.initial_status,
            correlation_id = %metadata.correlation_id(),
            "Reservation created"
        );

        Ok(CreateReservationResult {
            reservation: Reservation::reconstitute(
                id,
                cmd.member_id,
                schedule.id,
                self.initial_status,
            ),
        })
    }
}
