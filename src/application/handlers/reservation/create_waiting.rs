//! CreateWaitingHandler - Command handler for joining a schedule's waiting list.

use std::sync::Arc;

use tracing::info;

use crate::domain::foundation::{CommandMetadata, MemberId, ScheduleId};
use crate::domain::reservation::{ReservationError, ReservationWaiting};
use crate::ports::{CatalogReader, WaitingRepository};

/// Command to queue for a schedule.
#[derive(Debug, Clone)]
pub struct CreateWaitingCommand {
    pub member_id: MemberId,
    pub schedule_id: ScheduleId,
}

/// Result of queueing, with the entry's current position.
#[derive(Debug, Clone)]
pub struct CreateWaitingResult {
    pub waiting: ReservationWaiting,
}

/// Handler for creating waiting-list entries.
///
/// Does not check whether the slot is free; callers queue when they choose to.
pub struct CreateWaitingHandler {
    catalog: Arc<dyn CatalogReader>,
    repository: Arc<dyn WaitingRepository>,
}

impl CreateWaitingHandler {
    pub fn new(catalog: Arc<dyn CatalogReader>, repository: Arc<dyn WaitingRepository>) -> Self {
        Self {
            catalog,
            repository,
        }
    }

    pub async fn handle(
        &self,
        cmd: CreateWaitingCommand,
        metadata: CommandMetadata,
    ) -> Result<CreateWaitingResult, ReservationError> {
        // 1. Schedule must exist
        self.catalog
            .find_schedule(cmd.schedule_id)
            .await?
            .ok_or(ReservationError::ScheduleNotFound(cmd.schedule_id))?;

        // 2. Append to the tail (or get the member's existing entry)
        let id = self.repository.save(&cmd.member_id, cmd.schedule_id).await?;

        // 3. Re-read for the computed position
        let waiting = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(ReservationError::WaitingNotFound(id))?;

        info!(
            waiting_id = %id,
            schedule_id = %cmd.schedule_id,
            member_id = %cmd.member_id,
            position = %waiting.position(),
            correlation_id = %metadata.correlation_id(),
            "Waiting entry created"
        );

        Ok(CreateWaitingResult { waiting })
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{member, metadata, Fixture};
    use super::*;

    fn handler(fx: &Fixture) -> CreateWaitingHandler {
        CreateWaitingHandler::new(Arc::new(fx.catalog.clone()), fx.store.clone())
    }

    async fn queue(fx: &Fixture, who: &str) -> ReservationWaiting {
        let m = member(who);
        handler(fx)
            .handle(
                CreateWaitingCommand {
                    member_id: m.clone(),
                    schedule_id: fx.schedule.id,
                },
                metadata(&m),
            )
            .await
            .unwrap()
            .waiting
    }

    #[tokio::test]
    async fn lone_entry_is_at_position_one() {
        let fx = Fixture::new().await;
        let waiting = queue(&fx, "m-2").await;
        assert_eq!(waiting.position().value(), 1);
        assert_eq!(waiting.schedule_id(), fx.schedule.id);
    }

    #[tokio::test]
    async fn entries_are_numbered_in_arrival_order() {
        let fx = Fixture::new().await;
        let a = queue(&fx, "a").await;
        let b = queue(&fx, "b").await;
        let c = queue(&fx, "c").await;

        assert_eq!(
            [a.position().value(), b.position().value(), c.position().value()],
            [1, 2, 3]
        );
    }

    #[tokio::test]
    async fn queueing_twice_returns_the_existing_entry() {
        let fx = Fixture::new().await;
        let first = queue(&fx, "a").await;
        queue(&fx, "b").await;
        let again = queue(&fx, "a").await;

        assert_eq!(first.id(), again.id());
        assert_eq!(again.position().value(), 1);
        assert_eq!(fx.store.queue_len(fx.schedule.id).await, 2);
    }

    #[tokio::test]
    async fn unknown_schedule_is_not_found() {
        let fx = Fixture::new().await;
        let m = member("a");
        let err = handler(&fx)
            .handle(
                CreateWaitingCommand {
                    member_id: m.clone(),
                    schedule_id: ScheduleId::new(404),
                },
                metadata(&m),
            )
            .await
            .unwrap_err();

        assert_eq!(err, ReservationError::ScheduleNotFound(ScheduleId::new(404)));
    }
}
