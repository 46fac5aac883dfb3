//! DeleteWaitingHandler - Command handler for leaving a waiting list.

use std::sync::Arc;

use tracing::info;

use crate::domain::foundation::{CommandMetadata, ErrorCode, MemberId, OwnedByMember, WaitingId};
use crate::domain::reservation::ReservationError;
use crate::ports::WaitingRepository;

/// Command to remove a waiting entry.
#[derive(Debug, Clone)]
pub struct DeleteWaitingCommand {
    pub waiting_id: WaitingId,
    pub member_id: MemberId,
}

/// Handler for deleting waiting entries.
pub struct DeleteWaitingHandler {
    repository: Arc<dyn WaitingRepository>,
}

impl DeleteWaitingHandler {
    pub fn new(repository: Arc<dyn WaitingRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(
        &self,
        cmd: DeleteWaitingCommand,
        metadata: CommandMetadata,
    ) -> Result<(), ReservationError> {
        let waiting = self
            .repository
            .find_by_id(cmd.waiting_id)
            .await?
            .ok_or(ReservationError::WaitingNotFound(cmd.waiting_id))?;

        waiting.check_ownership(&cmd.member_id)?;

        // A concurrent promotion may have removed the entry since the read
        self.repository
            .delete_by_id(cmd.waiting_id)
            .await
            .map_err(|e| match e.code {
                ErrorCode::WaitingNotFound => {
                    ReservationError::WaitingNotFound(cmd.waiting_id)
                }
                _ => e.into(),
            })?;

        info!(
            waiting_id = %cmd.waiting_id,
            schedule_id = %waiting.schedule_id(),
            member_id = %cmd.member_id,
            correlation_id = %metadata.correlation_id(),
            "Waiting entry deleted"
        );

        Ok(())
    }
}
