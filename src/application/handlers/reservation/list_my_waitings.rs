//! ListMyWaitingsHandler - Query handler for the caller's waiting entries.

use std::sync::Arc;

use tracing::warn;

use crate::domain::foundation::MemberId;
use crate::domain::reservation::ReservationWaiting;
use crate::ports::WaitingRepository;

/// Query for a member's waiting entries.
#[derive(Debug, Clone)]
pub struct ListMyWaitingsQuery {
    pub member_id: MemberId,
}

/// Handler for listing a member's waiting entries with positions.
///
/// Lenient: a store failure yields an empty list rather than an error.
pub struct ListMyWaitingsHandler {
    repository: Arc<dyn WaitingRepository>,
}

impl ListMyWaitingsHandler {
    pub fn new(repository: Arc<dyn WaitingRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, query: ListMyWaitingsQuery) -> Vec<ReservationWaiting> {
        match self.repository.find_by_member(&query.member_id).await {
            Ok(entries) => entries,
            Err(err) => {
                warn!(
                    member_id = %query.member_id,
                    error = %err,
                    "Failed to load waiting entries, returning none"
                );
                Vec::new()
            }
        }
    }
}
