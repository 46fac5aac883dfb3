//! Waiting-list entry.

use serde::{Deserialize, Serialize};

use super::WaitPosition;
use crate::domain::foundation::{MemberId, OwnedByMember, ScheduleId, WaitingId};

/// A member queued for a schedule that is currently occupied.
///
/// `position` is derived by the store on every read and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationWaiting {
    id: WaitingId,
    member_id: MemberId,
    schedule_id: ScheduleId,
    position: WaitPosition,
}

impl ReservationWaiting {
    pub fn reconstitute(
        id: WaitingId,
        member_id: MemberId,
        schedule_id: ScheduleId,
        position: WaitPosition,
    ) -> Self {
        Self {
            id,
            member_id,
            schedule_id,
            position,
        }
    }

    pub fn id(&self) -> WaitingId {
        self.id
    }

    pub fn member_id(&self) -> &MemberId {
        &self.member_id
    }

    pub fn schedule_id(&self) -> ScheduleId {
        self.schedule_id
    }

    pub fn position(&self) -> WaitPosition {
        self.position
    }
}

impl OwnedByMember for ReservationWaiting {
    fn owner_id(&self) -> &MemberId {
        &self.member_id
    }
}
