//! Reservation aggregate.
//!
//! A member's claim on a schedule. Rows are created by the store (which
//! assigns the id) and afterwards only change status through the state
//! machine. Every mutation returns the status it left so the store can
//! compare-and-set against it.

use serde::{Deserialize, Serialize};

use super::ReservationStatus;
use crate::domain::foundation::{
    DomainError, ErrorCode, MemberId, OwnedByMember, ReservationId, ScheduleId, StateMachine,
};

/// Reservation of a schedule by a member.
///
/// # Invariants
///
/// - `status` only changes along `ReservationStatus` edges
/// - at most one slot-holding reservation exists per schedule (store-enforced)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    id: ReservationId,
    member_id: MemberId,
    schedule_id: ScheduleId,
    status: ReservationStatus,
}

impl Reservation {
    /// Reconstitute a reservation from persistence.
    pub fn reconstitute(
        id: ReservationId,
        member_id: MemberId,
        schedule_id: ScheduleId,
        status: ReservationStatus,
    ) -> Self {
        Self {
            id,
            member_id,
            schedule_id,
            status,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> ReservationId {
        self.id
    }

    pub fn member_id(&self) -> &MemberId {
        &self.member_id
    }

    pub fn schedule_id(&self) -> ScheduleId {
        self.schedule_id
    }

    pub fn status(&self) -> ReservationStatus {
        self.status
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Transitions
    // ─────────────────────────────────────────────────────────────────────────

    /// REQUESTED → APPROVED.
    pub fn approve(&mut self) -> Result<ReservationStatus, DomainError> {
        self.transition(ReservationStatus::Approved)
    }

    /// REQUESTED → REJECTED.
    pub fn reject(&mut self) -> Result<ReservationStatus, DomainError> {
        self.transition(ReservationStatus::Rejected)
    }

    /// APPROVED → CANCEL_REQUESTED, owner only.
    ///
    /// # Errors
    ///
    /// - `Forbidden` if `requester` does not own the reservation
    /// - `InvalidStateTransition` if not currently APPROVED
    pub fn request_cancel(
        &mut self,
        requester: &MemberId,
    ) -> Result<ReservationStatus, DomainError> {
        self.check_ownership(requester)?;
        self.transition(ReservationStatus::CancelRequested)
    }

    /// CANCEL_REQUESTED → CANCEL_APPROVED.
    pub fn approve_cancel(&mut self) -> Result<ReservationStatus, DomainError> {
        self.transition(ReservationStatus::CancelApproved)
    }

    /// Checks that `requester` may hard-delete this reservation.
    ///
    /// # Errors
    ///
    /// - `Forbidden` if `requester` does not own the reservation
    /// - `InvalidStateTransition` unless the reservation is still REQUESTED
    pub fn ensure_deletable_by(&self, requester: &MemberId) -> Result<(), DomainError> {
        self.check_ownership(requester)?;
        if self.status.is_deletable() {
            Ok(())
        } else {
            Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                format!("Cannot delete a {} reservation", self.status),
            )
            .with_detail("from", self.status.to_string()))
        }
    }

    fn transition(&mut self, target: ReservationStatus) -> Result<ReservationStatus, DomainError> {
        let next = self
            .status
            .transition_to(target)
            .map_err(|e| e.with_detail("reservation_id", self.id.to_string()))?;
        Ok(std::mem::replace(&mut self.status, next))
    }
}

impl OwnedByMember for Reservation {
    fn owner_id(&self) -> &MemberId {
        &self.member_id
    }
}
