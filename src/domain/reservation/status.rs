//! Reservation status state machine.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{DomainError, ErrorCode, StateMachine};

/// Lifecycle status of a reservation.
///
/// ```text
/// Requested --approve--> Approved
/// Requested --reject--> Rejected*
/// Approved --request-cancel--> CancelRequested
/// CancelRequested --approve-cancel--> CancelApproved*
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReservationStatus {
    /// Awaiting admin approval. Does not occupy the schedule.
    Requested,

    /// Confirmed; occupies the schedule.
    Approved,

    /// Member asked to cancel; still occupies the schedule until approved.
    CancelRequested,

    /// Cancellation approved. Kept as history.
    CancelApproved,

    /// Refused by an admin.
    Rejected,
}

impl ReservationStatus {
    /// Returns true while the reservation occupies its schedule.
    ///
    /// At most one slot-holding reservation may exist per schedule.
    pub fn holds_slot(&self) -> bool {
        matches!(
            self,
            ReservationStatus::Approved | ReservationStatus::CancelRequested
        )
    }

    /// Returns true if the row may be physically deleted.
    pub fn is_deletable(&self) -> bool {
        matches!(self, ReservationStatus::Requested)
    }

    /// Storage representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            ReservationStatus::Requested => "requested",
            ReservationStatus::Approved => "approved",
            ReservationStatus::CancelRequested => "cancel_requested",
            ReservationStatus::CancelApproved => "cancel_approved",
            ReservationStatus::Rejected => "rejected",
        }
    }

    /// Parses the storage representation.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` for unknown values
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s {
            "requested" => Ok(ReservationStatus::Requested),
            "approved" => Ok(ReservationStatus::Approved),
            "cancel_requested" => Ok(ReservationStatus::CancelRequested),
            "cancel_approved" => Ok(ReservationStatus::CancelApproved),
            "rejected" => Ok(ReservationStatus::Rejected),
            _ => Err(DomainError::new(
                ErrorCode::DatabaseError,
                format!("Invalid reservation status: {}", s),
            )),
        }
    }
}

impl StateMachine for ReservationStatus {
    fn valid_transitions(&self) -> Vec<Self> {
        use ReservationStatus::*;
        match self {
            Requested => vec![Approved, Rejected],
            Approved => vec![CancelRequested],
            CancelRequested => vec![CancelApproved],
            CancelApproved => vec![],
            Rejected => vec![],
        }
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ReservationStatus::Requested => "REQUESTED",
            ReservationStatus::Approved => "APPROVED",
            ReservationStatus::CancelRequested => "CANCEL_REQUESTED",
            ReservationStatus::CancelApproved => "CANCEL_APPROVED",
            ReservationStatus::Rejected => "REJECTED",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ReservationStatus::*;

    const ALL: [ReservationStatus; 5] =
        [Requested, Approved, CancelRequested, CancelApproved, Rejected];

    #[test]
    fn requested_can_be_approved_or_rejected() {
        assert!(Requested.can_transition_to(&Approved));
        assert!(Requested.can_transition_to(&Rejected));
        assert!(!Requested.can_transition_to(&CancelRequested));
    }

    #[test]
    fn approved_can_only_request_cancel() {
        assert_eq!(Approved.valid_transitions(), vec![CancelRequested]);
    }

    #[test]
    fn cancel_requested_can_only_be_approved() {
        assert_eq!(CancelRequested.valid_transitions(), vec![CancelApproved]);
    }

    #[test]
    fn terminal_states() {
        assert!(CancelApproved.is_terminal());
        assert!(Rejected.is_terminal());
        assert!(!Requested.is_terminal());
        assert!(!Approved.is_terminal());
        assert!(!CancelRequested.is_terminal());
    }

    #[test]
    fn no_state_transitions_to_itself() {
        for status in ALL {
            assert!(status.transition_to(status).is_err(), "{} -> {}", status, status);
        }
    }

    #[test]
    fn only_approved_and_cancel_requested_hold_the_slot() {
        let holders: Vec<_> = ALL.into_iter().filter(|s| s.holds_slot()).collect();
        assert_eq!(holders, vec![Approved, CancelRequested]);
    }

    #[test]
    fn only_requested_is_deletable() {
        let deletable: Vec<_> = ALL.into_iter().filter(|s| s.is_deletable()).collect();
        assert_eq!(deletable, vec![Requested]);
    }

    #[test]
    fn storage_representation_parses_back() {
        for status in ALL {
            assert_eq!(ReservationStatus::parse(status.as_str()).unwrap(), status);
        }
        assert!(ReservationStatus::parse("pending").is_err());
    }

    #[test]
    fn serializes_to_snake_case_json() {
        assert_eq!(
            serde_json::to_string(&CancelRequested).unwrap(),
            "\"cancel_requested\""
        );
    }
}
