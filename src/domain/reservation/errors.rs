//! Reservation-specific error types.

use thiserror::Error;

use crate::domain::foundation::{
    DomainError, ErrorCode, ReservationId, ScheduleId, ValidationError, WaitingId,
};

/// Errors surfaced by the reservation lifecycle handlers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReservationError {
    #[error("Reservation not found: {0}")]
    ReservationNotFound(ReservationId),

    #[error("Waiting entry not found: {0}")]
    WaitingNotFound(WaitingId),

    #[error("Schedule not found: {0}")]
    ScheduleNotFound(ScheduleId),

    #[error("Permission denied")]
    Forbidden,

    /// The schedule already has a slot-holding reservation.
    #[error("Schedule {0} is already reserved")]
    SlotTaken(ScheduleId),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// A concurrent write changed the row underneath this operation.
    #[error("Concurrent modification: {0}")]
    Conflict(String),

    #[error("Validation failed for '{field}': {message}")]
    ValidationFailed { field: String, message: String },

    #[error("Error: {0}")]
    Infrastructure(String),
}

impl ReservationError {
    pub fn invalid_state(message: impl Into<String>) -> Self {
        ReservationError::InvalidState(message.into())
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        ReservationError::Infrastructure(message.into())
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            ReservationError::ReservationNotFound(_) => ErrorCode::ReservationNotFound,
            ReservationError::WaitingNotFound(_) => ErrorCode::WaitingNotFound,
            ReservationError::ScheduleNotFound(_) => ErrorCode::ScheduleNotFound,
            ReservationError::Forbidden => ErrorCode::Forbidden,
            ReservationError::SlotTaken(_) => ErrorCode::SlotConflict,
            ReservationError::InvalidState(_) => ErrorCode::InvalidStateTransition,
            ReservationError::Conflict(_) => ErrorCode::ConcurrencyConflict,
            ReservationError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            ReservationError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }

    /// Maps a store-level slot conflict onto the schedule it concerns.
    ///
    /// Other errors convert as usual.
    pub fn from_store(err: DomainError, schedule_id: ScheduleId) -> Self {
        match err.code {
            ErrorCode::SlotConflict => ReservationError::SlotTaken(schedule_id),
            _ => err.into(),
        }
    }

    /// Maps a store error raised while writing an existing reservation.
    pub fn for_reservation(err: DomainError, id: ReservationId, schedule_id: ScheduleId) -> Self {
        match err.code {
            ErrorCode::ReservationNotFound => ReservationError::ReservationNotFound(id),
            _ => Self::from_store(err, schedule_id),
        }
    }
}

impl From<DomainError> for ReservationError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::Forbidden => ReservationError::Forbidden,
            ErrorCode::InvalidStateTransition => ReservationError::InvalidState(err.message),
            ErrorCode::ConcurrencyConflict => ReservationError::Conflict(err.message),
            ErrorCode::ValidationFailed => ReservationError::ValidationFailed {
                field: err
                    .details
                    .get("field")
                    .cloned()
                    .unwrap_or_else(|| "unknown".to_string()),
                message: err.message,
            },
            ErrorCode::SlotConflict => ReservationError::Conflict(err.message),
            _ => ReservationError::Infrastructure(err.to_string()),
        }
    }
}

impl From<ValidationError> for ReservationError {
    fn from(err: ValidationError) -> Self {
        ReservationError::ValidationFailed {
            field: err.field().to_string(),
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forbidden_domain_error_maps_to_forbidden() {
        let err = DomainError::new(ErrorCode::Forbidden, "nope");
        assert_eq!(ReservationError::from(err), ReservationError::Forbidden);
    }

    #[test]
    fn state_error_keeps_message() {
        let err = DomainError::new(ErrorCode::InvalidStateTransition, "Cannot transition");
        assert_eq!(
            ReservationError::from(err),
            ReservationError::InvalidState("Cannot transition".to_string())
        );
    }

    #[test]
    fn slot_conflict_from_store_becomes_slot_taken() {
        let err = DomainError::new(ErrorCode::SlotConflict, "duplicate key");
        assert_eq!(
            ReservationError::from_store(err, ScheduleId::new(4)),
            ReservationError::SlotTaken(ScheduleId::new(4))
        );
    }

    #[test]
    fn vanished_row_keeps_reservation_id() {
        let err = DomainError::new(ErrorCode::ReservationNotFound, "gone");
        assert_eq!(
            ReservationError::for_reservation(err, ReservationId::new(3), ScheduleId::new(4)),
            ReservationError::ReservationNotFound(ReservationId::new(3))
        );
    }

    #[test]
    fn stale_update_becomes_conflict() {
        let err = DomainError::new(ErrorCode::ConcurrencyConflict, "status changed");
        assert!(matches!(
            ReservationError::from_store(err, ScheduleId::new(4)),
            ReservationError::Conflict(_)
        ));
    }

    #[test]
    fn database_error_becomes_infrastructure() {
        let err = DomainError::new(ErrorCode::DatabaseError, "connection reset");
        assert!(matches!(
            ReservationError::from(err),
            ReservationError::Infrastructure(msg) if msg.contains("connection reset")
        ));
    }

    #[test]
    fn validation_error_carries_field() {
        let err: ReservationError = ValidationError::mismatch("theme_id", 1, 2).into();
        assert!(matches!(
            err,
            ReservationError::ValidationFailed { ref field, .. } if field == "theme_id"
        ));
    }

    #[test]
    fn codes_match_variants() {
        assert_eq!(
            ReservationError::SlotTaken(ScheduleId::new(1)).code(),
            ErrorCode::SlotConflict
        );
        assert_eq!(ReservationError::Forbidden.code(), ErrorCode::Forbidden);
    }
}
