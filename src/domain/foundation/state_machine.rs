//! State machine trait for status enums.
//!
//! Status enums list their outgoing edges once; validated transitions and
//! terminal checks are derived from that list.

use std::fmt;

use super::{DomainError, ErrorCode};

/// Trait for status enums that represent state machines.
///
/// # Example
///
/// ```ignore
/// impl StateMachine for ReservationStatus {
///     fn valid_transitions(&self) -> Vec<Self> {
///         match self {
///             Requested => vec![Approved, Rejected],
///             Approved => vec![CancelRequested],
///             // ... etc
///         }
///     }
/// }
///
/// let next = current.transition_to(ReservationStatus::Approved)?;
/// ```
pub trait StateMachine: Sized + Copy + PartialEq + fmt::Debug + fmt::Display {
    /// Returns all valid target states from current state.
    fn valid_transitions(&self) -> Vec<Self>;

    /// Returns true if transition from self to target is valid.
    fn can_transition_to(&self, target: &Self) -> bool {
        self.valid_transitions().contains(target)
    }

    /// Performs transition with validation.
    ///
    /// # Errors
    ///
    /// - `InvalidStateTransition` if `target` is not an outgoing edge of `self`
    fn transition_to(&self, target: Self) -> Result<Self, DomainError> {
        if self.can_transition_to(&target) {
            Ok(target)
        } else {
            Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                format!("Cannot transition from {} to {}", self, target),
            )
            .with_detail("from", self.to_string())
            .with_detail("to", target.to_string()))
        }
    }

    /// Checks if current state is terminal (no valid outgoing transitions).
    fn is_terminal(&self) -> bool {
        self.valid_transitions().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Door {
        Closed,
        Open,
        Locked,
    }

    impl fmt::Display for Door {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{:?}", self)
        }
    }

    impl StateMachine for Door {
        fn valid_transitions(&self) -> Vec<Self> {
            match self {
                Door::Closed => vec![Door::Open, Door::Locked],
                Door::Open => vec![Door::Closed],
                Door::Locked => vec![],
            }
        }
    }

    #[test]
    fn transition_to_succeeds_for_listed_edge() {
        assert_eq!(Door::Closed.transition_to(Door::Locked).unwrap(), Door::Locked);
    }

    #[test]
    fn transition_to_fails_for_missing_edge() {
        let err = Door::Open.transition_to(Door::Locked).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidStateTransition);
        assert_eq!(err.details.get("from"), Some(&"Open".to_string()));
        assert_eq!(err.details.get("to"), Some(&"Locked".to_string()));
    }

    #[test]
    fn self_loops_are_rejected_unless_listed() {
        assert!(Door::Closed.transition_to(Door::Closed).is_err());
    }

    #[test]
    fn is_terminal_only_for_states_without_edges() {
        assert!(Door::Locked.is_terminal());
        assert!(!Door::Closed.is_terminal());
    }
}
