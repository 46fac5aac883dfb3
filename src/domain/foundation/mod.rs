//! Foundation module - Shared domain primitives.
//!
//! Contains identifiers, errors, the state machine and ownership traits,
//! and caller identity types used across the reservation domain.

mod auth;
mod command;
mod errors;
mod ids;
mod ownership;
mod state_machine;

pub use auth::{
    AdminCapability, AdminGate, AuthError, AuthenticatedMember, MemberRole, RoleAdminGate,
};
#[cfg(test)]
pub(crate) use auth::test_admin_capability;
pub use command::CommandMetadata;
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{MemberId, ReservationId, ScheduleId, ThemeId, WaitingId};
pub use ownership::OwnedByMember;
pub use state_machine::StateMachine;
