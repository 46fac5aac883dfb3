//! Caller identity and admin capability types.
//!
//! Authentication happens upstream; this service receives an already trusted
//! member identifier and role. Admin-only transitions take an
//! [`AdminCapability`], which can only be obtained through an [`AdminGate`].
//! The engine never inspects roles itself.
//!
//! ```ignore
//! let capability = gate.admit(&member)?;
//! approve_handler.handle(cmd, capability, metadata).await?;
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::MemberId;

/// Role attached to a caller by the identity layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MemberRole {
    #[default]
    Member,
    Admin,
}

impl fmt::Display for MemberRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MemberRole::Member => "member",
            MemberRole::Admin => "admin",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for MemberRole {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "member" => Ok(MemberRole::Member),
            "admin" => Ok(MemberRole::Admin),
            other => Err(AuthError::UnknownRole(other.to_string())),
        }
    }
}

/// Caller identity as resolved by the trusted identity layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedMember {
    pub id: MemberId,
    pub role: MemberRole,
}

impl AuthenticatedMember {
    pub fn new(id: MemberId, role: MemberRole) -> Self {
        Self { id, role }
    }

    /// Shorthand for a caller with the plain member role.
    pub fn member(id: MemberId) -> Self {
        Self::new(id, MemberRole::Member)
    }
}

/// Identity and authorization errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// No member identity was supplied.
    #[error("Member identity missing")]
    MissingIdentity,

    /// The supplied identity could not be parsed.
    #[error("Invalid member identity: {0}")]
    InvalidIdentity(String),

    /// The supplied role is not recognised.
    #[error("Unknown member role: {0}")]
    UnknownRole(String),

    /// The member lacks the role required for this action.
    #[error("Insufficient permissions")]
    InsufficientPermissions,
}

/// Proof that the boundary layer admitted the caller to an admin operation.
///
/// Has no public constructor; only [`AdminGate::admit`] creates one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdminCapability {
    _sealed: (),
}

/// Boundary-side policy deciding who may run admin transitions.
pub trait AdminGate: Send + Sync {
    /// Returns true if the member may perform admin operations.
    fn is_admin(&self, member: &AuthenticatedMember) -> bool;

    /// Exchanges an admitted member for an [`AdminCapability`].
    ///
    /// # Errors
    ///
    /// - `InsufficientPermissions` if `is_admin` refuses the member
    fn admit(&self, member: &AuthenticatedMember) -> Result<AdminCapability, AuthError> {
        if self.is_admin(member) {
            Ok(AdminCapability { _sealed: () })
        } else {
            Err(AuthError::InsufficientPermissions)
        }
    }
}

/// Admits members whose role is [`MemberRole::Admin`].
#[derive(Debug, Clone, Copy, Default)]
pub struct RoleAdminGate;

impl AdminGate for RoleAdminGate {
    fn is_admin(&self, member: &AuthenticatedMember) -> bool {
        member.role == MemberRole::Admin
    }
}

#[cfg(test)]
pub(crate) fn test_admin_capability() -> AdminCapability {
    AdminCapability { _sealed: () }
}
