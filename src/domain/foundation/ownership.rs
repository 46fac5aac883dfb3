//! Ownership trait for member-owned resources.
//!
//! Reservations and waiting entries both belong to exactly one member.
//! Member-scoped mutations call `check_ownership` before touching them.
//!
//! ```ignore
//! reservation.check_ownership(&requester)?;  // Err(Forbidden) if not owner
//! ```

use super::{DomainError, ErrorCode, MemberId};

/// Trait for resources that have a single owning member.
pub trait OwnedByMember {
    /// Returns the ID of the member who owns this resource.
    fn owner_id(&self) -> &MemberId;

    /// Returns `true` if `member_id` matches `owner_id()`.
    fn is_owner(&self, member_id: &MemberId) -> bool {
        self.owner_id() == member_id
    }

    /// Validates ownership, returning a `Forbidden` error if the member is not the owner.
    fn check_ownership(&self, member_id: &MemberId) -> Result<(), DomainError> {
        if self.is_owner(member_id) {
            Ok(())
        } else {
            Err(DomainError::new(
                ErrorCode::Forbidden,
                "Member does not own this resource",
            )
            .with_detail("owner_id", self.owner_id().to_string())
            .with_detail("requested_by", member_id.to_string()))
        }
    }
}
