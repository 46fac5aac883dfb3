//! Strongly-typed identifier value objects.
//!
//! Row identifiers are assigned by the store from a monotonic sequence, so
//! comparing two ids of the same kind also compares their insertion order.
//! The waiting-list position calculation relies on this.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use super::ValidationError;

/// Declares a sequence-backed identifier newtype.
macro_rules! sequence_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wraps a raw sequence value.
            pub const fn new(value: i64) -> Self {
                Self(value)
            }

            /// Returns the raw sequence value.
            pub const fn value(&self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(s.parse()?))
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }
    };
}

sequence_id!(
    /// Identifier of a reservation row.
    ReservationId
);

sequence_id!(
    /// Identifier of a waiting-list entry. Doubles as its insertion marker.
    WaitingId
);

sequence_id!(
    /// Identifier of a bookable schedule slot.
    ScheduleId
);

sequence_id!(
    /// Identifier of a theme.
    ThemeId
);

/// Member identifier, supplied by the trusted identity layer.
///
/// Opaque to this service: only compared for equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MemberId(String);

impl MemberId {
    /// Creates a new MemberId, returning error if empty.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ValidationError::empty_field("member_id"));
        }
        Ok(Self(id))
    }

    /// Returns the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
