//! Waiting-list position calculation.
//!
//! Positions are never stored. A waiting entry's position is the number of
//! entries on the same schedule whose insertion marker (its id) is less than
//! or equal to its own, so the entry itself counts and the head is 1.
//! Deleting an earlier entry therefore shifts every later entry down by one
//! without touching their rows.
//!
//! The count is capped at a scan window. Entries deeper than the window
//! report the window size; exactness only matters near the head, where
//! promotion happens.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::WaitingId;

/// Default number of queue entries scanned when computing a position.
pub const DEFAULT_POSITION_WINDOW: u32 = 100;

/// 1-indexed rank of a waiting entry in its schedule's queue.
///
/// `0` means unknown: the entry was not found or the queue is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct WaitPosition(u32);

impl WaitPosition {
    pub const UNKNOWN: WaitPosition = WaitPosition(0);

    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    pub const fn value(&self) -> u32 {
        self.0
    }

    /// True if the entry is the next to be promoted.
    pub fn is_head(&self) -> bool {
        self.0 == 1
    }

    pub fn is_known(&self) -> bool {
        self.0 > 0
    }
}

impl fmt::Display for WaitPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Computes bounded waiting-list positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionCalculator {
    window: u32,
}

impl PositionCalculator {
    /// Creates a calculator scanning at most `window` entries (minimum 1).
    pub fn new(window: u32) -> Self {
        Self {
            window: window.max(1),
        }
    }

    pub fn window(&self) -> u32 {
        self.window
    }

    /// Position of `marker` within `queue`.
    ///
    /// `queue` must yield the schedule's waiting ids in ascending order and
    /// contain `marker`; the store checks existence before asking.
    pub fn position_in<I>(&self, queue: I, marker: WaitingId) -> WaitPosition
    where
        I: IntoIterator<Item = WaitingId>,
    {
        let count = queue
            .into_iter()
            .take_while(|id| *id <= marker)
            .take(self.window as usize)
            .count();
        WaitPosition(count as u32)
    }

    /// Clamps a count produced by a store-side query to the window.
    pub fn saturate(&self, count: i64) -> WaitPosition {
        if count <= 0 {
            WaitPosition::UNKNOWN
        } else {
            WaitPosition(count.min(i64::from(self.window)) as u32)
        }
    }

    /// True if `position` may be an underestimate.
    pub fn is_saturated(&self, position: WaitPosition) -> bool {
        position.0 >= self.window
    }
}

impl Default for PositionCalculator {
    fn default() -> Self {
        Self::new(DEFAULT_POSITION_WINDOW)
    }
}
