//! Schedule reference record.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ScheduleId, ThemeId, ValidationError};

/// A bookable (theme, date, time) slot with capacity one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    pub id: ScheduleId,
    pub theme_id: ThemeId,
    pub date: NaiveDate,
    pub time: NaiveTime,
}

impl Schedule {
    pub fn new(id: ScheduleId, theme_id: ThemeId, date: NaiveDate, time: NaiveTime) -> Self {
        Self {
            id,
            theme_id,
            date,
            time,
        }
    }

    /// Verifies the schedule is offered for `theme_id`.
    ///
    /// # Errors
    ///
    /// - `Mismatch` if the schedule belongs to another theme
    pub fn ensure_theme(&self, theme_id: ThemeId) -> Result<(), ValidationError> {
        if self.theme_id == theme_id {
            Ok(())
        } else {
            Err(ValidationError::mismatch("theme_id", self.theme_id, theme_id))
        }
    }
}
