//! Reservation engine configuration

use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::reservation::{PositionCalculator, ReservationStatus, DEFAULT_POSITION_WINDOW};

/// Reservation engine configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ReservationConfig {
    /// Create reservations as APPROVED instead of REQUESTED
    #[serde(default = "default_auto_approve")]
    pub auto_approve: bool,

    /// Queue entries scanned when computing a waiting position
    #[serde(default = "default_position_window")]
    pub position_window: u32,
}

impl ReservationConfig {
    /// Status a freshly created reservation starts in
    pub fn initial_status(&self) -> ReservationStatus {
        if self.auto_approve {
            ReservationStatus::Approved
        } else {
            ReservationStatus::Requested
        }
    }

    pub fn position_calculator(&self) -> PositionCalculator {
        PositionCalculator::new(self.position_window)
    }

    /// Validate reservation configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.position_window == 0 {
            return Err(ValidationError::InvalidPositionWindow);
        }
        Ok(())
    }
}

impl Default for ReservationConfig {
    fn default() -> Self {
        Self {
            auto_approve: default_auto_approve(),
            position_window: default_position_window(),
        }
    }
}

fn default_auto_approve() -> bool {
    true
}

fn default_position_window() -> u32 {
    DEFAULT_POSITION_WINDOW
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_auto_approve_with_window_100() {
        let config = ReservationConfig::default();
        assert!(config.auto_approve);
        assert_eq!(config.position_window, 100);
        assert_eq!(config.initial_status(), ReservationStatus::Approved);
    }

    #[test]
    fn test_manual_approval_starts_requested() {
        let config = ReservationConfig {
            auto_approve: false,
            ..Default::default()
        };
        assert_eq!(config.initial_status(), ReservationStatus::Requested);
    }

    #[test]
    fn test_calculator_uses_configured_window() {
        let config = ReservationConfig {
            position_window: 7,
            ..Default::default()
        };
        assert_eq!(config.position_calculator().window(), 7);
    }

    #[test]
    fn test_validation_zero_window() {
        let config = ReservationConfig {
            position_window: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
