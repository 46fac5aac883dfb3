//! HTTP DTOs for reservation endpoints.
//!
//! These types decouple the HTTP API from domain types, allowing independent evolution.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::catalog::Theme;
use crate::domain::foundation::{ReservationId, ScheduleId, ThemeId, WaitingId};
use crate::domain::reservation::{Reservation, ReservationWaiting};
use crate::ports::Promotion;

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Request to reserve a schedule.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateReservationRequest {
    pub schedule_id: ScheduleId,
    pub theme_id: ThemeId,
}

/// Request to join a schedule's waiting list.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateWaitingRequest {
    pub schedule_id: ScheduleId,
}

/// Query parameters for listing a theme's reservations on a day.
#[derive(Debug, Clone, Deserialize)]
pub struct ListReservationsParams {
    pub theme_id: ThemeId,
    pub date: NaiveDate,
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationResponse {
    pub id: ReservationId,
    pub member_id: String,
    pub schedule_id: ScheduleId,
    pub status: String,
}

impl From<Reservation> for ReservationResponse {
    fn from(reservation: Reservation) -> Self {
        Self {
            id: reservation.id(),
            member_id: reservation.member_id().to_string(),
            schedule_id: reservation.schedule_id(),
            status: reservation.status().to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaitingResponse {
    pub id: WaitingId,
    pub member_id: String,
    pub schedule_id: ScheduleId,
    /// 1 is next in line; 0 means unknown.
    pub position: u32,
}

impl From<ReservationWaiting> for WaitingResponse {
    fn from(waiting: ReservationWaiting) -> Self {
        Self {
            id: waiting.id(),
            member_id: waiting.member_id().to_string(),
            schedule_id: waiting.schedule_id(),
            position: waiting.position().value(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromotionResponse {
    pub waiting_id: WaitingId,
    pub reservation: ReservationResponse,
}

impl From<Promotion> for PromotionResponse {
    fn from(promotion: Promotion) -> Self {
        Self {
            waiting_id: promotion.waiting_id,
            reservation: promotion.reservation.into(),
        }
    }
}

/// Response for an approved cancellation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApproveCancelResponse {
    pub reservation: ReservationResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub promotion: Option<PromotionResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeResponse {
    pub id: ThemeId,
    pub name: String,
    pub description: String,
    pub price: u32,
}

impl From<Theme> for ThemeResponse {
    fn from(theme: Theme) -> Self {
        Self {
            id: theme.id,
            name: theme.name,
            description: theme.description,
            price: theme.price,
        }
    }
}

/// Standard error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new("BAD_REQUEST", message)
    }

    pub fn not_found(resource_type: &str, id: &str) -> Self {
        Self::new("NOT_FOUND", format!("{} not found: {}", resource_type, id))
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new("FORBIDDEN", message)
    }

    pub fn conflict(code: &str, message: impl Into<String>) -> Self {
        Self::new(code, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new("INTERNAL_ERROR", message)
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}
