//! HTTP handlers for reservation endpoints.
//!
//! These handlers connect Axum routes to application layer command/query handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use tracing::{error, warn};

use crate::adapters::http::middleware::RequireMember;
use crate::application::handlers::reservation::{
    ApproveCancelCommand, ApproveCancelHandler, ApproveReservationCommand,
    ApproveReservationHandler, CreateReservationCommand, CreateReservationHandler,
    CreateWaitingCommand, CreateWaitingHandler, DeleteReservationCommand,
    DeleteReservationHandler, DeleteWaitingCommand, DeleteWaitingHandler,
    ListMyReservationsHandler, ListMyReservationsQuery, ListMyWaitingsHandler,
    ListMyWaitingsQuery, ListReservationsHandler, ListReservationsQuery, ListThemesHandler,
    RejectReservationCommand, RejectReservationHandler, RequestCancelCommand,
    RequestCancelHandler,
};
use crate::domain::foundation::{
    AdminCapability, AdminGate, AuthenticatedMember, CommandMetadata, ReservationId, WaitingId,
};
use crate::domain::reservation::{ReservationError, ReservationStatus};
use crate::ports::{CancellationPromoter, CatalogReader, ReservationRepository, WaitingRepository};

use super::dto::{
    ApproveCancelResponse, CreateReservationRequest, CreateWaitingRequest, ErrorResponse,
    ListReservationsParams, ReservationResponse, ThemeResponse, WaitingResponse,
};

// ════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════

/// Shared application state containing all dependencies.
///
/// Cloned for each request; dependencies are Arc-wrapped.
#[derive(Clone)]
pub struct ReservationAppState {
    pub catalog: Arc<dyn CatalogReader>,
    pub reservations: Arc<dyn ReservationRepository>,
    pub waitings: Arc<dyn WaitingRepository>,
    pub promoter: Arc<dyn CancellationPromoter>,
    pub admin_gate: Arc<dyn AdminGate>,
    /// Status new reservations start in.
    pub initial_status: ReservationStatus,
}

impl ReservationAppState {
    pub fn create_reservation_handler(&self) -> CreateReservationHandler {
        CreateReservationHandler::new(
            self.catalog.clone(),
            self.reservations.clone(),
            self.initial_status,
        )
    }

    pub fn create_waiting_handler(&self) -> CreateWaitingHandler {
        CreateWaitingHandler::new(self.catalog.clone(), self.waitings.clone())
    }

    pub fn delete_reservation_handler(&self) -> DeleteReservationHandler {
        DeleteReservationHandler::new(self.reservations.clone())
    }

    pub fn delete_waiting_handler(&self) -> DeleteWaitingHandler {
        DeleteWaitingHandler::new(self.waitings.clone())
    }

    pub fn request_cancel_handler(&self) -> RequestCancelHandler {
        RequestCancelHandler::new(self.reservations.clone())
    }

    pub fn approve_reservation_handler(&self) -> ApproveReservationHandler {
        ApproveReservationHandler::new(self.reservations.clone())
    }

    pub fn reject_reservation_handler(&self) -> RejectReservationHandler {
        RejectReservationHandler::new(self.reservations.clone())
    }

    pub fn approve_cancel_handler(&self) -> ApproveCancelHandler {
        ApproveCancelHandler::new(self.reservations.clone(), self.promoter.clone())
    }

    pub fn list_reservations_handler(&self) -> ListReservationsHandler {
        ListReservationsHandler::new(self.reservations.clone())
    }

    pub fn list_my_reservations_handler(&self) -> ListMyReservationsHandler {
        ListMyReservationsHandler::new(self.reservations.clone())
    }

    pub fn list_my_waitings_handler(&self) -> ListMyWaitingsHandler {
        ListMyWaitingsHandler::new(self.waitings.clone())
    }

    pub fn list_themes_handler(&self) -> ListThemesHandler {
        ListThemesHandler::new(self.catalog.clone())
    }

    /// Runs the caller through the admin gate.
    fn admit(&self, member: &AuthenticatedMember) -> Result<AdminCapability, Response> {
        self.admin_gate.admit(member).map_err(|e| {
            warn!(member_id = %member.id, role = %member.role, "Admin operation refused");
            (StatusCode::FORBIDDEN, Json(ErrorResponse::forbidden(e.to_string()))).into_response()
        })
    }
}

/// Builds command metadata, reusing the request id as correlation id.
fn metadata(member: &AuthenticatedMember, headers: &HeaderMap) -> CommandMetadata {
    let metadata = CommandMetadata::new(member.id.clone()).with_source("http");
    match headers.get("x-request-id").and_then(|v| v.to_str().ok()) {
        Some(request_id) => metadata.with_correlation_id(request_id),
        None => metadata,
    }
}

fn created(location: String, body: impl serde::Serialize) -> Response {
    (
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(body),
    )
        .into_response()
}

// ════════════════════════════════════════════════════════════════════════════
// Member endpoints
// ════════════════════════════════════════════════════════════════════════════

/// POST /reservations - Reserve a schedule
pub async fn create_reservation(
    State(state): State<ReservationAppState>,
    RequireMember(member): RequireMember,
    headers: HeaderMap,
    Json(req): Json<CreateReservationRequest>,
) -> Response {
    let cmd = CreateReservationCommand {
        member_id: member.id.clone(),
        schedule_id: req.schedule_id,
        theme_id: req.theme_id,
    };

    match state
        .create_reservation_handler()
        .handle(cmd, metadata(&member, &headers))
        .await
    {
        Ok(result) => {
            let location = format!("/reservations/{}", result.reservation.id());
            created(location, ReservationResponse::from(result.reservation))
        }
        Err(e) => handle_reservation_error(e),
    }
}

/// POST /reservation-waitings - Join a schedule's waiting list
pub async fn create_waiting(
    State(state): State<ReservationAppState>,
    RequireMember(member): RequireMember,
    headers: HeaderMap,
    Json(req): Json<CreateWaitingRequest>,
) -> Response {
    let cmd = CreateWaitingCommand {
        member_id: member.id.clone(),
        schedule_id: req.schedule_id,
    };

    match state
        .create_waiting_handler()
        .handle(cmd, metadata(&member, &headers))
        .await
    {
        Ok(result) => {
            let location = format!("/reservation-waitings/{}", result.waiting.id());
            created(location, WaitingResponse::from(result.waiting))
        }
        Err(e) => handle_reservation_error(e),
    }
}

/// GET /reservations?theme_id=&date= - Reservations of a theme on a day
pub async fn list_reservations(
    State(state): State<ReservationAppState>,
    Query(params): Query<ListReservationsParams>,
) -> Response {
    let query = ListReservationsQuery {
        theme_id: params.theme_id,
        date: params.date,
    };

    match state.list_reservations_handler().handle(query).await {
        Ok(reservations) => Json(
            reservations
                .into_iter()
                .map(ReservationResponse::from)
                .collect::<Vec<_>>(),
        )
        .into_response(),
        Err(e) => handle_reservation_error(e),
    }
}

/// GET /reservations/mine - Caller's reservations
pub async fn list_my_reservations(
    State(state): State<ReservationAppState>,
    RequireMember(member): RequireMember,
) -> Response {
    let query = ListMyReservationsQuery {
        member_id: member.id,
    };

    match state.list_my_reservations_handler().handle(query).await {
        Ok(reservations) => Json(
            reservations
                .into_iter()
                .map(ReservationResponse::from)
                .collect::<Vec<_>>(),
        )
        .into_response(),
        Err(e) => handle_reservation_error(e),
    }
}

/// GET /reservation-waitings/mine - Caller's waiting entries with positions
pub async fn list_my_waitings(
    State(state): State<ReservationAppState>,
    RequireMember(member): RequireMember,
) -> Response {
    let query = ListMyWaitingsQuery {
        member_id: member.id,
    };

    let waitings = state.list_my_waitings_handler().handle(query).await;
    Json(
        waitings
            .into_iter()
            .map(WaitingResponse::from)
            .collect::<Vec<_>>(),
    )
    .into_response()
}

/// DELETE /reservations/:id - Withdraw a pending reservation
pub async fn delete_reservation(
    State(state): State<ReservationAppState>,
    RequireMember(member): RequireMember,
    headers: HeaderMap,
    Path(id): Path<ReservationId>,
) -> Response {
    let cmd = DeleteReservationCommand {
        reservation_id: id,
        member_id: member.id.clone(),
    };

    match state
        .delete_reservation_handler()
        .handle(cmd, metadata(&member, &headers))
        .await
    {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => handle_reservation_error(e),
    }
}

/// DELETE /reservation-waitings/:id - Leave a waiting list
pub async fn delete_waiting(
    State(state): State<ReservationAppState>,
    RequireMember(member): RequireMember,
    headers: HeaderMap,
    Path(id): Path<WaitingId>,
) -> Response {
    let cmd = DeleteWaitingCommand {
        waiting_id: id,
        member_id: member.id.clone(),
    };

    match state
        .delete_waiting_handler()
        .handle(cmd, metadata(&member, &headers))
        .await
    {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => handle_reservation_error(e),
    }
}

/// PATCH /reservations/:id/cancel - Ask to cancel a confirmed reservation
pub async fn request_cancel(
    State(state): State<ReservationAppState>,
    RequireMember(member): RequireMember,
    headers: HeaderMap,
    Path(id): Path<ReservationId>,
) -> Response {
    let cmd = RequestCancelCommand {
        reservation_id: id,
        member_id: member.id.clone(),
    };

    match state
        .request_cancel_handler()
        .handle(cmd, metadata(&member, &headers))
        .await
    {
        Ok(result) => Json(ReservationResponse::from(result.reservation)).into_response(),
        Err(e) => handle_reservation_error(e),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Admin endpoints
// ════════════════════════════════════════════════════════════════════════════

/// PATCH /admin/reservations/:id/approve
pub async fn approve_reservation(
    State(state): State<ReservationAppState>,
    RequireMember(member): RequireMember,
    headers: HeaderMap,
    Path(id): Path<ReservationId>,
) -> Response {
    let admin = match state.admit(&member) {
        Ok(admin) => admin,
        Err(response) => return response,
    };
    let cmd = ApproveReservationCommand { reservation_id: id };

    match state
        .approve_reservation_handler()
        .handle(cmd, admin, metadata(&member, &headers))
        .await
    {
        Ok(result) => Json(ReservationResponse::from(result.reservation)).into_response(),
        Err(e) => handle_reservation_error(e),
    }
}

/// PATCH /admin/reservations/:id/reject
pub async fn reject_reservation(
    State(state): State<ReservationAppState>,
    RequireMember(member): RequireMember,
    headers: HeaderMap,
    Path(id): Path<ReservationId>,
) -> Response {
    let admin = match state.admit(&member) {
        Ok(admin) => admin,
        Err(response) => return response,
    };
    let cmd = RejectReservationCommand { reservation_id: id };

    match state
        .reject_reservation_handler()
        .handle(cmd, admin, metadata(&member, &headers))
        .await
    {
        Ok(result) => Json(ReservationResponse::from(result.reservation)).into_response(),
        Err(e) => handle_reservation_error(e),
    }
}

/// PATCH /admin/reservations/:id/cancel-approve
pub async fn approve_cancel(
    State(state): State<ReservationAppState>,
    RequireMember(member): RequireMember,
    headers: HeaderMap,
    Path(id): Path<ReservationId>,
) -> Response {
    let admin = match state.admit(&member) {
        Ok(admin) => admin,
        Err(response) => return response,
    };
    let cmd = ApproveCancelCommand { reservation_id: id };

    match state
        .approve_cancel_handler()
        .handle(cmd, admin, metadata(&member, &headers))
        .await
    {
        Ok(result) => Json(ApproveCancelResponse {
            reservation: result.reservation.into(),
            promotion: result.promotion.map(Into::into),
        })
        .into_response(),
        Err(e) => handle_reservation_error(e),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Catalog endpoints
// ════════════════════════════════════════════════════════════════════════════

/// GET /themes - List themes
pub async fn list_themes(State(state): State<ReservationAppState>) -> Response {
    match state.list_themes_handler().handle().await {
        Ok(themes) => Json(
            themes
                .into_iter()
                .map(ThemeResponse::from)
                .collect::<Vec<_>>(),
        )
        .into_response(),
        Err(e) => handle_reservation_error(e),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Error mapping
// ════════════════════════════════════════════════════════════════════════════

pub(crate) fn handle_reservation_error(error: ReservationError) -> Response {
    let code = error.code().to_string();
    match error {
        ReservationError::ReservationNotFound(id) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::not_found("Reservation", &id.to_string())),
        )
            .into_response(),
        ReservationError::WaitingNotFound(id) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::not_found("Waiting entry", &id.to_string())),
        )
            .into_response(),
        ReservationError::ScheduleNotFound(id) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::not_found("Schedule", &id.to_string())),
        )
            .into_response(),
        ReservationError::Forbidden => (
            StatusCode::FORBIDDEN,
            Json(ErrorResponse::forbidden("Permission denied")),
        )
            .into_response(),
        ReservationError::SlotTaken(schedule_id) => (
            StatusCode::CONFLICT,
            Json(
                ErrorResponse::conflict(&code, error.to_string())
                    .with_details(serde_json::json!({ "schedule_id": schedule_id })),
            ),
        )
            .into_response(),
        ReservationError::Conflict(ref message) => (
            StatusCode::CONFLICT,
            Json(ErrorResponse::conflict(&code, message.clone())),
        )
            .into_response(),
        ReservationError::InvalidState(message) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ErrorResponse::new(code, message)),
        )
            .into_response(),
        ReservationError::ValidationFailed { field, message } => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::bad_request(format!(
                "Validation failed for {}: {}",
                field, message
            ))),
        )
            .into_response(),
        ReservationError::Infrastructure(message) => {
            error!(error = %message, "Reservation request failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::internal("Internal server error")),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::ScheduleId;

    #[test]
    fn errors_map_to_status_codes() {
        let cases = [
            (ReservationError::ReservationNotFound(ReservationId::new(1)), StatusCode::NOT_FOUND),
            (ReservationError::WaitingNotFound(WaitingId::new(1)), StatusCode::NOT_FOUND),
            (ReservationError::ScheduleNotFound(ScheduleId::new(1)), StatusCode::NOT_FOUND),
            (ReservationError::Forbidden, StatusCode::FORBIDDEN),
            (ReservationError::SlotTaken(ScheduleId::new(1)), StatusCode::CONFLICT),
            (ReservationError::Conflict("stale".into()), StatusCode::CONFLICT),
            (ReservationError::invalid_state("nope"), StatusCode::UNPROCESSABLE_ENTITY),
            (
                ReservationError::ValidationFailed {
                    field: "theme_id".into(),
                    message: "mismatch".into(),
                },
                StatusCode::BAD_REQUEST,
            ),
            (ReservationError::infrastructure("db down"), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (error, expected) in cases {
            let label = format!("{:?}", error);
            assert_eq!(handle_reservation_error(error).status(), expected, "{}", label);
        }
    }

    #[test]
    fn metadata_reuses_request_id() {
        let mut headers = HeaderMap::new();
        headers.insert("x-request-id", "req-42".parse().unwrap());
        let member = AuthenticatedMember::member(
            crate::domain::foundation::MemberId::new("m-1").unwrap(),
        );

        assert_eq!(metadata(&member, &headers).correlation_id(), "req-42");
    }
}
