//! Axum router configuration for reservation endpoints.

use axum::{
    routing::{delete, get, patch, post},
    Router,
};

use super::handlers::{
    approve_cancel, approve_reservation, create_reservation, create_waiting, delete_reservation,
    delete_waiting, list_my_reservations, list_my_waitings, list_reservations, list_themes,
    reject_reservation, request_cancel, ReservationAppState,
};

/// Member-facing reservation routes.
///
/// # Routes
/// - `POST /reservations` - Reserve a schedule
/// - `GET /reservations?theme_id=&date=` - Reservations of a theme on a day
/// - `GET /reservations/mine` - Caller's reservations
/// - `DELETE /reservations/:id` - Withdraw a pending reservation
/// - `PATCH /reservations/:id/cancel` - Request cancellation
/// - `POST /reservation-waitings` - Join a waiting list
/// - `GET /reservation-waitings/mine` - Caller's waiting entries
/// - `DELETE /reservation-waitings/:id` - Leave a waiting list
pub fn reservation_routes() -> Router<ReservationAppState> {
    Router::new()
        .route("/reservations", post(create_reservation).get(list_reservations))
        .route("/reservations/mine", get(list_my_reservations))
        .route("/reservations/:id", delete(delete_reservation))
        .route("/reservations/:id/cancel", patch(request_cancel))
        .route("/reservation-waitings", post(create_waiting))
        .route("/reservation-waitings/mine", get(list_my_waitings))
        .route("/reservation-waitings/:id", delete(delete_waiting))
}

/// Admin routes; each handler runs the caller through the admin gate.
///
/// # Routes
/// - `PATCH /admin/reservations/:id/approve`
/// - `PATCH /admin/reservations/:id/reject`
/// - `PATCH /admin/reservations/:id/cancel-approve`
pub fn admin_routes() -> Router<ReservationAppState> {
    Router::new()
        .route("/reservations/:id/approve", patch(approve_reservation))
        .route("/reservations/:id/reject", patch(reject_reservation))
        .route("/reservations/:id/cancel-approve", patch(approve_cancel))
}

/// Catalog routes.
///
/// # Routes
/// - `GET /themes` - List themes
pub fn catalog_routes() -> Router<ReservationAppState> {
    Router::new().route("/themes", get(list_themes))
}

/// Complete reservation module router.
pub fn reservation_router() -> Router<ReservationAppState> {
    Router::new()
        .merge(reservation_routes())
        .merge(catalog_routes())
        .nest("/admin", admin_routes())
}
