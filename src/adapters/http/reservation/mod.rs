//! HTTP adapter for reservation, waiting-list and catalog endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    ApproveCancelResponse, CreateReservationRequest, CreateWaitingRequest, ErrorResponse,
    PromotionResponse, ReservationResponse, ThemeResponse, WaitingResponse,
};
pub use handlers::ReservationAppState;
pub use routes::{admin_routes, catalog_routes, reservation_router, reservation_routes};
