//! Application router assembly.
//!
//! Wraps the reservation routes in the cross-cutting HTTP layers: request id,
//! tracing, timeout and caller identity.

use std::time::Duration;

use axum::{middleware, Router};
use http::HeaderName;
use tower::ServiceBuilder;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use super::middleware::identity_middleware;
use super::reservation::{reservation_router, ReservationAppState};

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Build the fully configured application.
pub fn build_app(state: ReservationAppState, request_timeout: Duration) -> Router {
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    reservation_router()
        .layer(middleware::from_fn(identity_middleware))
        .layer(
            ServiceBuilder::new()
                // Outermost: the id is visible to the trace span and handlers
                .layer(SetRequestIdLayer::new(request_id.clone(), MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::new(request_timeout))
                .layer(PropagateRequestIdLayer::new(request_id)),
        )
        .with_state(state)
}
