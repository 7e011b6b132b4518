//! Catch-all for unmatched paths and unsupported methods.

use axum::http::StatusCode;
use axum::Json;

use crate::response::Envelope;

pub const ROUTE_NOT_FOUND: &str = "Route not found";

/// `* /*` -- any path or method with no handler.
pub async fn route_not_found() -> (StatusCode, Json<Envelope<()>>) {
    (
        StatusCode::BAD_REQUEST,
        Json(Envelope::empty(ROUTE_NOT_FOUND)),
    )
}
