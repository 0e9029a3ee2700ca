//! Request correlation ids.
//!
//! Assigns a UUID to every inbound request (unless the caller already sent
//! one) and propagates it to the response, so a failing request can be
//! correlated across client reports and server logs.

use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};

/// Stamps requests with an `x-request-id` header.
///
/// Must wrap the tracing layer so the span sees the id.
pub fn set_layer() -> SetRequestIdLayer<MakeRequestUuid> {
    SetRequestIdLayer::x_request_id(MakeRequestUuid)
}

/// Copies the request's `x-request-id` onto the response.
pub fn propagate_layer() -> PropagateRequestIdLayer {
    PropagateRequestIdLayer::x_request_id()
}
