//! Handler for short link redirect.

use axum::{
    extract::{ConnectInfo, Path, State},
    http::{HeaderMap, header},
    response::{IntoResponse, Redirect},
};
use std::net::SocketAddr;

use crate::domain::visit_event::VisitEvent;
use crate::error::AppError;
use crate::state::AppState;

/// Redirects a visited slug to its destination URL.
///
/// # Endpoint
///
/// `GET /go/{slug}` (also mounted at `GET /link/{slug}`)
///
/// # Request Flow
///
/// 1. Resolve the slug through the redirect service (status and blocklist
///    checks happen there, in order)
/// 2. Send a visit event to the audit worker (fire-and-forget; dropped if
///    the queue is full)
/// 3. Return 307 Temporary Redirect
///
/// # Errors
///
/// Every non-redirect outcome is the same 404: unknown slug, deactivated or
/// quarantined link, blocked destination, infrastructure failure. The
/// internal cause is only visible in server logs.
pub async fn redirect_handler(
    Path(slug): Path<String>,
    State(state): State<AppState>,
    headers: HeaderMap,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
) -> Result<impl IntoResponse, AppError> {
    let destination_url = state.redirect_service.resolve(&slug).await?;

    let visit = VisitEvent::new(
        slug,
        destination_url.clone(),
        Some(addr.ip().to_string()),
        headers
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok()),
        headers.get(header::REFERER).and_then(|v| v.to_str().ok()),
    );

    let _ = state.visit_sender.try_send(visit);

    Ok(Redirect::temporary(&destination_url))
}
