//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET /go/{slug}`       - Short link redirect (public)
//! - `GET /link/{slug}`     - Legacy alias for the redirect (public)
//! - `GET /health`          - Health check: DB, visit queue (public)
//! - `GET /callback/google` - OAuth callback (public, rate limited)
//! - `/api/*`               - JSON API (session token, rate limited)
//!
//! # Middleware
//!
//! Outside-in: panic isolation, request-id stamping, tracing, auth-context
//! construction, path normalization. Rate limiting is applied per route
//! group. A panicking handler produces a 500 for that request only; the
//! process keeps serving.

use crate::api;
use crate::api::handlers::{health_handler, login_google_handler, redirect_handler};
use crate::api::middleware::{auth_context, rate_limit, request_id, tracing};
use crate::state::AppState;
use axum::routing::get;
use axum::{Router, middleware};
use tower::Layer;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the application router with all routes and middleware.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    let api_router = api::routes::api_routes().layer(rate_limit::secure_layer());

    let oauth_router = Router::new()
        .route("/callback/google", get(login_google_handler))
        .layer(rate_limit::layer());

    let router = Router::new()
        .route("/go/{slug}", get(redirect_handler))
        .route("/link/{slug}", get(redirect_handler))
        .route("/health", get(health_handler))
        .merge(oauth_router)
        .nest("/api", api_router)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_context::layer,
        ))
        .with_state(state)
        .layer(request_id::propagate_layer())
        .layer(tracing::layer())
        .layer(request_id::set_layer())
        .layer(CatchPanicLayer::new());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
