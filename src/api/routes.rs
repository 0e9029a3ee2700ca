//! API route configuration.
//!
//! Identity is established for every request by the auth-context middleware
//! (applied at the top-level router); handlers that require a user extract
//! [`crate::api::middleware::auth_context::CurrentUser`] and reject
//! anonymous callers with 401. Registration and login are the only
//! anonymous-friendly routes here.

use crate::api::handlers::{
    create_link_handler, get_link_handler, list_links_handler, login_password_handler,
    register_handler, update_link_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// All `/api` routes.
///
/// # Endpoints
///
/// - `POST  /users`              - Register with email + password
/// - `POST  /sessions/password`  - Log in with email + password
/// - `POST  /links`              - Create a short link (authenticated)
/// - `GET   /links`              - List own links (authenticated)
/// - `GET   /links/{id}`         - Fetch one link + its redirect URL (authenticated)
/// - `PATCH /links/{id}`         - Update destination / active flag (authenticated)
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/users", post(register_handler))
        .route("/sessions/password", post(login_password_handler))
        .route("/links", post(create_link_handler).get(list_links_handler))
        .route(
            "/links/{id}",
            get(get_link_handler).patch(update_link_handler),
        )
}
