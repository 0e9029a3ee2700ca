//! Handlers for link management endpoints.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;
use validator::Validate;

use crate::api::dto::links::{CreateLinkRequest, LinkListResponse, LinkResponse, UpdateLinkRequest};
use crate::api::middleware::auth_context::CurrentUser;
use crate::domain::entities::LinkUpdate;
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short link owned by the authenticated user.
///
/// # Endpoint
///
/// `POST /api/links`
///
/// # Request Body
///
/// ```json
/// { "url": "https://example.com/some/long/path" }
/// ```
///
/// # Errors
///
/// - `400` - unparseable URL, missing host, or non-https scheme
/// - `401` - no valid session
/// - `403` - destination domain or acting user is blocklisted
pub async fn create_link_handler(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(payload): Json<CreateLinkRequest>,
) -> Result<(StatusCode, Json<LinkResponse>), AppError> {
    payload.validate()?;

    let link = state
        .link_service
        .create_link(current_user.user.id, &payload.url)
        .await?;

    let short_url = state.link_service.redirect_url(&link.slug);

    Ok((
        StatusCode::CREATED,
        Json(LinkResponse::from_link(link, short_url)),
    ))
}

/// Lists the authenticated user's links, newest first.
///
/// # Endpoint
///
/// `GET /api/links`
pub async fn list_links_handler(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> Result<Json<LinkListResponse>, AppError> {
    let links = state.link_service.list_links(current_user.user.id).await?;

    let links = links
        .into_iter()
        .map(|link| {
            let short_url = state.link_service.redirect_url(&link.slug);
            LinkResponse::from_link(link, short_url)
        })
        .collect();

    Ok(Json(LinkListResponse { links }))
}

/// Fetches one link, including its public redirect URL.
///
/// The `short_url` field is the string auxiliary surfaces (e.g. QR
/// renderers) encode; the image encoding itself lives elsewhere.
///
/// # Endpoint
///
/// `GET /api/links/{id}`
pub async fn get_link_handler(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(link_id): Path<Uuid>,
) -> Result<Json<LinkResponse>, AppError> {
    let link = state.link_service.get_link(link_id).await?;
    let short_url = state.link_service.redirect_url(&link.slug);

    Ok(Json(LinkResponse::from_link(link, short_url)))
}

/// Updates a link's destination and/or active flag.
///
/// The store writes the change and the pre-update history snapshot in one
/// transaction, attributed to the authenticated user.
///
/// # Endpoint
///
/// `PATCH /api/links/{id}`
// TODO: restrict updates to the link owner once sharing rules are decided.
pub async fn update_link_handler(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(link_id): Path<Uuid>,
    Json(payload): Json<UpdateLinkRequest>,
) -> Result<Json<LinkResponse>, AppError> {
    payload.validate()?;

    let patch = LinkUpdate {
        destination_url: payload.url,
        active: payload.active,
    };

    let link = state
        .link_service
        .update_link(current_user.user.id, link_id, patch)
        .await?;

    let short_url = state.link_service.redirect_url(&link.slug);

    Ok(Json(LinkResponse::from_link(link, short_url)))
}
