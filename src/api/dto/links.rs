//! DTOs for link management endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::domain::entities::Link;

/// Request to create a short link.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateLinkRequest {
    /// The destination URL. Must be an absolute https URL; full validation
    /// happens in the link service.
    #[validate(length(min = 1, max = 2048))]
    pub url: String,
}

/// Request to update a link.
///
/// Omitted fields are left unchanged.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateLinkRequest {
    #[validate(length(min = 1, max = 2048))]
    pub url: Option<String>,
    pub active: Option<bool>,
}

/// A link as returned by the API.
#[derive(Debug, Serialize)]
pub struct LinkResponse {
    pub id: Uuid,
    pub slug: String,
    pub url: String,
    /// Public redirect URL (`<base>/go/<slug>`), usable for QR rendering.
    pub short_url: String,
    pub active: bool,
    pub quarantined: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl LinkResponse {
    /// Builds the response from a link and its public redirect URL.
    pub fn from_link(link: Link, short_url: String) -> Self {
        Self {
            id: link.id,
            slug: link.slug,
            url: link.destination_url,
            short_url,
            active: link.active,
            quarantined: link.quarantined,
            created_at: link.created_at,
            updated_at: link.updated_at,
        }
    }
}

/// Response for the authenticated user's link listing.
#[derive(Debug, Serialize)]
pub struct LinkListResponse {
    pub links: Vec<LinkResponse>,
}
