//! Link lifecycle service: validation, blocklist policy, slug persistence.

use std::sync::Arc;

use serde_json::json;
use url::Url;
use uuid::Uuid;

use crate::domain::entities::{Link, LinkUpdate, NewLink};
use crate::domain::repositories::{BlockRepository, LinkRepository};
use crate::error::AppError;
use crate::utils::slug::generate_slug;

/// Collision retries before giving up on slug generation.
const MAX_SLUG_ATTEMPTS: usize = 8;

/// Service orchestrating link creation and mutation.
///
/// Creation runs validation, then blocklist policy (domain before user),
/// then slug generation with bounded retry on storage conflicts. Updates
/// delegate to the store's atomic update+history operation.
pub struct LinkService<L: LinkRepository, B: BlockRepository> {
    link_repository: Arc<L>,
    block_repository: Arc<B>,
    base_url: String,
}

impl<L: LinkRepository, B: BlockRepository> LinkService<L, B> {
    /// Creates a new link service.
    ///
    /// `base_url` is the public origin used to build `<base>/go/<slug>` URLs.
    pub fn new(link_repository: Arc<L>, block_repository: Arc<B>, base_url: String) -> Self {
        Self {
            link_repository,
            block_repository,
            base_url,
        }
    }

    /// Creates a link owned by `user_id` pointing at `raw_url`.
    ///
    /// # Errors
    ///
    /// - [`AppError::InvalidUrl`] - `raw_url` does not parse or has no host
    /// - [`AppError::InvalidUrlProtocol`] - scheme is not exactly `https`
    /// - [`AppError::BlockedDomain`] / [`AppError::BlockedUser`] - policy
    ///   rejection, domain checked first
    /// - [`AppError::Internal`] - store failure, or slug collisions exhausted
    ///   the bounded retry attempts
    pub async fn create_link(&self, user_id: Uuid, raw_url: &str) -> Result<Link, AppError> {
        let host = destination_host(raw_url)?;

        if self.block_repository.is_domain_blocked(&host).await? {
            tracing::warn!(domain = %host, user_id = %user_id, "attempt to shorten a blocked domain");
            return Err(AppError::blocked_domain(
                "Domain is blocked",
                json!({ "domain": host }),
            ));
        }

        if self.block_repository.is_user_blocked(user_id).await? {
            tracing::warn!(user_id = %user_id, "attempt to shorten by a blocked user");
            return Err(AppError::blocked_user(
                "User is blocked",
                json!({ "user_id": user_id }),
            ));
        }

        // Uniqueness lives in the store; regenerate on conflict instead of
        // pre-checking, so concurrent creators cannot race past each other.
        for attempt in 1..=MAX_SLUG_ATTEMPTS {
            let new_link = NewLink {
                slug: generate_slug(),
                destination_url: raw_url.to_string(),
                created_by: user_id,
            };

            match self.link_repository.create(new_link).await {
                Err(err) if err.is_conflict() => {
                    tracing::warn!(attempt, "slug collision, regenerating");
                }
                other => return other,
            }
        }

        Err(AppError::internal(
            "Failed to generate a unique slug",
            json!({ "attempts": MAX_SLUG_ATTEMPTS }),
        ))
    }

    /// Updates a link's destination and/or active flag, attributed to `user_id`.
    ///
    /// The store performs the update and pre-update history snapshot in one
    /// transaction.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidUrl`] / [`AppError::InvalidUrlProtocol`]
    /// when a new destination fails validation, [`AppError::NotFound`] if
    /// the link does not exist, [`AppError::Internal`] on store failure.
    pub async fn update_link(
        &self,
        user_id: Uuid,
        link_id: Uuid,
        patch: LinkUpdate,
    ) -> Result<Link, AppError> {
        if let Some(destination_url) = &patch.destination_url {
            destination_host(destination_url)?;
        }

        self.link_repository.update(link_id, user_id, patch).await
    }

    /// Retrieves a link by id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link matches.
    pub async fn get_link(&self, link_id: Uuid) -> Result<Link, AppError> {
        self.link_repository
            .find_by_id(link_id)
            .await?
            .ok_or_else(|| AppError::not_found("Link not found", json!({ "id": link_id })))
    }

    /// Lists the links created by a user, newest first.
    pub async fn list_links(&self, owner_id: Uuid) -> Result<Vec<Link>, AppError> {
        self.link_repository.list_by_owner(owner_id).await
    }

    /// Builds the public redirect URL for a slug.
    pub fn redirect_url(&self, slug: &str) -> String {
        format!("{}/go/{}", self.base_url.trim_end_matches('/'), slug)
    }
}

/// Validates a destination URL and extracts its host.
///
/// # Errors
///
/// Returns [`AppError::InvalidUrl`] when the URL does not parse or has no
/// host, [`AppError::InvalidUrlProtocol`] when the scheme is not `https`.
fn destination_host(raw_url: &str) -> Result<String, AppError> {
    let parsed = Url::parse(raw_url)
        .map_err(|e| AppError::invalid_url("Invalid URL", json!({ "reason": e.to_string() })))?;

    let host = match parsed.host_str() {
        Some(host) if !host.is_empty() => host.to_string(),
        _ => {
            return Err(AppError::invalid_url(
                "URL has no host",
                json!({ "url": raw_url }),
            ));
        }
    };

    if parsed.scheme() != "https" {
        return Err(AppError::invalid_url_protocol(
            "Only https destinations are allowed",
            json!({ "scheme": parsed.scheme() }),
        ));
    }

    Ok(host)
}
