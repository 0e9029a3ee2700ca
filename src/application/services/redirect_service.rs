//! Redirect resolution for visited slugs.

use std::sync::Arc;

use serde_json::json;
use url::Url;

use crate::domain::repositories::{BlockRepository, LinkRepository};
use crate::error::AppError;

/// Resolves a visited slug to its destination, or to not-found.
///
/// Checks run in strict order: slug lookup, active flag, quarantine flag,
/// destination-domain blocklist. Every non-redirect outcome is outwardly the
/// same not-found; only the log line reveals the cause. A blocklist
/// infrastructure failure fails closed, never allowing the redirect.
pub struct RedirectService<L: LinkRepository, B: BlockRepository> {
    link_repository: Arc<L>,
    block_repository: Arc<B>,
}

impl<L: LinkRepository, B: BlockRepository> RedirectService<L, B> {
    /// Creates a new redirect resolver.
    pub fn new(link_repository: Arc<L>, block_repository: Arc<B>) -> Self {
        Self {
            link_repository,
            block_repository,
        }
    }

    /// Resolves a slug to its destination URL.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] for every non-redirect outcome:
    /// unknown slug, deactivated or quarantined link, blocked destination,
    /// and any infrastructure failure along the way.
    pub async fn resolve(&self, slug: &str) -> Result<String, AppError> {
        let link = match self.link_repository.find_by_slug(slug).await {
            Ok(Some(link)) => link,
            Ok(None) => {
                tracing::debug!(slug, "unknown slug");
                return Err(hidden(slug));
            }
            Err(err) => {
                tracing::error!(slug, error = %err, "slug lookup failed");
                return Err(hidden(slug));
            }
        };

        if !link.active {
            tracing::warn!(slug, link_id = %link.id, "deactivated link requested");
            return Err(hidden(slug));
        }

        if link.quarantined {
            tracing::warn!(slug, link_id = %link.id, "quarantined link requested");
            return Err(hidden(slug));
        }

        // Stored destinations were validated at create time; a row that no
        // longer parses is treated as blocked.
        let host = Url::parse(&link.destination_url)
            .ok()
            .and_then(|u| u.host_str().map(|h| h.to_string()));

        let Some(host) = host else {
            tracing::error!(slug, link_id = %link.id, "stored destination has no host");
            return Err(hidden(slug));
        };

        match self.block_repository.is_domain_blocked(&host).await {
            Ok(false) => {}
            Ok(true) => {
                tracing::warn!(slug, domain = %host, "redirect to blocked domain suppressed");
                return Err(hidden(slug));
            }
            Err(err) => {
                tracing::error!(slug, domain = %host, error = %err, "blocklist check failed, failing closed");
                return Err(hidden(slug));
            }
        }

        Ok(link.destination_url)
    }
}

fn hidden(slug: &str) -> AppError {
    AppError::not_found("Link not found", json!({ "slug": slug }))
}
