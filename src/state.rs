//! Shared application state injected into handlers.

use sqlx::PgPool;
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::application::services::{
    LinkService, OAuthService, RedirectService, SessionService, UserService,
};
use crate::domain::visit_event::VisitEvent;
use crate::infrastructure::identity::GoogleIdentityProvider;
use crate::infrastructure::persistence::{
    PgBlockRepository, PgLinkRepository, PgSessionRepository, PgUserRepository,
};

/// Services wired to their PostgreSQL repositories.
pub type AppLinkService = LinkService<PgLinkRepository, PgBlockRepository>;
pub type AppRedirectService = RedirectService<PgLinkRepository, PgBlockRepository>;
pub type AppSessionService = SessionService<PgUserRepository, PgSessionRepository>;
pub type AppUserService = UserService<PgUserRepository>;
pub type AppOAuthService =
    OAuthService<PgUserRepository, PgSessionRepository, GoogleIdentityProvider>;

/// Request-shared state: services, the pool (for health checks), and the
/// visit event channel.
///
/// Cheap to clone; everything inside is reference-counted.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub link_service: Arc<AppLinkService>,
    pub redirect_service: Arc<AppRedirectService>,
    pub session_service: Arc<AppSessionService>,
    pub user_service: Arc<AppUserService>,
    pub oauth_service: Arc<AppOAuthService>,
    pub visit_sender: mpsc::Sender<VisitEvent>,
}
