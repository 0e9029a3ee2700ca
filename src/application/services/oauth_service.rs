//! OAuth login orchestration.

use std::sync::Arc;

use uuid::Uuid;

use crate::application::services::SessionService;
use crate::domain::entities::UserSession;
use crate::domain::repositories::{NewOAuthUser, SessionRepository, UserRepository};
use crate::error::AppError;
use crate::infrastructure::identity::IdentityProvider;

/// Service turning an authorization code into an authenticated session.
///
/// First login with a given provider identity creates the user; subsequent
/// logins resolve the existing binding. Session issuance (and revocation of
/// the request's prior session) goes through [`SessionService::issue`].
pub struct OAuthService<U, S, P>
where
    U: UserRepository,
    S: SessionRepository,
    P: IdentityProvider,
{
    user_repository: Arc<U>,
    session_service: Arc<SessionService<U, S>>,
    identity_provider: Arc<P>,
}

impl<U, S, P> OAuthService<U, S, P>
where
    U: UserRepository,
    S: SessionRepository,
    P: IdentityProvider,
{
    /// Creates a new OAuth service.
    pub fn new(
        user_repository: Arc<U>,
        session_service: Arc<SessionService<U, S>>,
        identity_provider: Arc<P>,
    ) -> Self {
        Self {
            user_repository,
            session_service,
            identity_provider,
        }
    }

    /// Logs a user in from an authorization code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthenticated`] when the provider rejects the
    /// code, [`AppError::Conflict`] when first login collides with an
    /// existing email, [`AppError::Internal`] on store or transport failure.
    pub async fn login_with_code(
        &self,
        code: &str,
        prior_session: Option<Uuid>,
    ) -> Result<UserSession, AppError> {
        let identity = self.identity_provider.exchange_code(code).await?;
        let provider = self.identity_provider.provider();

        let user = match self
            .user_repository
            .find_by_provider_id(provider, &identity.provider_id)
            .await?
        {
            Some(user) => user,
            None => {
                tracing::info!(provider, "first login, creating user");
                self.user_repository
                    .create_oauth_user(NewOAuthUser {
                        given_name: identity.given_name,
                        family_name: identity.family_name,
                        email: identity.email,
                        avatar_url: identity.avatar_url,
                        value: identity.access_token,
                        provider: provider.to_string(),
                        provider_id: identity.provider_id,
                        provider_data: identity.token_data,
                    })
                    .await?
            }
        };

        self.session_service.issue(user.id, prior_session).await
    }
}
