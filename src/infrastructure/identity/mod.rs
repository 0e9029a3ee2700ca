//! External identity provider integration.
//!
//! The application only ever sees [`IdentityProvider::exchange_code`]: an
//! authorization code goes in, a resolved profile + opaque token material
//! comes out. The wire protocol of the exchange lives entirely inside the
//! concrete implementation.
//!
//! # Implementations
//!
//! - [`GoogleIdentityProvider`] - Google OAuth 2.0 code exchange
//! - Test mocks available with `cfg(test)`

use crate::error::AppError;
use async_trait::async_trait;
use serde_json::Value;

pub mod google;

pub use google::GoogleIdentityProvider;

/// Profile and token material resolved from an authorization code.
#[derive(Debug, Clone)]
pub struct ProviderIdentity {
    pub provider_id: String,
    pub email: String,
    pub given_name: Option<String>,
    pub family_name: Option<String>,
    pub avatar_url: Option<String>,
    /// Opaque access token material; stored as the credential value.
    pub access_token: String,
    /// Full token response, persisted alongside the credential.
    pub token_data: Value,
}

/// Identity collaborator: exchanges an authorization code for a profile.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Stable provider name used for credential bindings (e.g. `google`).
    fn provider(&self) -> &'static str;

    /// Exchanges an authorization code for the holder's identity.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthenticated`] when the provider rejects the
    /// code, [`AppError::Internal`] on transport failures.
    async fn exchange_code(&self, code: &str) -> Result<ProviderIdentity, AppError>;
}
