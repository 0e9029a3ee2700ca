//! Google OAuth 2.0 code exchange.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::entities::PROVIDER_GOOGLE;
use crate::error::AppError;

use super::{IdentityProvider, ProviderIdentity};

const TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";
const USERINFO_ENDPOINT: &str = "https://www.googleapis.com/oauth2/v1/userinfo";

#[derive(Debug, Serialize, Deserialize)]
struct GoogleTokenResponse {
    access_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    refresh_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    expires_in: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    token_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    scope: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    id_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GoogleUserInfo {
    id: String,
    email: String,
    #[serde(default)]
    given_name: Option<String>,
    #[serde(default)]
    family_name: Option<String>,
    #[serde(default)]
    picture: Option<String>,
}

/// Google implementation of the identity collaborator.
///
/// Exchanges the authorization code at Google's token endpoint, then fetches
/// the holder's profile with the returned access token. Only the resolved
/// (provider id, email, names, avatar, token material) tuple leaves this
/// module.
pub struct GoogleIdentityProvider {
    http: reqwest::Client,
    client_id: String,
    client_secret: String,
    redirect_url: String,
}

impl GoogleIdentityProvider {
    /// Creates a provider for the given OAuth client.
    ///
    /// `base_url` is the public origin of this service; Google redirects the
    /// browser back to `<base_url>/callback/google`.
    pub fn new(client_id: String, client_secret: String, base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            client_id,
            client_secret,
            redirect_url: format!("{}/callback/google", base_url.trim_end_matches('/')),
        }
    }
}

#[async_trait]
impl IdentityProvider for GoogleIdentityProvider {
    fn provider(&self) -> &'static str {
        PROVIDER_GOOGLE
    }

    async fn exchange_code(&self, code: &str) -> Result<ProviderIdentity, AppError> {
        let response = self
            .http
            .post(TOKEN_ENDPOINT)
            .form(&[
                ("code", code),
                ("client_id", &self.client_id),
                ("client_secret", &self.client_secret),
                ("redirect_uri", &self.redirect_url),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "token exchange request failed");
                AppError::internal("Identity provider unreachable", json!({}))
            })?;

        if response.status().is_client_error() {
            return Err(AppError::unauthenticated(
                "Authorization code rejected",
                json!({ "provider": PROVIDER_GOOGLE }),
            ));
        }

        let token: GoogleTokenResponse = response.json().await.map_err(|e| {
            tracing::error!(error = %e, "malformed token response");
            AppError::internal("Identity provider returned malformed response", json!({}))
        })?;

        let user: GoogleUserInfo = self
            .http
            .get(USERINFO_ENDPOINT)
            .bearer_auth(&token.access_token)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "userinfo request failed");
                AppError::internal("Identity provider unreachable", json!({}))
            })?
            .json()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "malformed userinfo response");
                AppError::internal("Identity provider returned malformed response", json!({}))
            })?;

        let access_token = token.access_token.clone();
        let token_data = serde_json::to_value(&token).unwrap_or_else(|_| json!({}));

        Ok(ProviderIdentity {
            provider_id: user.id,
            email: user.email,
            given_name: user.given_name,
            family_name: user.family_name,
            avatar_url: user.picture,
            access_token,
            token_data,
        })
    }
}
