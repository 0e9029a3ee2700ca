//! User entity and credential verification.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordVerifier},
};
use serde_json::json;
use uuid::Uuid;

use crate::error::AppError;

/// Credential provider for locally registered users.
pub const PROVIDER_PASSWORD: &str = "password";

/// Credential provider for Google OAuth identities.
pub const PROVIDER_GOOGLE: &str = "google";

/// A credential bound to a user.
///
/// Either an Argon2 password hash (provider `password`) or an opaque value
/// from an external identity provider. A user holds at most one credential
/// per provider binding.
#[derive(Debug, Clone)]
pub struct UserAuth {
    pub value: String,
    pub provider: String,
}

impl UserAuth {
    /// Verifies a plaintext password against this credential.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthenticated`] when the credential is not a
    /// password credential or the password does not match. Both cases are
    /// outwardly identical; the internal cause is logged by the caller.
    pub fn verify_password(&self, password: &str) -> Result<(), AppError> {
        if self.provider != PROVIDER_PASSWORD {
            return Err(AppError::unauthenticated(
                "Invalid credentials",
                json!({ "reason": "not a password credential" }),
            ));
        }

        let parsed = PasswordHash::new(&self.value).map_err(|e| {
            tracing::error!(error = %e, "stored password hash is malformed");
            AppError::internal("Credential verification failed", json!({}))
        })?;

        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .map_err(|_| {
                AppError::unauthenticated("Invalid credentials", json!({ "reason": "mismatch" }))
            })
    }
}

/// A registered user.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub given_name: Option<String>,
    pub family_name: Option<String>,
    pub email: String,
    pub avatar_url: Option<String>,
    auth: Option<UserAuth>,
}

impl User {
    /// Assembles a user entity from its profile fields and credential.
    pub fn new(
        id: Uuid,
        given_name: Option<String>,
        family_name: Option<String>,
        email: String,
        avatar_url: Option<String>,
        auth: Option<UserAuth>,
    ) -> Self {
        Self {
            id,
            given_name,
            family_name,
            email,
            avatar_url,
            auth,
        }
    }

    /// Verifies a plaintext password against the user's credential.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthenticated`] when the user has no credential,
    /// the credential is not a password, or the password does not match.
    pub fn verify_password(&self, password: &str) -> Result<(), AppError> {
        match &self.auth {
            Some(auth) => auth.verify_password(password),
            None => Err(AppError::unauthenticated(
                "Invalid credentials",
                json!({ "reason": "no credential on record" }),
            )),
        }
    }
}
