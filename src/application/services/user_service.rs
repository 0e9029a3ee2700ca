//! User registration.

use std::sync::Arc;

use argon2::{
    Argon2,
    password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
};
use serde_json::json;

use crate::domain::entities::User;
use crate::domain::repositories::{NewPasswordUser, UserRepository};
use crate::error::AppError;

/// Input for registering a user with a password.
#[derive(Debug, Clone)]
pub struct RegisterUser {
    pub given_name: Option<String>,
    pub family_name: Option<String>,
    pub email: String,
    pub password: String,
}

/// Service for registering password-credentialed users.
///
/// Hashing happens here, in the application layer; repositories only ever
/// see the Argon2 PHC string.
pub struct UserService<U: UserRepository> {
    user_repository: Arc<U>,
}

impl<U: UserRepository> UserService<U> {
    /// Creates a new user service.
    pub fn new(user_repository: Arc<U>) -> Self {
        Self { user_repository }
    }

    /// Registers a user with a password credential.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] when the email is already registered,
    /// [`AppError::Internal`] on hashing or store failure.
    pub async fn register(&self, args: RegisterUser) -> Result<User, AppError> {
        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default()
            .hash_password(args.password.as_bytes(), &salt)
            .map_err(|e| {
                tracing::error!(error = %e, "password hashing failed");
                AppError::internal("Failed to hash password", json!({}))
            })?
            .to_string();

        self.user_repository
            .create_password_user(NewPasswordUser {
                given_name: args.given_name,
                family_name: args.family_name,
                email: args.email,
                password_hash,
            })
            .await
    }
}
