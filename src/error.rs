//! Application error taxonomy and HTTP mapping.
//!
//! Every fallible operation in the crate returns [`AppError`]. Validation and
//! policy errors carry a cause-specific code so API callers can correct their
//! input; infrastructure failures collapse to a generic `internal_error`
//! response and are only detailed in server-side logs.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};
use thiserror::Error;

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Wire representation of an error, embedded in JSON responses.
#[derive(Debug, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

#[derive(Debug, Error)]
pub enum AppError {
    /// Request payload failed validation.
    #[error("{message}")]
    Validation { message: String, details: Value },
    /// Destination URL could not be parsed or has no host.
    #[error("{message}")]
    InvalidUrl { message: String, details: Value },
    /// Destination URL uses a scheme other than https.
    #[error("{message}")]
    InvalidUrlProtocol { message: String, details: Value },
    /// Requested entity does not exist (or is hidden by policy).
    #[error("{message}")]
    NotFound { message: String, details: Value },
    /// Uniqueness violation (slug, email).
    #[error("{message}")]
    Conflict { message: String, details: Value },
    /// Destination domain is on the blocklist.
    #[error("{message}")]
    BlockedDomain { message: String, details: Value },
    /// Acting user is on the blocklist.
    #[error("{message}")]
    BlockedUser { message: String, details: Value },
    /// No valid session bound to the request.
    #[error("{message}")]
    Unauthenticated { message: String, details: Value },
    /// Store or network failure, not attributable to caller input.
    #[error("{message}")]
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }
    pub fn invalid_url(message: impl Into<String>, details: Value) -> Self {
        Self::InvalidUrl {
            message: message.into(),
            details,
        }
    }
    pub fn invalid_url_protocol(message: impl Into<String>, details: Value) -> Self {
        Self::InvalidUrlProtocol {
            message: message.into(),
            details,
        }
    }
    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }
    pub fn conflict(message: impl Into<String>, details: Value) -> Self {
        Self::Conflict {
            message: message.into(),
            details,
        }
    }
    pub fn blocked_domain(message: impl Into<String>, details: Value) -> Self {
        Self::BlockedDomain {
            message: message.into(),
            details,
        }
    }
    pub fn blocked_user(message: impl Into<String>, details: Value) -> Self {
        Self::BlockedUser {
            message: message.into(),
            details,
        }
    }
    pub fn unauthenticated(message: impl Into<String>, details: Value) -> Self {
        Self::Unauthenticated {
            message: message.into(),
            details,
        }
    }
    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }

    /// True for uniqueness violations, used by the slug retry loop.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }

    fn parts(self) -> (StatusCode, &'static str, String, Value) {
        match self {
            Self::Validation { message, details } => (
                StatusCode::BAD_REQUEST,
                "validation_error",
                message,
                details,
            ),
            Self::InvalidUrl { message, details } => {
                (StatusCode::BAD_REQUEST, "invalid_url", message, details)
            }
            Self::InvalidUrlProtocol { message, details } => (
                StatusCode::BAD_REQUEST,
                "invalid_url_protocol",
                message,
                details,
            ),
            Self::NotFound { message, details } => {
                (StatusCode::NOT_FOUND, "not_found", message, details)
            }
            Self::Conflict { message, details } => {
                (StatusCode::CONFLICT, "conflict", message, details)
            }
            Self::BlockedDomain { message, details } => {
                (StatusCode::FORBIDDEN, "blocked_domain", message, details)
            }
            Self::BlockedUser { message, details } => {
                (StatusCode::FORBIDDEN, "blocked_user", message, details)
            }
            Self::Unauthenticated { message, details } => (
                StatusCode::UNAUTHORIZED,
                "unauthenticated",
                message,
                details,
            ),
            // Internal causes are logged where they occur, never returned.
            Self::Internal { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "Internal server error".to_string(),
                json!({}),
            ),
        }
    }

    /// Converts into the wire representation used in JSON bodies.
    pub fn to_error_info(self) -> ErrorInfo {
        let (_, code, message, details) = self.parts();
        ErrorInfo {
            code,
            message,
            details,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = self.parts();

        let body = ErrorBody {
            error: ErrorInfo {
                code,
                message,
                details,
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Maps low-level sqlx errors into the application taxonomy.
///
/// Unique-constraint violations become [`AppError::Conflict`] with the
/// constraint name attached, so callers can distinguish a slug collision
/// (retryable) or a duplicate email (surfaced to the actor) from plain
/// infrastructure failure.
pub fn map_sqlx_error(e: sqlx::Error) -> AppError {
    if let Some(db) = e.as_database_error() {
        if db.is_unique_violation() {
            return AppError::conflict(
                "Unique constraint violation",
                json!({ "constraint": db.constraint() }),
            );
        }
    }

    tracing::error!(error = %e, "database error");
    AppError::internal("Database error", json!({}))
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        map_sqlx_error(e)
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        AppError::bad_request(
            "Request validation failed",
            serde_json::to_value(&e).unwrap_or_else(|_| json!({})),
        )
    }
}
