//! User session entity.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// An issued session credential bound to a user.
///
/// A session is valid iff `expired_by_user` is false and the current time is
/// before `expires_at`. Rows are never physically removed by this subsystem;
/// revocation flips `expired_by_user` and passive expiry is purely time-based.
#[derive(Debug, Clone)]
pub struct UserSession {
    pub id: Uuid,
    pub user_id: Uuid,
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub expired_by_user: bool,
}

impl UserSession {
    /// Evaluates the expiry invariant at call time.
    ///
    /// Expiry is checked here, not pre-filtered by storage: a lazily-expired
    /// but unrevoked row still exists in the store and must be rejected.
    pub fn is_expired(&self) -> bool {
        if self.expired_by_user {
            return true;
        }
        Utc::now() >= self.expires_at
    }
}
