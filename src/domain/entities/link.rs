//! Link entity representing a shortened URL mapping.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A shortened URL with its lifecycle flags.
///
/// The slug is globally unique and immutable after creation. Links are never
/// physically deleted; deactivation flips `active`, and `quarantined` holds a
/// link pending abuse review without altering its stored data.
#[derive(Debug, Clone)]
pub struct Link {
    pub id: Uuid,
    pub slug: String,
    pub destination_url: String,
    pub created_by: Uuid,
    pub updated_by: Uuid,
    pub active: bool,
    pub quarantined: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Link {
    /// True when the link may serve redirects, before blocklist checks.
    pub fn is_redirectable(&self) -> bool {
        self.active && !self.quarantined
    }
}

/// Input data for creating a new link.
#[derive(Debug, Clone)]
pub struct NewLink {
    pub slug: String,
    pub destination_url: String,
    pub created_by: Uuid,
}

/// Partial update for an existing link.
///
/// `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct LinkUpdate {
    pub destination_url: Option<String>,
    pub active: Option<bool>,
}

/// Snapshot of a link's state immediately before an update.
///
/// Written exactly once per successful update, inside the same transaction,
/// and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct LinkHistoryEntry {
    pub id: Uuid,
    pub link_id: Uuid,
    pub destination_url: String,
    pub active: bool,
    pub quarantined: bool,
    pub created_by: Uuid,
    pub updated_by: Uuid,
    pub created_at: DateTime<Utc>,
}
