//! Share link entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use snipvault_core::types::{OwnerId, ShareLinkId, SnippetId};

/// A persisted, expiring read-only link to one snippet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShareLink {
    /// Unique link identifier.
    pub id: ShareLinkId,
    /// URL-safe random token used in the public path.
    pub token: String,
    /// Owner of the shared snippet.
    pub owner_id: OwnerId,
    /// The shared snippet.
    pub snippet_id: SnippetId,
    /// When the link was created.
    pub created_at: DateTime<Utc>,
    /// When the link stops resolving.
    pub expires_at: DateTime<Utc>,
}

impl ShareLink {
    /// Check whether the link has expired at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}
