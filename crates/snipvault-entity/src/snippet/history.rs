//! Snippet edit history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use snipvault_core::types::OwnerId;

/// Note attached to the first history entry.
pub const NOTE_INITIAL: &str = "Initial creation";
/// Note attached to every later content-bearing update.
pub const NOTE_UPDATED: &str = "Updated by user";

/// One entry of a snippet's append-only edit log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditHistoryEntry {
    /// The `current_version` this entry produced.
    pub version: u64,
    /// Snippet content after the edit.
    pub content: String,
    /// Who made the edit.
    pub edited_by: OwnerId,
    /// When the edit was accepted.
    pub edited_at: DateTime<Utc>,
    /// Short human-readable note.
    pub note: String,
    /// Version mismatch recorded by the `version` conflict mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conflict_note: Option<ConflictNote>,
}

/// Audit record of a detected and overridden version conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictNote {
    /// The stale version the client believed it was editing.
    pub client_version: u64,
    /// The version actually stored when the write arrived.
    pub server_version: u64,
}
