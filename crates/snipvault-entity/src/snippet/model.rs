//! Snippet entity model.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use snipvault_core::types::{FolderId, OwnerId, SnippetId};

use super::history::EditHistoryEntry;

/// A code snippet owned by a single user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snippet {
    /// Unique snippet identifier.
    pub id: SnippetId,
    /// The identity namespace the snippet lives under.
    pub owner_id: OwnerId,
    /// Display title.
    pub title: String,
    /// Raw snippet text.
    pub content: String,
    /// Short language tag (e.g. `rust`, `python`).
    pub language: String,
    /// Whether `language` came from the heuristic rather than the caller.
    #[serde(default)]
    pub auto_detected: bool,
    /// Optional free-form description.
    #[serde(default)]
    pub description: Option<String>,
    /// Tag set.
    #[serde(default)]
    pub tags: BTreeSet<String>,
    /// Containing folder (null for root).
    #[serde(default)]
    pub folder_id: Option<FolderId>,
    /// Soft-delete flag.
    #[serde(default)]
    pub is_deleted: bool,
    /// Set iff `is_deleted`.
    #[serde(default)]
    pub deleted_at: Option<DateTime<Utc>>,
    /// User-visible version, starting at 1.
    pub current_version: u64,
    /// Append-only edit log.
    #[serde(default)]
    pub edit_history: Vec<EditHistoryEntry>,
    /// Identities that have successfully written to this snippet.
    #[serde(default)]
    pub collaborators: BTreeSet<OwnerId>,
    /// When the snippet was created.
    pub created_at: DateTime<Utc>,
    /// When the snippet was last written.
    pub updated_at: DateTime<Utc>,
}

impl Snippet {
    /// Check if the snippet is live (not in the trash).
    pub fn is_active(&self) -> bool {
        !self.is_deleted
    }

    /// The folder whose counter includes this snippet, if any.
    pub fn counted_folder(&self) -> Option<FolderId> {
        if self.is_active() {
            self.folder_id
        } else {
            None
        }
    }

    /// Move the snippet to the trash, re-stamping `deleted_at` if already there.
    ///
    /// Only the trash fields change, so a later `restore` yields the snippet
    /// exactly as it was before deletion.
    pub fn soft_delete(&mut self, now: DateTime<Utc>) {
        self.is_deleted = true;
        self.deleted_at = Some(now);
    }

    /// Bring the snippet back out of the trash.
    pub fn restore(&mut self) {
        self.is_deleted = false;
        self.deleted_at = None;
    }

    /// Record an identity as a collaborator. Returns `false` if already present.
    pub fn add_collaborator(&mut self, owner_id: &OwnerId) -> bool {
        self.collaborators.insert(owner_id.clone())
    }

    /// Title used when the caller supplies none.
    pub fn synthesized_title(now: DateTime<Utc>) -> String {
        format!("Snippet {}", now.format("%Y-%m-%d %H:%M:%S"))
    }
}

/// Data required to create a new snippet.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateSnippet {
    /// Optional title (synthesized when absent or blank).
    #[serde(default)]
    pub title: Option<String>,
    /// Snippet body (required, non-empty).
    #[serde(default)]
    pub content: Option<String>,
    /// Explicit language tag; detected from content when absent.
    #[serde(default)]
    pub language: Option<String>,
    /// Target folder (None for root).
    #[serde(default)]
    pub folder_id: Option<FolderId>,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
    /// Initial tags.
    #[serde(default)]
    pub tags: BTreeSet<String>,
}

/// Which folder a snippet listing is restricted to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FolderScope {
    /// Every folder, root included.
    #[default]
    Any,
    /// Only snippets without a folder.
    Root,
    /// Only snippets in the given folder.
    Folder(FolderId),
}

/// A snippet annotated for the trash listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrashedSnippet {
    /// The trashed snippet.
    #[serde(flatten)]
    pub snippet: Snippet,
    /// Current name of the containing folder, or a placeholder.
    pub folder_name: String,
}

impl TrashedSnippet {
    /// Placeholder for snippets without a folder.
    pub const ROOT_FOLDER_NAME: &'static str = "Root";
    /// Placeholder when the folder lookup fails or the folder is gone.
    pub const UNKNOWN_FOLDER_NAME: &'static str = "Unknown folder";
}
