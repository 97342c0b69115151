//! Folder entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use snipvault_core::types::{FolderId, OwnerId};

/// Color given to folders created without one.
pub const DEFAULT_FOLDER_COLOR: &str = "#6366f1";

/// A flat, single-level folder grouping snippets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Folder {
    /// Unique folder identifier.
    pub id: FolderId,
    /// The folder owner.
    pub owner_id: OwnerId,
    /// Folder name.
    pub name: String,
    /// Display color.
    pub color: String,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
    /// Soft-delete flag. Terminal: folders are never restored.
    #[serde(default)]
    pub is_deleted: bool,
    /// Stored count of active snippets in this folder.
    #[serde(default)]
    pub snippet_count: i64,
    /// When the folder was created.
    pub created_at: DateTime<Utc>,
    /// When the folder was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Folder {
    /// Check if the folder has not been deleted.
    pub fn is_active(&self) -> bool {
        !self.is_deleted
    }

    /// Merge the supplied fields over this folder.
    pub fn apply(&mut self, update: UpdateFolder, now: DateTime<Utc>) {
        if let Some(name) = update.name {
            self.name = name.trim().to_string();
        }
        if let Some(color) = update.color {
            self.color = color;
        }
        if let Some(description) = update.description {
            self.description = Some(description);
        }
        self.updated_at = now;
    }
}

/// Data required to create a new folder.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateFolder {
    /// Folder name (must not be blank).
    pub name: String,
    /// Display color; defaults to [`DEFAULT_FOLDER_COLOR`].
    #[serde(default)]
    pub color: Option<String>,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
}

/// Fields a folder update may change.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateFolder {
    /// New name.
    #[serde(default)]
    pub name: Option<String>,
    /// New color.
    #[serde(default)]
    pub color: Option<String>,
    /// New description.
    #[serde(default)]
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_keeps_unspecified_fields() {
        let now = Utc::now();
        let mut folder = Folder {
            id: FolderId::new(),
            owner_id: OwnerId::new("alice"),
            name: "Work".to_string(),
            color: DEFAULT_FOLDER_COLOR.to_string(),
            description: Some("day job".to_string()),
            is_deleted: false,
            snippet_count: 4,
            created_at: now,
            updated_at: now,
        };

        folder.apply(
            UpdateFolder {
                name: Some("  Office ".to_string()),
                ..Default::default()
            },
            now,
        );

        assert_eq!(folder.name, "Office");
        assert_eq!(folder.color, DEFAULT_FOLDER_COLOR);
        assert_eq!(folder.description.as_deref(), Some("day job"));
        assert_eq!(folder.snippet_count, 4);
    }
}
