//! Partial snippet updates.

use std::collections::BTreeSet;

use serde::{Deserialize, Deserializer, Serialize};
use snipvault_core::types::FolderId;

/// Fields an update may change. Absent fields keep their stored values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SnippetPatch {
    /// New title.
    #[serde(default)]
    pub title: Option<String>,
    /// New content.
    #[serde(default)]
    pub content: Option<String>,
    /// Explicit language tag.
    #[serde(default)]
    pub language: Option<String>,
    /// Folder move: absent = keep, `null` = root, id = that folder.
    #[serde(
        default,
        deserialize_with = "deserialize_some",
        skip_serializing_if = "Option::is_none"
    )]
    pub folder_id: Option<Option<FolderId>>,
    /// New description.
    #[serde(default)]
    pub description: Option<String>,
    /// Replacement tag set.
    #[serde(default)]
    pub tags: Option<BTreeSet<String>>,
}

impl SnippetPatch {
    /// True when the patch only reassigns the folder.
    pub fn is_move_only(&self) -> bool {
        self.folder_id.is_some()
            && self.title.is_none()
            && self.content.is_none()
            && self.language.is_none()
            && self.description.is_none()
            && self.tags.is_none()
    }
}

/// Distinguishes an explicit `null` from a missing field.
fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_folder_field_tristate() {
        let absent: SnippetPatch = serde_json::from_value(json!({})).expect("parse");
        assert_eq!(absent.folder_id, None);

        let root: SnippetPatch =
            serde_json::from_value(json!({ "folder_id": null })).expect("parse");
        assert_eq!(root.folder_id, Some(None));

        let id = FolderId::new();
        let moved: SnippetPatch =
            serde_json::from_value(json!({ "folder_id": id.to_string() })).expect("parse");
        assert_eq!(moved.folder_id, Some(Some(id)));
    }

    #[test]
    fn test_move_only() {
        let patch = SnippetPatch {
            folder_id: Some(None),
            ..Default::default()
        };
        assert!(patch.is_move_only());

        let patch = SnippetPatch {
            folder_id: Some(None),
            title: Some("renamed".into()),
            ..Default::default()
        };
        assert!(!patch.is_move_only());
        assert!(!SnippetPatch::default().is_move_only());
    }
}
