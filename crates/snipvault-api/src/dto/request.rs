//! Request DTOs with validation.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use validator::Validate;

use snipvault_core::error::AppError;
use snipvault_core::types::FolderId;
use snipvault_entity::folder::{CreateFolder, UpdateFolder};
use snipvault_entity::snippet::{CreateSnippet, FolderScope};

/// Create snippet request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateSnippetRequest {
    /// Optional title.
    #[validate(length(max = 200, message = "Title must be at most 200 characters"))]
    pub title: Option<String>,
    /// Snippet body.
    #[validate(required(message = "Content is required"))]
    pub content: Option<String>,
    /// Explicit language tag.
    #[validate(length(max = 50))]
    pub language: Option<String>,
    /// Containing folder.
    pub folder_id: Option<FolderId>,
    /// Free-form description.
    pub description: Option<String>,
    /// Tags.
    #[serde(default)]
    pub tags: BTreeSet<String>,
}

impl From<CreateSnippetRequest> for CreateSnippet {
    fn from(req: CreateSnippetRequest) -> Self {
        Self {
            title: req.title,
            content: req.content,
            language: req.language,
            folder_id: req.folder_id,
            description: req.description,
            tags: req.tags,
        }
    }
}

/// Query string of `GET /snippets`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListSnippetsQuery {
    /// A folder id, or `root` for snippets outside any folder.
    pub folder_id: Option<String>,
}

impl ListSnippetsQuery {
    /// Parse the folder filter.
    pub fn scope(&self) -> Result<FolderScope, AppError> {
        match self.folder_id.as_deref().map(str::trim) {
            None | Some("") => Ok(FolderScope::Any),
            Some(raw) if raw.eq_ignore_ascii_case("root") => Ok(FolderScope::Root),
            Some(raw) => raw
                .parse::<FolderId>()
                .map(FolderScope::Folder)
                .map_err(|_| AppError::validation(format!("Invalid folder_id '{raw}'"))),
        }
    }
}

/// Create folder request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateFolderRequest {
    /// Folder name.
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,
    /// Display color.
    #[validate(length(max = 32))]
    pub color: Option<String>,
    /// Description.
    pub description: Option<String>,
}

impl From<CreateFolderRequest> for CreateFolder {
    fn from(req: CreateFolderRequest) -> Self {
        Self {
            name: req.name,
            color: req.color,
            description: req.description,
        }
    }
}

/// Update folder request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateFolderRequest {
    /// New name.
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: Option<String>,
    /// New color.
    #[validate(length(max = 32))]
    pub color: Option<String>,
    /// New description.
    pub description: Option<String>,
}

impl From<UpdateFolderRequest> for UpdateFolder {
    fn from(req: UpdateFolderRequest) -> Self {
        Self {
            name: req.name,
            color: req.color,
            description: req.description,
        }
    }
}

/// Query string of `DELETE /folders/{id}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeleteFolderQuery {
    /// Move member snippets to root instead of trashing them.
    #[serde(default)]
    pub move_snippets_to_root: bool,
}

/// Create share link request body.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct CreateShareLinkRequest {
    /// Link lifetime in hours; the configured default when absent.
    #[validate(range(min = 1, max = 8760, message = "ttl_hours must be between 1 and 8760"))]
    pub ttl_hours: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(raw: Option<&str>) -> ListSnippetsQuery {
        ListSnippetsQuery {
            folder_id: raw.map(str::to_string),
        }
    }

    #[test]
    fn test_scope_parsing() {
        assert_eq!(query(None).scope().unwrap(), FolderScope::Any);
        assert_eq!(query(Some("root")).scope().unwrap(), FolderScope::Root);

        let id = FolderId::new();
        assert_eq!(
            query(Some(&id.to_string())).scope().unwrap(),
            FolderScope::Folder(id)
        );
        assert!(query(Some("nope")).scope().is_err());
    }

    #[test]
    fn test_create_folder_validation() {
        let req = CreateFolderRequest {
            name: String::new(),
            color: None,
            description: None,
        };
        assert!(req.validate().is_err());
    }
}
