//! Snippet repository implementation.

use std::sync::Arc;

use serde_json::Value;

use snipvault_core::result::AppResult;
use snipvault_core::traits::document_store::{BatchWrite, DocumentFilter, DocumentKey, DocumentStore};
use snipvault_core::types::{FolderId, OwnerId, SnippetId};
use snipvault_entity::snippet::{FolderScope, Snippet};

use super::{Versioned, decode, encode};

/// Repository for snippet documents.
#[derive(Debug, Clone)]
pub struct SnippetRepository {
    store: Arc<dyn DocumentStore>,
}

impl SnippetRepository {
    /// Collection holding snippet documents.
    pub const COLLECTION: &'static str = "snippets";

    /// Create a new snippet repository.
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Document key for a snippet.
    pub fn key(owner_id: &OwnerId, id: SnippetId) -> DocumentKey {
        DocumentKey::new(owner_id.clone(), Self::COLLECTION, id)
    }

    /// Find a snippet by ID, with its store revision.
    pub async fn find_by_id(
        &self,
        owner_id: &OwnerId,
        id: SnippetId,
    ) -> AppResult<Option<Versioned<Snippet>>> {
        self.store
            .get(&Self::key(owner_id, id))
            .await?
            .map(decode)
            .transpose()
    }

    /// List non-deleted snippets, optionally restricted to one folder or root.
    pub async fn find_active(&self, owner_id: &OwnerId, scope: FolderScope) -> AppResult<Vec<Snippet>> {
        let mut filter = DocumentFilter::all().eq("is_deleted", false);
        filter = match scope {
            FolderScope::Any => filter,
            FolderScope::Root => filter.eq("folder_id", Value::Null),
            FolderScope::Folder(id) => filter.eq("folder_id", id.to_string()),
        };
        Ok(self
            .query(owner_id, &filter)
            .await?
            .into_iter()
            .map(|v| v.value)
            .collect())
    }

    /// Non-deleted snippets in a folder, with revisions for conditional writes.
    pub async fn find_active_in_folder(
        &self,
        owner_id: &OwnerId,
        folder_id: FolderId,
    ) -> AppResult<Vec<Versioned<Snippet>>> {
        let filter = DocumentFilter::all()
            .eq("is_deleted", false)
            .eq("folder_id", folder_id.to_string());
        self.query(owner_id, &filter).await
    }

    /// List trashed snippets.
    pub async fn find_trashed(&self, owner_id: &OwnerId) -> AppResult<Vec<Snippet>> {
        let filter = DocumentFilter::all().eq("is_deleted", true);
        Ok(self
            .query(owner_id, &filter)
            .await?
            .into_iter()
            .map(|v| v.value)
            .collect())
    }

    /// Conditional write of a snippet read at `revision` (0 = insert).
    pub fn put_op(snippet: &Snippet, revision: u64) -> AppResult<BatchWrite> {
        Ok(BatchWrite::SetIfRevision {
            key: Self::key(&snippet.owner_id, snippet.id),
            data: encode(snippet)?,
            expected_revision: revision,
        })
    }

    async fn query(
        &self,
        owner_id: &OwnerId,
        filter: &DocumentFilter,
    ) -> AppResult<Vec<Versioned<Snippet>>> {
        self.store
            .query(owner_id, Self::COLLECTION, filter)
            .await?
            .into_iter()
            .map(decode)
            .collect()
    }
}
