//! Folder repository implementation.

use std::sync::Arc;

use snipvault_core::result::AppResult;
use snipvault_core::traits::document_store::{BatchWrite, DocumentFilter, DocumentKey, DocumentStore};
use snipvault_core::types::{FolderId, OwnerId};
use snipvault_entity::folder::Folder;

use super::{Versioned, decode, encode};

/// Repository for folder documents and their snippet counters.
#[derive(Debug, Clone)]
pub struct FolderRepository {
    store: Arc<dyn DocumentStore>,
}

impl FolderRepository {
    /// Collection holding folder documents.
    pub const COLLECTION: &'static str = "folders";
    /// Counter field maintained by increments.
    pub const COUNT_FIELD: &'static str = "snippet_count";

    /// Create a new folder repository.
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Document key for a folder.
    pub fn key(owner_id: &OwnerId, id: FolderId) -> DocumentKey {
        DocumentKey::new(owner_id.clone(), Self::COLLECTION, id)
    }

    /// Find a folder by ID (deleted folders included).
    pub async fn find_by_id(
        &self,
        owner_id: &OwnerId,
        id: FolderId,
    ) -> AppResult<Option<Versioned<Folder>>> {
        self.store
            .get(&Self::key(owner_id, id))
            .await?
            .map(decode)
            .transpose()
    }

    /// Find a folder only if it exists and is not deleted.
    pub async fn find_active_by_id(
        &self,
        owner_id: &OwnerId,
        id: FolderId,
    ) -> AppResult<Option<Versioned<Folder>>> {
        Ok(self
            .find_by_id(owner_id, id)
            .await?
            .filter(|f| f.value.is_active()))
    }

    /// List non-deleted folders, with revisions for conditional writes.
    pub async fn find_active(&self, owner_id: &OwnerId) -> AppResult<Vec<Versioned<Folder>>> {
        let filter = DocumentFilter::all().eq("is_deleted", false);
        self.store
            .query(owner_id, Self::COLLECTION, &filter)
            .await?
            .into_iter()
            .map(decode)
            .collect()
    }

    /// Atomically add `delta` to a folder's counter. Returns the new value.
    pub async fn adjust_count(
        &self,
        owner_id: &OwnerId,
        id: FolderId,
        delta: i64,
    ) -> AppResult<i64> {
        self.store
            .increment(&Self::key(owner_id, id), Self::COUNT_FIELD, delta)
            .await
    }

    /// Conditional write of a folder read at `revision` (0 = insert).
    pub fn put_op(folder: &Folder, revision: u64) -> AppResult<BatchWrite> {
        Ok(BatchWrite::SetIfRevision {
            key: Self::key(&folder.owner_id, folder.id),
            data: encode(folder)?,
            expected_revision: revision,
        })
    }

    /// Counter increment to place in the same batch as a membership change.
    pub fn count_op(owner_id: &OwnerId, id: FolderId, delta: i64) -> BatchWrite {
        BatchWrite::Increment {
            key: Self::key(owner_id, id),
            field: Self::COUNT_FIELD.to_string(),
            delta,
        }
    }
}
