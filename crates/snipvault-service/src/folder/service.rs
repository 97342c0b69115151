//! Folder CRUD, cascading deletion, and counter maintenance.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info, warn};

use snipvault_core::config::StoreConfig;
use snipvault_core::error::{AppError, ErrorKind};
use snipvault_core::result::AppResult;
use snipvault_core::traits::DocumentStore;
use snipvault_core::types::{FolderId, OwnerId};
use snipvault_database::repositories::{FolderRepository, SnippetRepository, Versioned};
use snipvault_entity::folder::{CreateFolder, DEFAULT_FOLDER_COLOR, Folder, UpdateFolder};
use snipvault_entity::snippet::FolderScope;

use crate::context::RequestContext;

/// Manages folder CRUD operations.
#[derive(Debug, Clone)]
pub struct FolderService {
    /// Backend used for atomic batches.
    store: Arc<dyn DocumentStore>,
    /// Folder repository.
    folders: FolderRepository,
    /// Snippet repository.
    snippets: SnippetRepository,
    /// Compare-and-swap attempts per write.
    max_attempts: u32,
}

impl FolderService {
    /// Creates a new folder service.
    pub fn new(store: Arc<dyn DocumentStore>, store_config: &StoreConfig) -> Self {
        Self {
            folders: FolderRepository::new(Arc::clone(&store)),
            snippets: SnippetRepository::new(Arc::clone(&store)),
            max_attempts: store_config.max_cas_retries.max(1),
            store,
        }
    }

    /// Creates a new folder.
    pub async fn create_folder(&self, ctx: &RequestContext, req: CreateFolder) -> AppResult<Folder> {
        let name = req.name.trim();
        if name.is_empty() {
            return Err(AppError::validation("Folder name cannot be empty"));
        }

        let now = ctx.request_time;
        let folder = Folder {
            id: FolderId::new(),
            owner_id: ctx.owner_id.clone(),
            name: name.to_string(),
            color: req
                .color
                .filter(|c| !c.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_FOLDER_COLOR.to_string()),
            description: req.description,
            is_deleted: false,
            snippet_count: 0,
            created_at: now,
            updated_at: now,
        };

        self.store
            .batch(vec![FolderRepository::put_op(&folder, 0)?])
            .await?;

        info!(owner_id = %ctx.owner_id, folder_id = %folder.id, name = %folder.name, "Folder created");
        Ok(folder)
    }

    /// Merges the supplied fields over an existing folder.
    pub async fn update_folder(
        &self,
        ctx: &RequestContext,
        folder_id: FolderId,
        req: UpdateFolder,
    ) -> AppResult<Folder> {
        if req.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err(AppError::validation("Folder name cannot be empty"));
        }

        for attempt in 1..=self.max_attempts {
            let current = self.load_active(&ctx.owner_id, folder_id).await?;
            let mut folder = current.value;
            folder.apply(req.clone(), ctx.request_time);

            match self
                .store
                .batch(vec![FolderRepository::put_op(&folder, current.revision)?])
                .await
            {
                Ok(()) => {
                    info!(owner_id = %ctx.owner_id, folder_id = %folder_id, "Folder updated");
                    return Ok(folder);
                }
                Err(e) if e.is(ErrorKind::PreconditionFailed) => {
                    debug!(folder_id = %folder_id, attempt, "Lost folder update race, retrying");
                }
                Err(e) => return Err(e),
            }
        }

        Err(retries_exhausted(folder_id))
    }

    /// Lists active folders with a live-computed `snippet_count`.
    pub async fn list_folders(&self, ctx: &RequestContext) -> AppResult<Vec<Folder>> {
        let tallies = self.live_counts(&ctx.owner_id).await?;
        let folders = self.folders.find_active(&ctx.owner_id).await?;

        Ok(folders
            .into_iter()
            .map(|v| {
                let mut folder = v.value;
                folder.snippet_count = tallies.get(&folder.id).copied().unwrap_or(0);
                folder
            })
            .collect())
    }

    /// Marks a folder deleted and, in the same atomic batch, either moves its
    /// active snippets to root or sends them to the trash.
    ///
    /// Returns the number of snippets affected.
    pub async fn delete_folder(
        &self,
        ctx: &RequestContext,
        folder_id: FolderId,
        move_snippets_to_root: bool,
    ) -> AppResult<usize> {
        for attempt in 1..=self.max_attempts {
            let current = self.load_active(&ctx.owner_id, folder_id).await?;
            let members = self
                .snippets
                .find_active_in_folder(&ctx.owner_id, folder_id)
                .await?;

            let now = ctx.request_time;
            let mut folder = current.value;
            folder.is_deleted = true;
            folder.snippet_count = 0;
            folder.updated_at = now;

            let mut writes = Vec::with_capacity(members.len() + 1);
            writes.push(FolderRepository::put_op(&folder, current.revision)?);
            for member in &members {
                let mut snippet = member.value.clone();
                if move_snippets_to_root {
                    snippet.folder_id = None;
                    snippet.updated_at = now;
                } else {
                    snippet.soft_delete(now);
                }
                writes.push(SnippetRepository::put_op(&snippet, member.revision)?);
            }

            match self.store.batch(writes).await {
                Ok(()) => {
                    info!(
                        owner_id = %ctx.owner_id,
                        folder_id = %folder_id,
                        affected = members.len(),
                        move_snippets_to_root,
                        "Folder deleted"
                    );
                    return Ok(members.len());
                }
                Err(e) if e.is(ErrorKind::PreconditionFailed) => {
                    debug!(folder_id = %folder_id, attempt, "Lost folder delete race, retrying");
                }
                Err(e) => return Err(e),
            }
        }

        Err(retries_exhausted(folder_id))
    }

    /// Adds `delta` to a folder's stored counter; `None` is a no-op.
    ///
    /// Standalone entry point for ad hoc corrections. Snippet lifecycle
    /// operations never call this: their counter moves ride in the same
    /// guarded batch as the membership change. Failures are logged, not
    /// surfaced. Returns the new value on success.
    pub async fn adjust_count(
        &self,
        ctx: &RequestContext,
        folder_id: Option<FolderId>,
        delta: i64,
    ) -> Option<i64> {
        let folder_id = folder_id?;
        match self
            .folders
            .adjust_count(&ctx.owner_id, folder_id, delta)
            .await
        {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(folder_id = %folder_id, delta, error = %e, "Folder counter adjustment failed");
                None
            }
        }
    }

    /// Rewrites every active folder's stored counter to the live count.
    ///
    /// Returns how many folders were corrected. A folder written concurrently
    /// is skipped and left for the next run.
    pub async fn reconcile_counts(&self, ctx: &RequestContext) -> AppResult<usize> {
        let tallies = self.live_counts(&ctx.owner_id).await?;
        let folders = self.folders.find_active(&ctx.owner_id).await?;
        let mut corrected = 0;

        for Versioned { value, revision } in folders {
            let live = tallies.get(&value.id).copied().unwrap_or(0);
            if value.snippet_count == live {
                continue;
            }

            let mut folder = value;
            let stored = folder.snippet_count;
            folder.snippet_count = live;
            match self
                .store
                .batch(vec![FolderRepository::put_op(&folder, revision)?])
                .await
            {
                Ok(()) => {
                    info!(folder_id = %folder.id, stored, live, "Folder counter reconciled");
                    corrected += 1;
                }
                Err(e) if e.is(ErrorKind::PreconditionFailed) => {
                    debug!(folder_id = %folder.id, "Folder changed during reconcile, skipping");
                }
                Err(e) => return Err(e),
            }
        }

        Ok(corrected)
    }

    async fn live_counts(&self, owner_id: &OwnerId) -> AppResult<HashMap<FolderId, i64>> {
        let active = self.snippets.find_active(owner_id, FolderScope::Any).await?;
        let mut tallies = HashMap::new();
        for folder_id in active.into_iter().filter_map(|s| s.folder_id) {
            *tallies.entry(folder_id).or_insert(0) += 1;
        }
        Ok(tallies)
    }

    async fn load_active(
        &self,
        owner_id: &OwnerId,
        folder_id: FolderId,
    ) -> AppResult<Versioned<Folder>> {
        self.folders
            .find_active_by_id(owner_id, folder_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Folder {folder_id} not found")))
    }
}

fn retries_exhausted(folder_id: FolderId) -> AppError {
    AppError::conflict(format!(
        "Folder {folder_id} is being modified concurrently; refetch and retry"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Harness;

    #[tokio::test]
    async fn test_create_defaults_and_validation() {
        let h = Harness::new();
        let ctx = Harness::ctx("alice");

        let folder = h
            .folders
            .create_folder(
                &ctx,
                CreateFolder {
                    name: "  work  ".to_string(),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(folder.name, "work");
        assert_eq!(folder.color, DEFAULT_FOLDER_COLOR);
        assert_eq!(folder.snippet_count, 0);

        let err = h
            .folders
            .create_folder(
                &ctx,
                CreateFolder {
                    name: "   ".to_string(),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_update_merges_fields() {
        let h = Harness::new();
        let ctx = Harness::ctx("alice");
        let folder = h.folder(&ctx, "work").await;

        let updated = h
            .folders
            .update_folder(
                &ctx,
                folder.id,
                UpdateFolder {
                    color: Some("#ff0000".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.name, "work");
        assert_eq!(updated.color, "#ff0000");

        let err = h
            .folders
            .update_folder(&ctx, FolderId::new(), UpdateFolder::default())
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_list_counts_live() {
        let h = Harness::new();
        let ctx = Harness::ctx("alice");
        let folder = h.folder(&ctx, "work").await;
        let snippet = h.snippet(&ctx, "x = 1", Some(folder.id)).await;
        h.snippet(&ctx, "y = 2", None).await;

        let listed = h.folders.list_folders(&ctx).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].snippet_count, 1);
        assert_eq!(h.stored_count(&ctx, folder.id).await, 1);

        h.snippets.delete_snippet(&ctx, snippet.id).await.unwrap();
        let listed = h.folders.list_folders(&ctx).await.unwrap();
        assert_eq!(listed[0].snippet_count, 0);
    }

    #[tokio::test]
    async fn test_delete_moves_members_to_root() {
        let h = Harness::new();
        let ctx = Harness::ctx("alice");
        let folder = h.folder(&ctx, "work").await;
        for i in 0..3 {
            h.snippet(&ctx, &format!("x = {i}"), Some(folder.id)).await;
        }

        let affected = h.folders.delete_folder(&ctx, folder.id, true).await.unwrap();
        assert_eq!(affected, 3);

        let root = h.snippets.list_snippets(&ctx, FolderScope::Root).await.unwrap();
        assert_eq!(root.len(), 3);
        assert!(root.iter().all(|s| s.is_active() && s.current_version == 1));
        assert!(h.folders.list_folders(&ctx).await.unwrap().is_empty());
        assert_eq!(h.stored_count(&ctx, folder.id).await, 0);
    }

    #[tokio::test]
    async fn test_delete_trashes_members() {
        let h = Harness::new();
        let ctx = Harness::ctx("alice");
        let folder = h.folder(&ctx, "work").await;
        for i in 0..3 {
            h.snippet(&ctx, &format!("x = {i}"), Some(folder.id)).await;
        }
        let outside = h.snippet(&ctx, "y = 1", None).await;

        let affected = h.folders.delete_folder(&ctx, folder.id, false).await.unwrap();
        assert_eq!(affected, 3);

        let active = h.snippets.list_snippets(&ctx, FolderScope::Any).await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, outside.id);

        let trash = h.snippets.list_trash(&ctx).await.unwrap();
        assert_eq!(trash.len(), 3);
        assert!(trash.iter().all(|t| t.folder_name == "work" && t.snippet.deleted_at.is_some()));

        let err = h.folders.delete_folder(&ctx, folder.id, false).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_adjust_count() {
        let h = Harness::new();
        let ctx = Harness::ctx("alice");
        let folder = h.folder(&ctx, "work").await;

        assert_eq!(h.folders.adjust_count(&ctx, None, 1).await, None);
        assert_eq!(h.folders.adjust_count(&ctx, Some(folder.id), 2).await, Some(2));
        assert_eq!(h.folders.adjust_count(&ctx, Some(folder.id), -1).await, Some(1));
    }

    #[tokio::test]
    async fn test_reconcile_repairs_drift() {
        let h = Harness::new();
        let ctx = Harness::ctx("alice");
        let drifted = h.folder(&ctx, "drifted").await;
        let healthy = h.folder(&ctx, "healthy").await;
        h.snippet(&ctx, "x = 1", Some(drifted.id)).await;
        h.snippet(&ctx, "y = 2", Some(healthy.id)).await;
        h.folders.adjust_count(&ctx, Some(drifted.id), 5).await;

        assert_eq!(h.stored_count(&ctx, drifted.id).await, 6);
        assert_eq!(h.folders.reconcile_counts(&ctx).await.unwrap(), 1);
        assert_eq!(h.stored_count(&ctx, drifted.id).await, 1);
        assert_eq!(h.stored_count(&ctx, healthy.id).await, 1);
        assert_eq!(h.folders.reconcile_counts(&ctx).await.unwrap(), 0);
    }
}
