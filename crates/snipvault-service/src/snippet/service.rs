//! Snippet lifecycle: create, read, update, soft-delete, restore, purge.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use snipvault_core::config::{SnippetConfig, StoreConfig};
use snipvault_core::error::{AppError, ErrorKind};
use snipvault_core::result::AppResult;
use snipvault_core::traits::{BatchWrite, DocumentStore, LanguageDetector};
use snipvault_core::types::{FolderId, OwnerId, SnippetId};
use snipvault_database::repositories::{
    FolderRepository, ShareLinkRepository, SnippetRepository, Versioned,
};
use snipvault_entity::folder::Folder;
use snipvault_entity::snippet::{
    ConflictMode, CreateSnippet, EditHistoryEntry, FolderScope, NOTE_INITIAL, Snippet,
};

use super::conflict::{ConflictInfo, ConflictPolicy, SnippetUpdate};
use crate::context::RequestContext;

/// Result of an accepted update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateOutcome {
    /// The snippet as persisted.
    pub snippet: Snippet,
    /// Present when a stale version was detected and overridden.
    pub conflict: Option<ConflictInfo>,
}

/// Manages snippet documents and keeps folder counters in step with them.
#[derive(Debug, Clone)]
pub struct SnippetService {
    /// Backend used for atomic batches.
    store: Arc<dyn DocumentStore>,
    /// Snippet repository.
    snippets: SnippetRepository,
    /// Folder repository.
    folders: FolderRepository,
    /// Share links to clean up on purge.
    links: ShareLinkRepository,
    /// Conflict resolution policy.
    policy: ConflictPolicy,
    /// Mode used when an update names none.
    default_mode: ConflictMode,
    /// Compare-and-swap attempts per write.
    max_attempts: u32,
}

impl SnippetService {
    /// Creates a new snippet service.
    pub fn new(
        store: Arc<dyn DocumentStore>,
        detector: Arc<dyn LanguageDetector>,
        snippet_config: &SnippetConfig,
        store_config: &StoreConfig,
    ) -> AppResult<Self> {
        let default_mode = snippet_config
            .default_conflict_mode
            .parse::<ConflictMode>()
            .map_err(AppError::configuration)?;

        Ok(Self {
            snippets: SnippetRepository::new(Arc::clone(&store)),
            folders: FolderRepository::new(Arc::clone(&store)),
            links: ShareLinkRepository::new(Arc::clone(&store)),
            policy: ConflictPolicy::new(detector, snippet_config.max_content_bytes),
            default_mode,
            max_attempts: store_config.max_cas_retries.max(1),
            store,
        })
    }

    /// Creates a snippet at version 1 with a single history entry.
    pub async fn create_snippet(
        &self,
        ctx: &RequestContext,
        req: CreateSnippet,
    ) -> AppResult<Snippet> {
        let content = req
            .content
            .ok_or_else(|| AppError::validation("Snippet content is required"))?;
        self.policy.validate_content(&content)?;

        let now = ctx.request_time;
        let title = req
            .title
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| Snippet::synthesized_title(now));
        let (language, auto_detected) = self
            .policy
            .resolve_language(req.language.as_deref(), &content);

        let snippet = Snippet {
            id: SnippetId::new(),
            owner_id: ctx.owner_id.clone(),
            title,
            content: content.clone(),
            language,
            auto_detected,
            description: req.description,
            tags: req.tags,
            folder_id: req.folder_id,
            is_deleted: false,
            deleted_at: None,
            current_version: 1,
            edit_history: vec![EditHistoryEntry {
                version: 1,
                content,
                edited_by: ctx.owner_id.clone(),
                edited_at: now,
                note: NOTE_INITIAL.to_string(),
                conflict_note: None,
            }],
            collaborators: [ctx.owner_id.clone()].into_iter().collect(),
            created_at: now,
            updated_at: now,
        };

        for attempt in 1..=self.max_attempts {
            let mut writes = vec![SnippetRepository::put_op(&snippet, 0)?];
            match self
                .membership_ops(&ctx.owner_id, None, Some(&snippet))
                .await?
            {
                Some(ops) => writes.extend(ops),
                None => return Err(missing_folder(snippet.folder_id)),
            }

            match self.store.batch(writes).await {
                Ok(()) => {
                    info!(
                        owner_id = %ctx.owner_id,
                        snippet_id = %snippet.id,
                        folder_id = ?snippet.folder_id,
                        language = %snippet.language,
                        auto_detected = snippet.auto_detected,
                        "Snippet created"
                    );
                    return Ok(snippet);
                }
                Err(e) if e.is(ErrorKind::PreconditionFailed) => {
                    debug!(snippet_id = %snippet.id, attempt, "Folder changed during create, retrying");
                }
                Err(e) => return Err(e),
            }
        }

        Err(self.retries_exhausted(snippet.id))
    }

    /// Gets a snippet by ID (trashed snippets included).
    pub async fn get_snippet(&self, ctx: &RequestContext, id: SnippetId) -> AppResult<Snippet> {
        Ok(self.load(&ctx.owner_id, id).await?.value)
    }

    /// Lists active snippets, optionally restricted to one folder or root.
    pub async fn list_snippets(
        &self,
        ctx: &RequestContext,
        scope: FolderScope,
    ) -> AppResult<Vec<Snippet>> {
        self.snippets.find_active(&ctx.owner_id, scope).await
    }

    /// Applies an update under the conflict policy.
    ///
    /// The read, the policy decision, and the write form one compare-and-swap
    /// on the store revision; a lost race re-reads and re-evaluates.
    pub async fn update_snippet(
        &self,
        ctx: &RequestContext,
        id: SnippetId,
        update: SnippetUpdate,
    ) -> AppResult<UpdateOutcome> {
        let mode = update.conflict_mode.unwrap_or(self.default_mode);

        for attempt in 1..=self.max_attempts {
            let current = self.load(&ctx.owner_id, id).await?;
            let resolution = self.policy.resolve(
                &current.value,
                &update,
                mode,
                &ctx.owner_id,
                ctx.request_time,
            )?;
            let next = resolution.snippet;

            if next.folder_id != current.value.folder_id {
                if let Some(folder_id) = next.folder_id {
                    self.require_active_folder(&ctx.owner_id, folder_id).await?;
                }
            }

            if self.commit(&current, &next).await? {
                info!(
                    owner_id = %ctx.owner_id,
                    snippet_id = %id,
                    version = next.current_version,
                    conflict_mode = %mode,
                    conflict = resolution.conflict.is_some(),
                    "Snippet updated"
                );
                return Ok(UpdateOutcome {
                    snippet: next,
                    conflict: resolution.conflict,
                });
            }
            debug!(snippet_id = %id, attempt, "Lost update race, retrying");
        }

        Err(self.retries_exhausted(id))
    }

    /// Moves a snippet to the trash. Re-deleting re-stamps `deleted_at`.
    pub async fn delete_snippet(&self, ctx: &RequestContext, id: SnippetId) -> AppResult<()> {
        for attempt in 1..=self.max_attempts {
            let current = self.load(&ctx.owner_id, id).await?;
            let mut next = current.value.clone();
            next.soft_delete(ctx.request_time);

            if self.commit(&current, &next).await? {
                info!(owner_id = %ctx.owner_id, snippet_id = %id, "Snippet moved to trash");
                return Ok(());
            }
            debug!(snippet_id = %id, attempt, "Lost delete race, retrying");
        }

        Err(self.retries_exhausted(id))
    }

    /// Brings a snippet back from the trash.
    ///
    /// Restoring an active snippet succeeds without writing. A snippet whose
    /// folder is gone or deleted comes back at root.
    pub async fn restore_snippet(&self, ctx: &RequestContext, id: SnippetId) -> AppResult<Snippet> {
        for attempt in 1..=self.max_attempts {
            let current = self.load(&ctx.owner_id, id).await?;
            if current.value.is_active() {
                return Ok(current.value);
            }

            let mut next = current.value.clone();
            next.restore();
            if let Some(folder_id) = next.folder_id {
                if self.active_folder(&ctx.owner_id, folder_id).await?.is_none() {
                    info!(
                        snippet_id = %id,
                        folder_id = %folder_id,
                        "Original folder is gone, restoring to root"
                    );
                    next.folder_id = None;
                }
            }

            if self.commit(&current, &next).await? {
                info!(owner_id = %ctx.owner_id, snippet_id = %id, "Snippet restored");
                return Ok(next);
            }
            debug!(snippet_id = %id, attempt, "Lost restore race, retrying");
        }

        Err(self.retries_exhausted(id))
    }

    /// Erases a snippet permanently.
    ///
    /// Active snippets may be purged too; that path is logged.
    pub async fn purge_snippet(&self, ctx: &RequestContext, id: SnippetId) -> AppResult<()> {
        for attempt in 1..=self.max_attempts {
            let current = self.load(&ctx.owner_id, id).await?;
            if current.value.is_active() {
                warn!(
                    owner_id = %ctx.owner_id,
                    snippet_id = %id,
                    "Purging a snippet that is not in the trash"
                );
            }

            let key = SnippetRepository::key(&ctx.owner_id, id);
            // Rewriting the read body under its revision guards the delete.
            let mut writes = vec![
                SnippetRepository::put_op(&current.value, current.revision)?,
                BatchWrite::Delete { key },
            ];
            writes.extend(
                self.membership_ops(&ctx.owner_id, Some(&current.value), None)
                    .await?
                    .unwrap_or_default(),
            );

            match self.store.batch(writes).await {
                Ok(()) => {
                    self.drop_share_links(&ctx.owner_id, id).await;
                    info!(owner_id = %ctx.owner_id, snippet_id = %id, "Snippet purged");
                    return Ok(());
                }
                Err(e) if e.is(ErrorKind::PreconditionFailed) => {
                    debug!(snippet_id = %id, attempt, "Lost purge race, retrying");
                }
                Err(e) => return Err(e),
            }
        }

        Err(self.retries_exhausted(id))
    }

    pub(crate) async fn load(
        &self,
        owner_id: &OwnerId,
        id: SnippetId,
    ) -> AppResult<Versioned<Snippet>> {
        self.snippets
            .find_by_id(owner_id, id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Snippet {id} not found")))
    }

    pub(crate) fn folders(&self) -> &FolderRepository {
        &self.folders
    }

    pub(crate) fn snippets(&self) -> &SnippetRepository {
        &self.snippets
    }

    /// Write `next` over `current` with the counter moves its folder change implies.
    ///
    /// Returns `false` when another writer got there first, including when a
    /// folder the snippet enters stopped being active after it was checked.
    async fn commit(&self, current: &Versioned<Snippet>, next: &Snippet) -> AppResult<bool> {
        let mut writes = vec![SnippetRepository::put_op(next, current.revision)?];
        match self
            .membership_ops(&next.owner_id, Some(&current.value), Some(next))
            .await?
        {
            Some(ops) => writes.extend(ops),
            None => return Ok(false),
        }

        match self.store.batch(writes).await {
            Ok(()) => Ok(true),
            Err(e) if e.is(ErrorKind::PreconditionFailed) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Folder writes for a snippet going from `before` to `after`.
    ///
    /// Each folder touched is rewritten under the revision it was read at, so
    /// a concurrent folder change (deletion in particular) aborts the whole
    /// batch. Counters move only between active folders. Returns `None` when
    /// a folder `after` is placed or counted in is missing or deleted.
    async fn membership_ops(
        &self,
        owner_id: &OwnerId,
        before: Option<&Snippet>,
        after: Option<&Snippet>,
    ) -> AppResult<Option<Vec<BatchWrite>>> {
        let from = before.and_then(Snippet::counted_folder);
        let to = after.and_then(Snippet::counted_folder);
        let placed = after.and_then(|s| s.folder_id);

        let mut required = Vec::with_capacity(2);
        if from != to {
            required.extend(to);
        }
        if let Some(folder_id) = placed {
            if placed != before.and_then(|s| s.folder_id) && !required.contains(&folder_id) {
                required.push(folder_id);
            }
        }

        let mut guards = Vec::new();
        let mut counts = Vec::new();
        for folder_id in required {
            let Some(folder) = self.active_folder(owner_id, folder_id).await? else {
                return Ok(None);
            };
            guards.push(FolderRepository::put_op(&folder.value, folder.revision)?);
            if from != to && to == Some(folder_id) {
                counts.push(FolderRepository::count_op(owner_id, folder_id, 1));
            }
        }
        if let Some(folder_id) = from.filter(|_| from != to) {
            if let Some(folder) = self.active_folder(owner_id, folder_id).await? {
                guards.push(FolderRepository::put_op(&folder.value, folder.revision)?);
                counts.push(FolderRepository::count_op(owner_id, folder_id, -1));
            }
        }

        // Guards first: an increment bumps the revision a guard checks.
        guards.extend(counts);
        Ok(Some(guards))
    }

    async fn active_folder(
        &self,
        owner_id: &OwnerId,
        folder_id: FolderId,
    ) -> AppResult<Option<Versioned<Folder>>> {
        self.folders.find_active_by_id(owner_id, folder_id).await
    }

    async fn require_active_folder(&self, owner_id: &OwnerId, folder_id: FolderId) -> AppResult<()> {
        match self.active_folder(owner_id, folder_id).await? {
            Some(_) => Ok(()),
            None => Err(missing_folder(Some(folder_id))),
        }
    }

    async fn drop_share_links(&self, owner_id: &OwnerId, id: SnippetId) {
        let links = match self.links.find_by_snippet(owner_id, id).await {
            Ok(links) => links,
            Err(e) => {
                warn!(snippet_id = %id, error = %e, "Failed to look up share links of purged snippet");
                return;
            }
        };
        for link in links {
            if let Err(e) = self.links.delete(&link.token).await {
                warn!(link_id = %link.id, error = %e, "Failed to delete share link");
            }
        }
    }

    fn retries_exhausted(&self, id: SnippetId) -> AppError {
        warn!(snippet_id = %id, attempts = self.max_attempts, "Gave up after repeated write races");
        AppError::conflict(format!(
            "Snippet {id} is being modified concurrently; refetch and retry"
        ))
        .with_details(serde_json::json!({ "attempts": self.max_attempts }))
    }
}

fn missing_folder(folder_id: Option<FolderId>) -> AppError {
    match folder_id {
        Some(id) => AppError::validation(format!("Folder {id} does not exist")),
        None => AppError::validation("Folder does not exist"),
    }
}
