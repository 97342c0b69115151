//! Shared fixtures for service tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use snipvault_core::config::{SnippetConfig, StoreConfig};
use snipvault_core::result::AppResult;
use snipvault_core::traits::{
    BatchWrite, DocumentFilter, DocumentKey, DocumentStore, StoredDocument,
};
use snipvault_core::types::{FolderId, OwnerId};
use snipvault_database::MemoryDocumentStore;
use snipvault_database::repositories::FolderRepository;
use snipvault_entity::folder::{CreateFolder, Folder};
use snipvault_entity::snippet::{CreateSnippet, Snippet};

use crate::context::RequestContext;
use crate::folder::FolderService;
use crate::language::KeywordLanguageDetector;
use crate::share::ShareService;
use crate::snippet::SnippetService;

/// All services wired to one in-memory store.
pub(crate) struct Harness {
    pub store: Arc<MemoryDocumentStore>,
    pub snippets: SnippetService,
    pub folders: FolderService,
    pub shares: ShareService,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_retries(5)
    }

    pub fn with_retries(max_cas_retries: u32) -> Self {
        let store = Arc::new(MemoryDocumentStore::new());
        Self::build(store.clone(), store, max_cas_retries)
    }

    /// Services whose `nth` folder read (from zero) sleeps for `delay` after
    /// reading, so another operation can commit between that read and the
    /// write that depends on it.
    pub fn with_stalled_folder_read(nth: usize, delay: Duration) -> Self {
        let store = Arc::new(MemoryDocumentStore::new());
        let stalling = Arc::new(StallingStore {
            inner: store.clone(),
            nth,
            delay,
            folder_reads: AtomicUsize::new(0),
        });
        Self::build(store, stalling, 5)
    }

    fn build(
        store: Arc<MemoryDocumentStore>,
        dyn_store: Arc<dyn DocumentStore>,
        max_cas_retries: u32,
    ) -> Self {
        let snippet_config = SnippetConfig::default();
        let store_config = StoreConfig {
            max_cas_retries,
            ..Default::default()
        };

        Self {
            snippets: SnippetService::new(
                Arc::clone(&dyn_store),
                Arc::new(KeywordLanguageDetector::new()),
                &snippet_config,
                &store_config,
            )
            .expect("valid config"),
            folders: FolderService::new(Arc::clone(&dyn_store), &store_config),
            shares: ShareService::new(dyn_store, &snippet_config),
            store,
        }
    }

    pub fn ctx(owner: &str) -> RequestContext {
        RequestContext::new(OwnerId::new(owner))
    }

    pub async fn folder(&self, ctx: &RequestContext, name: &str) -> Folder {
        self.folders
            .create_folder(
                ctx,
                CreateFolder {
                    name: name.to_string(),
                    ..Default::default()
                },
            )
            .await
            .expect("create folder")
    }

    pub async fn snippet(
        &self,
        ctx: &RequestContext,
        content: &str,
        folder_id: Option<FolderId>,
    ) -> Snippet {
        self.snippets
            .create_snippet(
                ctx,
                CreateSnippet {
                    content: Some(content.to_string()),
                    folder_id,
                    ..Default::default()
                },
            )
            .await
            .expect("create snippet")
    }

    /// The counter as persisted, bypassing the live recount of `list_folders`.
    pub async fn stored_count(&self, ctx: &RequestContext, folder_id: FolderId) -> i64 {
        FolderRepository::new(self.store.clone())
            .find_by_id(&ctx.owner_id, folder_id)
            .await
            .expect("lookup")
            .expect("folder exists")
            .value
            .snippet_count
    }
}

/// Delegating store that delays one chosen folder `get`.
#[derive(Debug)]
struct StallingStore {
    inner: Arc<MemoryDocumentStore>,
    nth: usize,
    delay: Duration,
    folder_reads: AtomicUsize,
}

#[async_trait]
impl DocumentStore for StallingStore {
    fn provider_type(&self) -> &str {
        self.inner.provider_type()
    }

    async fn get(&self, key: &DocumentKey) -> AppResult<Option<StoredDocument>> {
        let read = self.inner.get(key).await;
        if key.collection == FolderRepository::COLLECTION
            && self.folder_reads.fetch_add(1, Ordering::SeqCst) == self.nth
        {
            tokio::time::sleep(self.delay).await;
        }
        read
    }

    async fn query(
        &self,
        owner_id: &OwnerId,
        collection: &str,
        filter: &DocumentFilter,
    ) -> AppResult<Vec<StoredDocument>> {
        self.inner.query(owner_id, collection, filter).await
    }

    async fn set(&self, key: &DocumentKey, data: Value, merge: bool) -> AppResult<StoredDocument> {
        self.inner.set(key, data, merge).await
    }

    async fn increment(&self, key: &DocumentKey, field: &str, delta: i64) -> AppResult<i64> {
        self.inner.increment(key, field, delta).await
    }

    async fn delete(&self, key: &DocumentKey) -> AppResult<bool> {
        self.inner.delete(key).await
    }

    async fn batch(&self, writes: Vec<BatchWrite>) -> AppResult<()> {
        self.inner.batch(writes).await
    }

    async fn health_check(&self) -> AppResult<bool> {
        self.inner.health_check().await
    }
}
