//! Share link repository implementation.

use std::sync::Arc;

use snipvault_core::result::AppResult;
use snipvault_core::traits::document_store::{BatchWrite, DocumentFilter, DocumentKey, DocumentStore};
use snipvault_core::types::{OwnerId, ShareLinkId, SnippetId};
use snipvault_entity::share::ShareLink;

use super::{Versioned, decode, encode};

/// Repository for share links.
///
/// Links are resolved without an authenticated owner, so they live in a
/// reserved system namespace keyed by token.
#[derive(Debug, Clone)]
pub struct ShareLinkRepository {
    store: Arc<dyn DocumentStore>,
    namespace: OwnerId,
}

impl ShareLinkRepository {
    /// Collection holding share link documents.
    pub const COLLECTION: &'static str = "share_links";

    /// Create a new share link repository.
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            namespace: OwnerId::system("links"),
        }
    }

    fn key(&self, token: &str) -> DocumentKey {
        DocumentKey::new(self.namespace.clone(), Self::COLLECTION, token)
    }

    /// Find a link by its public token.
    pub async fn find_by_token(&self, token: &str) -> AppResult<Option<ShareLink>> {
        self.store
            .get(&self.key(token))
            .await?
            .map(|doc| decode::<ShareLink>(doc).map(|v| v.value))
            .transpose()
    }

    /// Find a link by its id.
    pub async fn find_by_id(&self, id: ShareLinkId) -> AppResult<Option<ShareLink>> {
        let filter = DocumentFilter::all().eq("id", id.to_string());
        let mut found = self.find_where(&filter).await?;
        Ok(found.pop())
    }

    /// All links pointing at a snippet.
    pub async fn find_by_snippet(
        &self,
        owner_id: &OwnerId,
        snippet_id: SnippetId,
    ) -> AppResult<Vec<ShareLink>> {
        let filter = DocumentFilter::all()
            .eq("owner_id", owner_id.as_str())
            .eq("snippet_id", snippet_id.to_string());
        self.find_where(&filter).await
    }

    /// Insert a new link. Fails with `PreconditionFailed` on a token collision.
    pub async fn create(&self, link: &ShareLink) -> AppResult<()> {
        self.store
            .batch(vec![BatchWrite::SetIfRevision {
                key: self.key(&link.token),
                data: encode(link)?,
                expected_revision: 0,
            }])
            .await
    }

    /// Remove a link by token.
    pub async fn delete(&self, token: &str) -> AppResult<bool> {
        self.store.delete(&self.key(token)).await
    }

    async fn find_where(&self, filter: &DocumentFilter) -> AppResult<Vec<ShareLink>> {
        self.store
            .query(&self.namespace, Self::COLLECTION, filter)
            .await?
            .into_iter()
            .map(|doc| decode::<ShareLink>(doc).map(|v: Versioned<ShareLink>| v.value))
            .collect()
    }
}
