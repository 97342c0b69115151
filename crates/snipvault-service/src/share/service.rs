//! Share link creation, resolution, and revocation.

use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::{debug, info};

use snipvault_core::config::SnippetConfig;
use snipvault_core::error::{AppError, ErrorKind};
use snipvault_core::result::AppResult;
use snipvault_core::traits::DocumentStore;
use snipvault_core::types::{ShareLinkId, SnippetId};
use snipvault_database::repositories::{ShareLinkRepository, SnippetRepository};
use snipvault_entity::share::ShareLink;
use snipvault_entity::snippet::Snippet;

use super::link::generate_token;
use crate::context::RequestContext;

/// Attempts at drawing a token that is not already taken.
const TOKEN_ATTEMPTS: usize = 3;

/// Manages expiring read-only links to snippets.
#[derive(Debug, Clone)]
pub struct ShareService {
    /// Share link repository.
    links: ShareLinkRepository,
    /// Snippet repository.
    snippets: SnippetRepository,
    /// Lifetime applied when the caller does not pick one.
    default_ttl_hours: u64,
}

impl ShareService {
    /// Creates a new share service.
    pub fn new(store: Arc<dyn DocumentStore>, config: &SnippetConfig) -> Self {
        Self {
            links: ShareLinkRepository::new(Arc::clone(&store)),
            snippets: SnippetRepository::new(store),
            default_ttl_hours: config.share_link_ttl_hours,
        }
    }

    /// Creates a link to an active snippet.
    pub async fn create_link(
        &self,
        ctx: &RequestContext,
        snippet_id: SnippetId,
        ttl_hours: Option<u64>,
    ) -> AppResult<ShareLink> {
        let ttl_hours = ttl_hours.unwrap_or(self.default_ttl_hours);
        if ttl_hours == 0 {
            return Err(AppError::validation("Share link lifetime must be positive"));
        }
        let ttl = i64::try_from(ttl_hours)
            .ok()
            .and_then(Duration::try_hours)
            .ok_or_else(|| AppError::validation("Share link lifetime is too long"))?;

        let snippet = self
            .snippets
            .find_by_id(&ctx.owner_id, snippet_id)
            .await?
            .filter(|s| s.value.is_active())
            .ok_or_else(|| AppError::not_found(format!("Snippet {snippet_id} not found")))?;

        let now = ctx.request_time;
        for _ in 0..TOKEN_ATTEMPTS {
            let link = ShareLink {
                id: ShareLinkId::new(),
                token: generate_token(),
                owner_id: ctx.owner_id.clone(),
                snippet_id: snippet.value.id,
                created_at: now,
                expires_at: now + ttl,
            };

            match self.links.create(&link).await {
                Ok(()) => {
                    info!(
                        owner_id = %ctx.owner_id,
                        snippet_id = %snippet_id,
                        link_id = %link.id,
                        expires_at = %link.expires_at,
                        "Share link created"
                    );
                    return Ok(link);
                }
                Err(e) if e.is(ErrorKind::PreconditionFailed) => {
                    debug!("Share token collision, drawing again");
                }
                Err(e) => return Err(e),
            }
        }

        Err(AppError::internal("Could not allocate a unique share token"))
    }

    /// Resolves a public token to its snippet.
    ///
    /// Unknown, expired, and dangling links all read as `NotFound`.
    pub async fn resolve_link(&self, token: &str) -> AppResult<Snippet> {
        let not_found = || AppError::not_found("Share link not found");

        let link = self.links.find_by_token(token).await?.ok_or_else(not_found)?;
        if link.is_expired_at(Utc::now()) {
            debug!(link_id = %link.id, "Share link expired");
            return Err(not_found());
        }

        self.snippets
            .find_by_id(&link.owner_id, link.snippet_id)
            .await?
            .map(|v| v.value)
            .filter(Snippet::is_active)
            .ok_or_else(not_found)
    }

    /// Deletes a link owned by the caller.
    pub async fn revoke_link(&self, ctx: &RequestContext, link_id: ShareLinkId) -> AppResult<()> {
        let link = self
            .links
            .find_by_id(link_id)
            .await?
            .filter(|l| l.owner_id == ctx.owner_id)
            .ok_or_else(|| AppError::not_found(format!("Share link {link_id} not found")))?;

        self.links.delete(&link.token).await?;
        info!(owner_id = %ctx.owner_id, link_id = %link_id, "Share link revoked");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Harness;

    #[tokio::test]
    async fn test_create_and_resolve() {
        let h = Harness::new();
        let ctx = Harness::ctx("alice");
        let snippet = h.snippet(&ctx, "x = 1", None).await;

        let link = h.shares.create_link(&ctx, snippet.id, Some(2)).await.unwrap();
        assert_eq!(link.expires_at - link.created_at, Duration::hours(2));

        let resolved = h.shares.resolve_link(&link.token).await.unwrap();
        assert_eq!(resolved.id, snippet.id);
        assert_eq!(resolved.content, "x = 1");
    }

    #[tokio::test]
    async fn test_create_rejects_bad_input() {
        let h = Harness::new();
        let ctx = Harness::ctx("alice");
        let snippet = h.snippet(&ctx, "x = 1", None).await;

        let err = h.shares.create_link(&ctx, snippet.id, Some(0)).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);

        h.snippets.delete_snippet(&ctx, snippet.id).await.unwrap();
        let err = h.shares.create_link(&ctx, snippet.id, None).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_unresolvable_links_are_not_found() {
        let h = Harness::new();
        let ctx = Harness::ctx("alice");
        let snippet = h.snippet(&ctx, "x = 1", None).await;

        let err = h.shares.resolve_link("no-such-token").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);

        let now = Utc::now();
        let expired = ShareLink {
            id: ShareLinkId::new(),
            token: generate_token(),
            owner_id: ctx.owner_id.clone(),
            snippet_id: snippet.id,
            created_at: now - Duration::hours(3),
            expires_at: now - Duration::hours(1),
        };
        ShareLinkRepository::new(h.store.clone())
            .create(&expired)
            .await
            .unwrap();
        let err = h.shares.resolve_link(&expired.token).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);

        let live = h.shares.create_link(&ctx, snippet.id, None).await.unwrap();
        h.snippets.delete_snippet(&ctx, snippet.id).await.unwrap();
        let err = h.shares.resolve_link(&live.token).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_revoke_is_owner_scoped() {
        let h = Harness::new();
        let alice = Harness::ctx("alice");
        let bob = Harness::ctx("bob");
        let snippet = h.snippet(&alice, "x = 1", None).await;
        let link = h.shares.create_link(&alice, snippet.id, None).await.unwrap();

        let err = h.shares.revoke_link(&bob, link.id).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
        assert!(h.shares.resolve_link(&link.token).await.is_ok());

        h.shares.revoke_link(&alice, link.id).await.unwrap();
        let err = h.shares.resolve_link(&link.token).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }
}
