//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use snipvault_core::types::{ShareLinkId, SnippetId};
use snipvault_entity::share::ShareLink;

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Simple message response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Message.
    pub message: String,
}

impl MessageResponse {
    /// Wraps a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Count response for bulk operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountResponse {
    /// Number of affected items.
    pub count: usize,
}

/// A freshly created share link.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareLinkResponse {
    /// Link ID (used to revoke).
    pub id: ShareLinkId,
    /// Public token.
    pub token: String,
    /// Shared snippet.
    pub snippet_id: SnippetId,
    /// Relative URL that resolves the link.
    pub path: String,
    /// Expiry instant.
    pub expires_at: DateTime<Utc>,
}

impl From<ShareLink> for ShareLinkResponse {
    fn from(link: ShareLink) -> Self {
        Self {
            path: format!("/api/s/{}", link.token),
            id: link.id,
            token: link.token,
            snippet_id: link.snippet_id,
            expires_at: link.expires_at,
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status.
    pub status: String,
    /// Version.
    pub version: String,
    /// Document store provider.
    pub store: String,
}
