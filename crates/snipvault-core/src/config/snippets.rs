//! Snippet lifecycle configuration.

use serde::{Deserialize, Serialize};

/// Tunables for snippet writes and share links.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnippetConfig {
    /// Conflict mode applied when an update does not name one:
    /// `"overwrite"`, `"version"`, or `"merge"`.
    #[serde(default = "default_conflict_mode")]
    pub default_conflict_mode: String,
    /// Largest accepted snippet body in bytes.
    #[serde(default = "default_max_content_bytes")]
    pub max_content_bytes: usize,
    /// Lifetime of a share link when the caller does not pick one.
    #[serde(default = "default_share_link_ttl")]
    pub share_link_ttl_hours: u64,
}

impl Default for SnippetConfig {
    fn default() -> Self {
        Self {
            default_conflict_mode: default_conflict_mode(),
            max_content_bytes: default_max_content_bytes(),
            share_link_ttl_hours: default_share_link_ttl(),
        }
    }
}

fn default_conflict_mode() -> String {
    "overwrite".to_string()
}

fn default_max_content_bytes() -> usize {
    1024 * 1024
}

fn default_share_link_ttl() -> u64 {
    24 * 7
}
