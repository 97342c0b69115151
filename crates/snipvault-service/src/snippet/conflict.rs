//! Conflict resolution policy for snippet updates.
//!
//! Given the stored snippet, an incoming patch, and the version the caller
//! believes it is editing, decide whether the write proceeds and compute
//! the document to persist. The policy is pure: it never touches the store.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use snipvault_core::error::AppError;
use snipvault_core::result::AppResult;
use snipvault_core::traits::LanguageDetector;
use snipvault_core::types::OwnerId;
use snipvault_entity::snippet::{
    ConflictMode, ConflictNote, EditHistoryEntry, NOTE_UPDATED, Snippet, SnippetPatch,
};

/// An update request as received from the caller.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SnippetUpdate {
    /// Fields to change.
    #[serde(flatten)]
    pub patch: SnippetPatch,
    /// Version the caller read; `None` skips the conflict check.
    #[serde(default)]
    pub expected_version: Option<u64>,
    /// Policy for a stale `expected_version`; the configured default when absent.
    #[serde(default)]
    pub conflict_mode: Option<ConflictMode>,
}

/// A detected version mismatch that the chosen mode let through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictInfo {
    /// Version the caller expected.
    pub expected_version: u64,
    /// Version actually stored when the write was evaluated.
    pub server_version: u64,
    /// Mode that resolved the conflict.
    pub conflict_mode: ConflictMode,
}

/// Outcome of evaluating an update against the stored snippet.
#[derive(Debug, Clone)]
pub struct Resolution {
    /// The document to persist.
    pub snippet: Snippet,
    /// Present when a conflict was detected and overridden.
    pub conflict: Option<ConflictInfo>,
}

/// Decides how an update with a possibly stale version is applied.
#[derive(Debug, Clone)]
pub struct ConflictPolicy {
    detector: Arc<dyn LanguageDetector>,
    max_content_bytes: usize,
}

impl ConflictPolicy {
    /// Creates a policy using the given language heuristic.
    pub fn new(detector: Arc<dyn LanguageDetector>, max_content_bytes: usize) -> Self {
        Self {
            detector,
            max_content_bytes,
        }
    }

    /// Check a snippet body against the emptiness and size limits.
    pub fn validate_content(&self, content: &str) -> AppResult<()> {
        if content.trim().is_empty() {
            return Err(AppError::validation("Snippet content cannot be empty"));
        }
        if content.len() > self.max_content_bytes {
            return Err(AppError::validation(format!(
                "Snippet content exceeds {} bytes",
                self.max_content_bytes
            ))
            .with_details(serde_json::json!({
                "max_content_bytes": self.max_content_bytes,
                "content_bytes": content.len(),
            })));
        }
        Ok(())
    }

    /// Resolve a language tag: an explicit non-blank tag wins, otherwise detect.
    ///
    /// Returns the tag and whether it was auto-detected.
    pub fn resolve_language(&self, explicit: Option<&str>, content: &str) -> (String, bool) {
        match explicit.map(str::trim).filter(|l| !l.is_empty()) {
            Some(language) => (language.to_lowercase(), false),
            None => (self.detector.detect(content), true),
        }
    }

    /// Evaluate `update` against `stored` under `mode`.
    ///
    /// Fails with `Conflict` (and changes nothing) when the versions differ
    /// in merge mode; otherwise returns the next document.
    pub fn resolve(
        &self,
        stored: &Snippet,
        update: &SnippetUpdate,
        mode: ConflictMode,
        editor: &OwnerId,
        now: DateTime<Utc>,
    ) -> AppResult<Resolution> {
        let conflict = update
            .expected_version
            .filter(|expected| *expected != stored.current_version)
            .map(|expected| ConflictInfo {
                expected_version: expected,
                server_version: stored.current_version,
                conflict_mode: mode,
            });

        if let Some(info) = conflict {
            if mode == ConflictMode::Merge {
                return Err(AppError::conflict(format!(
                    "Version conflict: expected version {} but current version is {}; \
                     refetch the snippet and retry",
                    info.expected_version, info.server_version
                ))
                .with_details(serde_json::json!({
                    "expected_version": info.expected_version,
                    "current_version": info.server_version,
                    "conflict_mode": mode,
                })));
            }
        }

        let patch = &update.patch;
        let mut next = stored.clone();

        if let Some(title) = &patch.title {
            if title.trim().is_empty() {
                return Err(AppError::validation("Snippet title cannot be blank"));
            }
            next.title = title.trim().to_string();
        }

        if let Some(content) = &patch.content {
            self.validate_content(content)?;
            next.content = content.clone();
            let (language, auto) = self.resolve_language(patch.language.as_deref(), content);
            next.language = language;
            next.auto_detected = auto;
        } else if let Some(language) = patch.language.as_deref().map(str::trim) {
            if !language.is_empty() {
                next.language = language.to_lowercase();
                next.auto_detected = false;
            }
        }

        if let Some(description) = &patch.description {
            next.description = Some(description.clone());
        }
        if let Some(tags) = &patch.tags {
            next.tags = tags.clone();
        }
        if let Some(folder_id) = patch.folder_id {
            next.folder_id = folder_id;
        }

        let audited = conflict.is_some() && mode == ConflictMode::Version;
        if !patch.is_move_only() || audited {
            next.current_version = stored.current_version + 1;
        }

        if patch.content.is_some() || audited {
            next.edit_history.push(EditHistoryEntry {
                version: next.current_version,
                content: next.content.clone(),
                edited_by: editor.clone(),
                edited_at: now,
                note: NOTE_UPDATED.to_string(),
                conflict_note: conflict.filter(|_| audited).map(|info| ConflictNote {
                    client_version: info.expected_version,
                    server_version: info.server_version,
                }),
            });
        }

        next.add_collaborator(editor);
        next.updated_at = now;

        Ok(Resolution {
            snippet: next,
            conflict,
        })
    }
}
