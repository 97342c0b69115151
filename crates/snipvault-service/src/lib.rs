//! # snipvault-service
//!
//! Business logic service layer for SnipVault. Each service orchestrates
//! the typed repositories and the document store to implement one part of
//! the snippet lifecycle.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references.

pub mod context;
pub mod folder;
pub mod language;
pub mod share;
pub mod snippet;

#[cfg(test)]
pub(crate) mod testing;

pub use context::RequestContext;
pub use folder::FolderService;
pub use language::KeywordLanguageDetector;
pub use share::ShareService;
pub use snippet::{ConflictInfo, ConflictPolicy, SnippetService, SnippetUpdate, UpdateOutcome};
