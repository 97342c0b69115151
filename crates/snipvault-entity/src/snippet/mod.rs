//! Snippet domain entities.

pub mod conflict;
pub mod history;
pub mod model;
pub mod patch;

pub use conflict::ConflictMode;
pub use history::{ConflictNote, EditHistoryEntry, NOTE_INITIAL, NOTE_UPDATED};
pub use model::{CreateSnippet, FolderScope, Snippet, TrashedSnippet};
pub use patch::SnippetPatch;
