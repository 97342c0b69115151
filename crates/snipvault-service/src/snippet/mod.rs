//! Snippet store and conflict resolution.

pub mod conflict;
pub mod service;
pub mod trash;

pub use conflict::{ConflictInfo, ConflictPolicy, Resolution, SnippetUpdate};
pub use service::{SnippetService, UpdateOutcome};
