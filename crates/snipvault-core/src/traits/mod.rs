//! Core traits defined in `snipvault-core` and implemented by other crates.

pub mod document_store;
pub mod language;

pub use document_store::{BatchWrite, DocumentFilter, DocumentKey, DocumentStore, StoredDocument};
pub use language::LanguageDetector;
