//! Typed repositories over the document store.

pub mod folder;
pub mod share;
pub mod snippet;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use snipvault_core::result::AppResult;
use snipvault_core::traits::document_store::StoredDocument;

pub use folder::FolderRepository;
pub use share::ShareLinkRepository;
pub use snippet::SnippetRepository;

/// An entity together with the store revision it was read at.
#[derive(Debug, Clone, PartialEq)]
pub struct Versioned<T> {
    /// The decoded entity.
    pub value: T,
    /// Store revision to pass back in a compare-and-swap write.
    pub revision: u64,
}

fn decode<T: DeserializeOwned>(doc: StoredDocument) -> AppResult<Versioned<T>> {
    Ok(Versioned {
        value: serde_json::from_value(doc.data)?,
        revision: doc.revision,
    })
}

fn encode<T: Serialize>(value: &T) -> AppResult<Value> {
    Ok(serde_json::to_value(value)?)
}
