//! Document store trait for pluggable persistence backends.

use std::fmt;

use async_trait::async_trait;
use serde_json::Value;

use crate::result::AppResult;
use crate::types::OwnerId;

/// Address of a single document: `(owner, collection, document id)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentKey {
    /// Owner namespace (partition key).
    pub owner_id: OwnerId,
    /// Collection name, e.g. `"snippets"`.
    pub collection: String,
    /// Document id within the collection.
    pub id: String,
}

impl DocumentKey {
    /// Build a key from its three parts.
    pub fn new(owner_id: OwnerId, collection: impl Into<String>, id: impl ToString) -> Self {
        Self {
            owner_id,
            collection: collection.into(),
            id: id.to_string(),
        }
    }
}

impl fmt::Display for DocumentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.owner_id, self.collection, self.id)
    }
}

/// A document as persisted, with its store-level revision.
///
/// The revision starts at 1 on insert and is bumped by every write to the
/// document. It is the token for compare-and-swap writes.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    /// The JSON object body.
    pub data: Value,
    /// Store-level write counter.
    pub revision: u64,
}

/// Equality filter over top-level document fields.
///
/// A JSON `null` value matches documents whose field is null.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentFilter {
    /// Field/value pairs that must all match.
    pub equals: Vec<(String, Value)>,
}

impl DocumentFilter {
    /// An empty filter matching every document in the collection.
    pub fn all() -> Self {
        Self::default()
    }

    /// Add an equality predicate.
    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.equals.push((field.into(), value.into()));
        self
    }

    /// Check a document body against every predicate.
    pub fn matches(&self, data: &Value) -> bool {
        self.equals
            .iter()
            .all(|(field, expected)| data.get(field).unwrap_or(&Value::Null) == expected)
    }

    /// Render the filter as a JSON object (used for JSONB containment).
    pub fn to_object(&self) -> Value {
        let map = self
            .equals
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect::<serde_json::Map<_, _>>();
        Value::Object(map)
    }
}

/// One write inside an atomic batch.
#[derive(Debug, Clone, PartialEq)]
pub enum BatchWrite {
    /// Create or replace a document; with `merge`, shallow-merge top-level fields.
    Set {
        /// Target document.
        key: DocumentKey,
        /// New body.
        data: Value,
        /// Merge over the existing body instead of replacing it.
        merge: bool,
    },
    /// Replace a document only if its revision still equals `expected_revision`.
    ///
    /// An expected revision of 0 means the document must not exist yet.
    SetIfRevision {
        /// Target document.
        key: DocumentKey,
        /// New body.
        data: Value,
        /// Revision observed when the document was read.
        expected_revision: u64,
    },
    /// Atomically add `delta` to a numeric field of an existing document.
    Increment {
        /// Target document.
        key: DocumentKey,
        /// Numeric field name.
        field: String,
        /// Signed amount to add.
        delta: i64,
    },
    /// Remove a document (no-op when absent).
    Delete {
        /// Target document.
        key: DocumentKey,
    },
}

impl BatchWrite {
    /// The document this write touches.
    pub fn key(&self) -> &DocumentKey {
        match self {
            Self::Set { key, .. }
            | Self::SetIfRevision { key, .. }
            | Self::Increment { key, .. }
            | Self::Delete { key } => key,
        }
    }
}

/// Trait for document persistence backends.
///
/// Implementations exist for an in-process store and PostgreSQL. The
/// [`DocumentStore`] trait is defined here in `snipvault-core` and
/// implemented in `snipvault-database`.
#[async_trait]
pub trait DocumentStore: Send + Sync + fmt::Debug + 'static {
    /// Return the provider type name (e.g., "memory", "postgres").
    fn provider_type(&self) -> &str;

    /// Fetch a single document.
    async fn get(&self, key: &DocumentKey) -> AppResult<Option<StoredDocument>>;

    /// Fetch every document of a collection in an owner namespace matching `filter`.
    async fn query(
        &self,
        owner_id: &OwnerId,
        collection: &str,
        filter: &DocumentFilter,
    ) -> AppResult<Vec<StoredDocument>>;

    /// Create or replace a document, optionally merging into the existing body.
    async fn set(&self, key: &DocumentKey, data: Value, merge: bool) -> AppResult<StoredDocument>;

    /// Atomically add `delta` to a numeric field. Returns the new value.
    async fn increment(&self, key: &DocumentKey, field: &str, delta: i64) -> AppResult<i64>;

    /// Delete a document. Returns `true` if a document was removed.
    async fn delete(&self, key: &DocumentKey) -> AppResult<bool>;

    /// Apply all writes as one indivisible unit.
    ///
    /// If any `SetIfRevision` precondition fails the whole batch is discarded
    /// and a `PreconditionFailed` error is returned.
    async fn batch(&self, writes: Vec<BatchWrite>) -> AppResult<()>;

    /// Check that the backend is reachable.
    async fn health_check(&self) -> AppResult<bool>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_filter_matches_null_field() {
        let filter = DocumentFilter::all().eq("folder_id", Value::Null);
        assert!(filter.matches(&json!({ "folder_id": null })));
        assert!(filter.matches(&json!({ "title": "no folder field" })));
        assert!(!filter.matches(&json!({ "folder_id": "abc" })));
    }

    #[test]
    fn test_filter_requires_all_predicates() {
        let filter = DocumentFilter::all()
            .eq("is_deleted", false)
            .eq("language", "rust");
        assert!(filter.matches(&json!({ "is_deleted": false, "language": "rust" })));
        assert!(!filter.matches(&json!({ "is_deleted": true, "language": "rust" })));
    }

    #[test]
    fn test_filter_object() {
        let filter = DocumentFilter::all().eq("is_deleted", true);
        assert_eq!(filter.to_object(), json!({ "is_deleted": true }));
    }
}
