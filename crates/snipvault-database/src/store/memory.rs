//! In-process document store using dashmap.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::Value;
use tracing::debug;

use snipvault_core::error::AppError;
use snipvault_core::result::AppResult;
use snipvault_core::traits::document_store::{
    BatchWrite, DocumentFilter, DocumentKey, DocumentStore, StoredDocument,
};
use snipvault_core::types::OwnerId;

/// Documents of one owner, keyed by `(collection, id)`.
type Partition = HashMap<(String, String), StoredDocument>;

/// In-memory document store partitioned by owner.
///
/// Each owner's documents sit behind one dashmap shard entry, so a batch
/// holding that entry's write guard is applied atomically with respect to
/// every other reader and writer of the same owner.
#[derive(Debug, Clone, Default)]
pub struct MemoryDocumentStore {
    partitions: Arc<DashMap<OwnerId, Partition>>,
}

impl MemoryDocumentStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents across all owners.
    pub fn len(&self) -> usize {
        self.partitions.iter().map(|p| p.value().len()).sum()
    }

    /// Whether the store holds no documents.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn slot(key: &DocumentKey) -> (String, String) {
    (key.collection.clone(), key.id.clone())
}

/// Shallow top-level merge of `patch` into `base`.
fn merge_into(base: &Value, patch: Value) -> Value {
    match (base, patch) {
        (Value::Object(existing), Value::Object(incoming)) => {
            let mut merged = existing.clone();
            merged.extend(incoming);
            Value::Object(merged)
        }
        (_, patch) => patch,
    }
}

/// Apply one write to a partition, recording the previous slot value in `undo`.
///
/// Returns the new field value for increments.
fn apply_write(
    partition: &mut Partition,
    write: BatchWrite,
    undo: &mut Vec<((String, String), Option<StoredDocument>)>,
) -> AppResult<Option<i64>> {
    match write {
        BatchWrite::Set { key, data, merge } => {
            let slot = slot(&key);
            let previous = partition.get(&slot).cloned();
            let next = match &previous {
                Some(doc) => StoredDocument {
                    data: if merge { merge_into(&doc.data, data) } else { data },
                    revision: doc.revision + 1,
                },
                None => StoredDocument { data, revision: 1 },
            };
            partition.insert(slot.clone(), next);
            undo.push((slot, previous));
            Ok(None)
        }
        BatchWrite::SetIfRevision {
            key,
            data,
            expected_revision,
        } => {
            let slot = slot(&key);
            let previous = partition.get(&slot).cloned();
            let actual = previous.as_ref().map(|d| d.revision).unwrap_or(0);
            if actual != expected_revision {
                return Err(AppError::precondition_failed(format!(
                    "Revision mismatch on {key}: expected {expected_revision}, found {actual}"
                )));
            }
            partition.insert(
                slot.clone(),
                StoredDocument {
                    data,
                    revision: actual + 1,
                },
            );
            undo.push((slot, previous));
            Ok(None)
        }
        BatchWrite::Increment { key, field, delta } => {
            let slot = slot(&key);
            let Some(previous) = partition.get(&slot).cloned() else {
                return Err(AppError::not_found(format!(
                    "Cannot increment '{field}' on missing document {key}"
                )));
            };
            let current = match previous.data.get(&field) {
                None | Some(Value::Null) => 0,
                Some(value) => value.as_i64().ok_or_else(|| {
                    AppError::validation(format!("Field '{field}' of {key} is not an integer"))
                })?,
            };
            let updated = current + delta;
            let mut data = previous.data.clone();
            if let Value::Object(map) = &mut data {
                map.insert(field, Value::from(updated));
            }
            partition.insert(
                slot.clone(),
                StoredDocument {
                    data,
                    revision: previous.revision + 1,
                },
            );
            undo.push((slot, Some(previous)));
            Ok(Some(updated))
        }
        BatchWrite::Delete { key } => {
            let slot = slot(&key);
            let previous = partition.remove(&slot);
            undo.push((slot, previous));
            Ok(None)
        }
    }
}

fn rollback(partition: &mut Partition, undo: Vec<((String, String), Option<StoredDocument>)>) {
    for (slot, previous) in undo.into_iter().rev() {
        match previous {
            Some(doc) => {
                partition.insert(slot, doc);
            }
            None => {
                partition.remove(&slot);
            }
        }
    }
}

impl MemoryDocumentStore {
    /// Apply writes for one owner under the partition guard, all or nothing.
    fn apply_all(&self, owner_id: &OwnerId, writes: Vec<BatchWrite>) -> AppResult<Option<i64>> {
        let mut partition = self.partitions.entry(owner_id.clone()).or_default();
        let mut undo = Vec::with_capacity(writes.len());
        let mut last = None;
        for write in writes {
            match apply_write(&mut *partition, write, &mut undo) {
                Ok(value) => last = value,
                Err(e) => {
                    rollback(&mut *partition, undo);
                    return Err(e);
                }
            }
        }
        Ok(last)
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    fn provider_type(&self) -> &str {
        "memory"
    }

    async fn get(&self, key: &DocumentKey) -> AppResult<Option<StoredDocument>> {
        Ok(self
            .partitions
            .get(&key.owner_id)
            .and_then(|p| p.get(&slot(key)).cloned()))
    }

    async fn query(
        &self,
        owner_id: &OwnerId,
        collection: &str,
        filter: &DocumentFilter,
    ) -> AppResult<Vec<StoredDocument>> {
        let Some(partition) = self.partitions.get(owner_id) else {
            return Ok(Vec::new());
        };
        Ok(partition
            .iter()
            .filter(|(slot, doc)| slot.0 == collection && filter.matches(&doc.data))
            .map(|(_, doc)| doc.clone())
            .collect())
    }

    async fn set(&self, key: &DocumentKey, data: Value, merge: bool) -> AppResult<StoredDocument> {
        self.apply_all(
            &key.owner_id,
            vec![BatchWrite::Set {
                key: key.clone(),
                data,
                merge,
            }],
        )?;
        self.get(key)
            .await?
            .ok_or_else(|| AppError::internal(format!("Document {key} vanished after write")))
    }

    async fn increment(&self, key: &DocumentKey, field: &str, delta: i64) -> AppResult<i64> {
        self.apply_all(
            &key.owner_id,
            vec![BatchWrite::Increment {
                key: key.clone(),
                field: field.to_string(),
                delta,
            }],
        )?
        .ok_or_else(|| AppError::internal("Increment produced no value"))
    }

    async fn delete(&self, key: &DocumentKey) -> AppResult<bool> {
        let removed = self
            .partitions
            .get_mut(&key.owner_id)
            .and_then(|mut p| p.remove(&slot(key)))
            .is_some();
        Ok(removed)
    }

    async fn batch(&self, writes: Vec<BatchWrite>) -> AppResult<()> {
        let Some(owner_id) = writes.first().map(|w| w.key().owner_id.clone()) else {
            return Ok(());
        };
        if writes.iter().any(|w| w.key().owner_id != owner_id) {
            return Err(AppError::internal(
                "In-memory batches must target a single owner namespace",
            ));
        }
        debug!(owner_id = %owner_id, writes = writes.len(), "Applying batch");
        self.apply_all(&owner_id, writes).map(|_| ())
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}
