//! Document store manager that dispatches to the configured provider.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::info;

use snipvault_core::config::{DatabaseConfig, StoreConfig};
use snipvault_core::error::AppError;
use snipvault_core::result::AppResult;
use snipvault_core::traits::document_store::{
    BatchWrite, DocumentFilter, DocumentKey, DocumentStore, StoredDocument,
};
use snipvault_core::types::OwnerId;

use crate::connection::DatabasePool;
use crate::migration::run_migrations;

use super::memory::MemoryDocumentStore;
use super::postgres::PgDocumentStore;

/// Document store manager that wraps the configured backend.
///
/// The provider is selected at construction time based on configuration.
#[derive(Debug, Clone)]
pub struct DocumentStoreManager {
    inner: Arc<dyn DocumentStore>,
}

impl DocumentStoreManager {
    /// Create a store manager from configuration.
    pub async fn new(store: &StoreConfig, database: &DatabaseConfig) -> AppResult<Self> {
        let inner: Arc<dyn DocumentStore> = match store.provider.as_str() {
            "memory" => {
                info!("Initializing in-memory document store");
                Arc::new(MemoryDocumentStore::new())
            }
            "postgres" => {
                info!("Initializing PostgreSQL document store");
                let pool = DatabasePool::connect(database).await?;
                if database.run_migrations {
                    run_migrations(pool.pool()).await?;
                }
                Arc::new(PgDocumentStore::new(pool.into_pool()))
            }
            other => {
                return Err(AppError::configuration(format!(
                    "Unknown store provider: '{other}'. Supported: memory, postgres"
                )));
            }
        };

        Ok(Self { inner })
    }

    /// Shared handle to the inner backend.
    pub fn store(&self) -> Arc<dyn DocumentStore> {
        Arc::clone(&self.inner)
    }
}

#[async_trait]
impl DocumentStore for DocumentStoreManager {
    fn provider_type(&self) -> &str {
        self.inner.provider_type()
    }

    async fn get(&self, key: &DocumentKey) -> AppResult<Option<StoredDocument>> {
        self.inner.get(key).await
    }

    async fn query(
        &self,
        owner_id: &OwnerId,
        collection: &str,
        filter: &DocumentFilter,
    ) -> AppResult<Vec<StoredDocument>> {
        self.inner.query(owner_id, collection, filter).await
    }

    async fn set(&self, key: &DocumentKey, data: Value, merge: bool) -> AppResult<StoredDocument> {
        self.inner.set(key, data, merge).await
    }

    async fn increment(&self, key: &DocumentKey, field: &str, delta: i64) -> AppResult<i64> {
        self.inner.increment(key, field, delta).await
    }

    async fn delete(&self, key: &DocumentKey) -> AppResult<bool> {
        self.inner.delete(key).await
    }

    async fn batch(&self, writes: Vec<BatchWrite>) -> AppResult<()> {
        self.inner.batch(writes).await
    }

    async fn health_check(&self) -> AppResult<bool> {
        self.inner.health_check().await
    }
}
