//! PostgreSQL document store over a single JSONB table.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::{PgConnection, PgPool};
use tracing::debug;

use snipvault_core::error::{AppError, ErrorKind};
use snipvault_core::result::AppResult;
use snipvault_core::traits::document_store::{
    BatchWrite, DocumentFilter, DocumentKey, DocumentStore, StoredDocument,
};
use snipvault_core::types::OwnerId;

/// Document store backed by the `documents` table.
#[derive(Debug, Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    /// Create a new store over an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn db_err(message: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
    move |e| AppError::with_source(ErrorKind::Database, message, e)
}

fn to_document((data, revision): (Value, i64)) -> StoredDocument {
    StoredDocument {
        data,
        revision: revision as u64,
    }
}

/// Apply one write on an open connection (inside a transaction for batches).
async fn apply_write(conn: &mut PgConnection, write: &BatchWrite) -> AppResult<Option<i64>> {
    match write {
        BatchWrite::Set { key, data, merge } => {
            sqlx::query(
                "INSERT INTO documents (owner_id, collection, id, data, revision, updated_at) \
                 VALUES ($1, $2, $3, $4, 1, NOW()) \
                 ON CONFLICT (owner_id, collection, id) DO UPDATE SET \
                    data = CASE WHEN $5 THEN documents.data || EXCLUDED.data ELSE EXCLUDED.data END, \
                    revision = documents.revision + 1, \
                    updated_at = NOW()",
            )
            .bind(key.owner_id.as_str())
            .bind(&key.collection)
            .bind(&key.id)
            .bind(data)
            .bind(*merge)
            .execute(&mut *conn)
            .await
            .map_err(db_err("Failed to write document"))?;
            Ok(None)
        }
        BatchWrite::SetIfRevision {
            key,
            data,
            expected_revision,
        } => {
            let affected = if *expected_revision == 0 {
                sqlx::query(
                    "INSERT INTO documents (owner_id, collection, id, data, revision, updated_at) \
                     VALUES ($1, $2, $3, $4, 1, NOW()) \
                     ON CONFLICT (owner_id, collection, id) DO NOTHING",
                )
                .bind(key.owner_id.as_str())
                .bind(&key.collection)
                .bind(&key.id)
                .bind(data)
                .execute(&mut *conn)
                .await
                .map_err(db_err("Failed to insert document"))?
                .rows_affected()
            } else {
                sqlx::query(
                    "UPDATE documents SET data = $4, revision = revision + 1, updated_at = NOW() \
                     WHERE owner_id = $1 AND collection = $2 AND id = $3 AND revision = $5",
                )
                .bind(key.owner_id.as_str())
                .bind(&key.collection)
                .bind(&key.id)
                .bind(data)
                .bind(*expected_revision as i64)
                .execute(&mut *conn)
                .await
                .map_err(db_err("Failed to update document"))?
                .rows_affected()
            };

            if affected == 0 {
                return Err(AppError::precondition_failed(format!(
                    "Revision mismatch on {key}: expected {expected_revision}"
                )));
            }
            Ok(None)
        }
        BatchWrite::Increment { key, field, delta } => {
            let updated: Option<i64> = sqlx::query_scalar(
                "UPDATE documents SET \
                    data = jsonb_set(data, ARRAY[$4::text], \
                        to_jsonb(COALESCE((data->>$4)::bigint, 0) + $5)), \
                    revision = revision + 1, \
                    updated_at = NOW() \
                 WHERE owner_id = $1 AND collection = $2 AND id = $3 \
                 RETURNING (data->>$4)::bigint",
            )
            .bind(key.owner_id.as_str())
            .bind(&key.collection)
            .bind(&key.id)
            .bind(field)
            .bind(*delta)
            .fetch_optional(&mut *conn)
            .await
            .map_err(db_err("Failed to increment document field"))?;

            updated.map(Some).ok_or_else(|| {
                AppError::not_found(format!("Cannot increment '{field}' on missing document {key}"))
            })
        }
        BatchWrite::Delete { key } => {
            sqlx::query("DELETE FROM documents WHERE owner_id = $1 AND collection = $2 AND id = $3")
                .bind(key.owner_id.as_str())
                .bind(&key.collection)
                .bind(&key.id)
                .execute(&mut *conn)
                .await
                .map_err(db_err("Failed to delete document"))?;
            Ok(None)
        }
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    fn provider_type(&self) -> &str {
        "postgres"
    }

    async fn get(&self, key: &DocumentKey) -> AppResult<Option<StoredDocument>> {
        sqlx::query_as::<_, (Value, i64)>(
            "SELECT data, revision FROM documents \
             WHERE owner_id = $1 AND collection = $2 AND id = $3",
        )
        .bind(key.owner_id.as_str())
        .bind(&key.collection)
        .bind(&key.id)
        .fetch_optional(&self.pool)
        .await
        .map(|row| row.map(to_document))
        .map_err(db_err("Failed to find document"))
    }

    async fn query(
        &self,
        owner_id: &OwnerId,
        collection: &str,
        filter: &DocumentFilter,
    ) -> AppResult<Vec<StoredDocument>> {
        sqlx::query_as::<_, (Value, i64)>(
            "SELECT data, revision FROM documents \
             WHERE owner_id = $1 AND collection = $2 AND data @> $3",
        )
        .bind(owner_id.as_str())
        .bind(collection)
        .bind(filter.to_object())
        .fetch_all(&self.pool)
        .await
        .map(|rows| rows.into_iter().map(to_document).collect())
        .map_err(db_err("Failed to query documents"))
    }

    async fn set(&self, key: &DocumentKey, data: Value, merge: bool) -> AppResult<StoredDocument> {
        sqlx::query_as::<_, (Value, i64)>(
            "INSERT INTO documents (owner_id, collection, id, data, revision, updated_at) \
             VALUES ($1, $2, $3, $4, 1, NOW()) \
             ON CONFLICT (owner_id, collection, id) DO UPDATE SET \
                data = CASE WHEN $5 THEN documents.data || EXCLUDED.data ELSE EXCLUDED.data END, \
                revision = documents.revision + 1, \
                updated_at = NOW() \
             RETURNING data, revision",
        )
        .bind(key.owner_id.as_str())
        .bind(&key.collection)
        .bind(&key.id)
        .bind(data)
        .bind(merge)
        .fetch_one(&self.pool)
        .await
        .map(to_document)
        .map_err(db_err("Failed to write document"))
    }

    async fn increment(&self, key: &DocumentKey, field: &str, delta: i64) -> AppResult<i64> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(db_err("Failed to acquire connection"))?;
        let write = BatchWrite::Increment {
            key: key.clone(),
            field: field.to_string(),
            delta,
        };
        apply_write(&mut *conn, &write)
            .await?
            .ok_or_else(|| AppError::internal("Increment produced no value"))
    }

    async fn delete(&self, key: &DocumentKey) -> AppResult<bool> {
        sqlx::query("DELETE FROM documents WHERE owner_id = $1 AND collection = $2 AND id = $3")
            .bind(key.owner_id.as_str())
            .bind(&key.collection)
            .bind(&key.id)
            .execute(&self.pool)
            .await
            .map(|r| r.rows_affected() > 0)
            .map_err(db_err("Failed to delete document"))
    }

    async fn batch(&self, writes: Vec<BatchWrite>) -> AppResult<()> {
        if writes.is_empty() {
            return Ok(());
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_err("Failed to begin transaction"))?;

        for write in &writes {
            // Dropping `tx` on error rolls the transaction back.
            apply_write(&mut *tx, write).await?;
        }

        tx.commit()
            .await
            .map_err(db_err("Failed to commit transaction"))?;

        debug!(writes = writes.len(), "Committed document batch");
        Ok(())
    }

    async fn health_check(&self) -> AppResult<bool> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|v| v == 1)
            .map_err(db_err("Health check failed"))
    }
}
