//! SurrealDB implementation of [`KeyValueStore`].
//!
//! Each slot is a record in the `kv_slot` table whose record id is the
//! slot key. Batches run inside a single SurrealQL transaction.

use bizdir_core::error::DirectoryResult;
use bizdir_core::repository::{KeyValueStore, WriteBatch};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;

use super::resolve_batch;
use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct SlotRow {
    value: String,
}

/// SurrealDB-backed slot store. Run
/// [`run_migrations`](crate::run_migrations) before use.
#[derive(Clone)]
pub struct SurrealStore<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealStore<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> KeyValueStore for SurrealStore<C> {
    async fn get(&self, key: &str) -> DirectoryResult<Option<String>> {
        let mut result = self
            .db
            .query("SELECT * FROM type::record('kv_slot', $key)")
            .bind(("key", key.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<SlotRow> = result.take(0).map_err(DbError::from)?;
        Ok(rows.into_iter().next().map(|row| row.value))
    }

    async fn set(&self, key: &str, value: String) -> DirectoryResult<()> {
        self.db
            .query(
                "UPSERT type::record('kv_slot', $key) SET \
                 value = $value, updated_at = time::now()",
            )
            .bind(("key", key.to_string()))
            .bind(("value", value))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| DbError::Query(e.to_string()))?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> DirectoryResult<()> {
        self.db
            .query("DELETE type::record('kv_slot', $key)")
            .bind(("key", key.to_string()))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| DbError::Query(e.to_string()))?;
        Ok(())
    }

    async fn commit(&self, batch: WriteBatch) -> DirectoryResult<()> {
        let mut upserts = Vec::new();
        let mut removals = Vec::new();
        for (key, value) in resolve_batch(batch) {
            match value {
                Some(value) => upserts.push(serde_json::json!({ "key": key, "value": value })),
                None => removals.push(key),
            }
        }
        if upserts.is_empty() && removals.is_empty() {
            return Ok(());
        }

        self.db
            .query(
                "BEGIN TRANSACTION; \
                 FOR $w IN $upserts { \
                     UPSERT type::record('kv_slot', $w.key) SET \
                     value = $w.value, updated_at = time::now(); \
                 }; \
                 FOR $key IN $removals { \
                     DELETE type::record('kv_slot', $key); \
                 }; \
                 COMMIT TRANSACTION;",
            )
            .bind(("upserts", serde_json::Value::Array(upserts)))
            .bind(("removals", removals))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| DbError::Query(e.to_string()))?;
        Ok(())
    }
}
