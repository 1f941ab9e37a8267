//! In-process store. Clones share the same map, so a second store
//! opened on a clone sees everything the first one wrote.

use std::collections::HashMap;
use std::sync::Arc;

use bizdir_core::error::DirectoryResult;
use bizdir_core::repository::{KeyValueStore, WriteBatch};
use tokio::sync::RwLock;

use super::resolve_batch;

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> DirectoryResult<Option<String>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> DirectoryResult<()> {
        self.entries.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> DirectoryResult<()> {
        self.entries.write().await.remove(key);
        Ok(())
    }

    async fn commit(&self, batch: WriteBatch) -> DirectoryResult<()> {
        let mut entries = self.entries.write().await;
        for (key, value) in resolve_batch(batch) {
            match value {
                Some(value) => {
                    entries.insert(key, value);
                }
                None => {
                    entries.remove(&key);
                }
            }
        }
        Ok(())
    }
}
