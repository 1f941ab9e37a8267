//! Single-file JSON store.
//!
//! All keys live in one JSON object on disk, the way browser local
//! storage keeps one map per origin. Every write goes to a temporary
//! sibling that is flushed to disk before it is renamed over the store
//! file, so readers only ever see a whole old file or a whole new one.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use bizdir_core::error::DirectoryResult;
use bizdir_core::repository::{KeyValueStore, WriteBatch};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::resolve_batch;
use crate::error::DbError;

#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileStore {
    /// Open the store at `path`. A missing file is an empty store; the
    /// file is created on the first write.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, DbError> {
        let path = path.into();
        let entries = match tokio::fs::read_to_string(&path).await {
            Ok(raw) if raw.trim().is_empty() => BTreeMap::new(),
            Ok(raw) => serde_json::from_str(&raw).map_err(|e| DbError::CorruptFile {
                path: path.display().to_string(),
                message: e.to_string(),
            })?,
            Err(e) if e.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(io_error(&path, e)),
        };

        info!(path = %path.display(), keys = entries.len(), "Opened file store");

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write `next` to disk, then adopt it as the cached state. On
    /// failure the cache keeps the previous contents.
    async fn persist(
        &self,
        current: &mut BTreeMap<String, String>,
        next: BTreeMap<String, String>,
    ) -> Result<(), DbError> {
        let body = serde_json::to_string_pretty(&next).map_err(|e| DbError::CorruptFile {
            path: self.path.display().to_string(),
            message: e.to_string(),
        })?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| io_error(parent, e))?;
        }

        let tmp = temp_path(&self.path);
        let mut file = tokio::fs::File::create(&tmp)
            .await
            .map_err(|e| io_error(&tmp, e))?;
        file.write_all(body.as_bytes())
            .await
            .map_err(|e| io_error(&tmp, e))?;
        file.sync_all().await.map_err(|e| io_error(&tmp, e))?;
        drop(file);
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| io_error(&self.path, e))?;

        debug!(path = %self.path.display(), keys = next.len(), "Store file written");
        *current = next;
        Ok(())
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut raw: OsString = path.as_os_str().to_owned();
    raw.push(".tmp");
    PathBuf::from(raw)
}

fn io_error(path: &Path, source: std::io::Error) -> DbError {
    DbError::Io {
        path: path.display().to_string(),
        source,
    }
}

impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> DirectoryResult<Option<String>> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> DirectoryResult<()> {
        let mut entries = self.entries.lock().await;
        let mut next = entries.clone();
        next.insert(key.to_string(), value);
        self.persist(&mut entries, next).await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> DirectoryResult<()> {
        let mut entries = self.entries.lock().await;
        if !entries.contains_key(key) {
            return Ok(());
        }
        let mut next = entries.clone();
        next.remove(key);
        self.persist(&mut entries, next).await?;
        Ok(())
    }

    async fn commit(&self, batch: WriteBatch) -> DirectoryResult<()> {
        if batch.is_empty() {
            return Ok(());
        }
        let mut entries = self.entries.lock().await;
        let mut next = entries.clone();
        for (key, value) in resolve_batch(batch) {
            match value {
                Some(value) => {
                    next.insert(key, value);
                }
                None => {
                    next.remove(&key);
                }
            }
        }
        self.persist(&mut entries, next).await?;
        Ok(())
    }
}
