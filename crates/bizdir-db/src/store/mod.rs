//! [`KeyValueStore`](bizdir_core::repository::KeyValueStore) adapters.

mod file;
mod memory;
mod surreal;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use surreal::SurrealStore;

/// Collapse a batch to its final state per key, keeping first-seen key
/// order. Later writes to the same key win.
pub(crate) fn resolve_batch(
    batch: bizdir_core::repository::WriteBatch,
) -> Vec<(String, Option<String>)> {
    let mut resolved: Vec<(String, Option<String>)> = Vec::with_capacity(batch.len());
    for (key, value) in batch.into_writes() {
        match resolved.iter_mut().find(|(k, _)| *k == key) {
            Some(existing) => existing.1 = value,
            None => resolved.push((key, value)),
        }
    }
    resolved
}
