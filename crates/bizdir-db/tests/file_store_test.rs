//! Integration tests for the single-file JSON store.

use bizdir_core::repository::{KeyValueStore, WriteBatch};
use bizdir_db::FileStore;

#[tokio::test]
async fn missing_file_opens_empty() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::open(dir.path().join("state.json")).await.unwrap();

    assert_eq!(store.get("accounts").await.unwrap(), None);
    assert!(!store.path().exists());
}

#[tokio::test]
async fn writes_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("state.json");

    let store = FileStore::open(&path).await.unwrap();
    store.set("accounts", "[1,2]".into()).await.unwrap();
    store.set("session", "{}".into()).await.unwrap();
    store.remove("session").await.unwrap();
    drop(store);

    let reopened = FileStore::open(&path).await.unwrap();
    assert_eq!(
        reopened.get("accounts").await.unwrap().as_deref(),
        Some("[1,2]")
    );
    assert_eq!(reopened.get("session").await.unwrap(), None);
}

#[tokio::test]
async fn batch_lands_in_one_write() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");

    let store = FileStore::open(&path).await.unwrap();
    store.set("session", "{\"id\":1}".into()).await.unwrap();

    store
        .commit(
            WriteBatch::new()
                .set("accounts", "[]")
                .set("listings", "[]")
                .remove("session"),
        )
        .await
        .unwrap();

    let raw = std::fs::read_to_string(&path).unwrap();
    let on_disk: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(on_disk["accounts"], "[]");
    assert_eq!(on_disk["listings"], "[]");
    assert!(on_disk.get("session").is_none());

    // No temp file is left behind after the rename.
    assert!(!dir.path().join("state.json.tmp").exists());
}

#[tokio::test]
async fn corrupt_file_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");
    std::fs::write(&path, "not json").unwrap();

    let err = FileStore::open(&path).await.unwrap_err();
    assert!(matches!(err, bizdir_db::DbError::CorruptFile { .. }));
}

#[tokio::test]
async fn removing_absent_key_does_not_touch_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");
    let store = FileStore::open(&path).await.unwrap();

    store.remove("session").await.unwrap();
    assert!(!path.exists());
}
