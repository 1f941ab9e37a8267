//! Storage-layer error types and conversions.

use bizdir_core::error::DirectoryError;
use bizdir_core::repository::Slot;

/// Storage-layer error type.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SurrealDB error: {0}")]
    Surreal(#[from] surrealdb::Error),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Store file {path} is not a JSON object: {message}")]
    CorruptFile { path: String, message: String },

    #[error("Slot '{slot}' holds malformed JSON: {message}")]
    MalformedSlot { slot: Slot, message: String },
}

impl From<DbError> for DirectoryError {
    fn from(err: DbError) -> Self {
        DirectoryError::Storage(err.to_string())
    }
}
