//! Business directory core — domain models, error taxonomy and the
//! persistence port shared by every other crate.

pub mod error;
pub mod models;
pub mod repository;

pub use error::{DirectoryError, DirectoryResult};
pub use repository::{KeyValueStore, PaginatedResult, Pagination, Slot, WriteBatch};
