//! Business directory storage — key-value adapters and the durable
//! mirror built on top of them.
//!
//! This crate provides:
//! - [`MemoryStore`], [`FileStore`] and [`SurrealStore`] adapters for
//!   the [`KeyValueStore`](bizdir_core::repository::KeyValueStore) port
//! - SurrealDB connection management ([`DbManager`], [`DbConfig`]) and
//!   schema migrations ([`run_migrations`])
//! - [`DurableMirror`], the typed view of the `session`, `accounts`
//!   and `listings` slots
//! - Error types ([`DbError`])

mod connection;
mod error;
mod mirror;
mod schema;
pub mod store;

pub use connection::{DbConfig, DbManager, connect_in_memory};
pub use error::DbError;
pub use mirror::DurableMirror;
pub use schema::{run_migrations, schema_v1};
pub use store::{FileStore, MemoryStore, SurrealStore};
