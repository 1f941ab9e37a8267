//! Business directory listings — the directory store, its query engine
//! and field rules.

pub mod config;
pub mod query;
pub mod seed;
pub mod service;
pub mod validation;

pub use config::DirectoryConfig;
pub use query::{ListingQuery, SortOrder};
pub use service::DirectoryStore;
