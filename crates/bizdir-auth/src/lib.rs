//! Business directory identity — the session store, credential checks
//! and session events.

pub mod activity;
pub mod config;
pub mod error;
pub mod password;
pub mod service;

pub use config::SessionConfig;
pub use error::AuthError;
pub use service::SessionStore;
