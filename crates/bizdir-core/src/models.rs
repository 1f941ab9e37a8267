//! Domain models for the business directory.

pub mod account;
pub mod listing;
pub mod session;
