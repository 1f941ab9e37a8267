//! Account domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AccountRole {
    #[default]
    User,
    Admin,
}

/// A registered account as held in the durable `accounts` slot.
///
/// The password is kept in clear text; the mirror is a simulation of a
/// backend and offers no protection for credentials.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: AccountRole,
    pub password: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateAccount {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Profile fields an owner may change. Role and id are not editable.
#[derive(Debug, Clone, Default)]
pub struct UpdateProfile {
    pub name: String,
    pub email: String,
}
