//! Session projection — the part of an account that is safe to expose.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::account::{Account, AccountRole};

/// Current account minus its password. This is also the exact shape
/// persisted in the `session` slot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: AccountRole,
    pub created_at: DateTime<Utc>,
}

impl SessionUser {
    pub fn is_admin(&self) -> bool {
        self.role == AccountRole::Admin
    }
}

impl From<&Account> for SessionUser {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            name: account.name.clone(),
            email: account.email.clone(),
            role: account.role,
            created_at: account.created_at,
        }
    }
}

/// Identity changes broadcast by the session store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    Registered { account_id: Uuid },
    LoggedIn { account_id: Uuid },
    LoggedOut { account_id: Uuid },
    ProfileUpdated { account_id: Uuid },
    AccountDeleted { account_id: Uuid },
}
