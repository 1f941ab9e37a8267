//! Typed access to the three slots of the durable mirror.

use bizdir_core::error::DirectoryResult;
use bizdir_core::models::account::Account;
use bizdir_core::models::listing::Listing;
use bizdir_core::models::session::SessionUser;
use bizdir_core::repository::{KeyValueStore, Slot, WriteBatch};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::DbError;

/// JSON mirror of the in-memory state, written in full after every
/// mutation. Absent slots read as empty.
pub struct DurableMirror<K: KeyValueStore> {
    store: K,
}

impl<K: KeyValueStore> DurableMirror<K> {
    pub fn new(store: K) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &K {
        &self.store
    }

    pub async fn load_accounts(&self) -> DirectoryResult<Vec<Account>> {
        Ok(self.load(Slot::Accounts).await?.unwrap_or_default())
    }

    pub async fn save_accounts(&self, accounts: &[Account]) -> DirectoryResult<()> {
        self.save(Slot::Accounts, &accounts).await
    }

    pub async fn load_listings(&self) -> DirectoryResult<Vec<Listing>> {
        Ok(self.load(Slot::Listings).await?.unwrap_or_default())
    }

    pub async fn save_listings(&self, listings: &[Listing]) -> DirectoryResult<()> {
        self.save(Slot::Listings, &listings).await
    }

    pub async fn load_session(&self) -> DirectoryResult<Option<SessionUser>> {
        self.load(Slot::Session).await
    }

    pub async fn save_session(&self, user: &SessionUser) -> DirectoryResult<()> {
        self.save(Slot::Session, user).await
    }

    pub async fn clear_session(&self) -> DirectoryResult<()> {
        debug!(slot = %Slot::Session, "Clearing slot");
        self.store.remove(Slot::Session.key()).await
    }

    /// Write the account set, the listing set and an empty session in
    /// one batch: either all three land or none do.
    pub async fn commit_account_removal(
        &self,
        accounts: &[Account],
        listings: &[Listing],
    ) -> DirectoryResult<()> {
        let batch = WriteBatch::new()
            .set(Slot::Accounts.key(), encode(Slot::Accounts, &accounts)?)
            .set(Slot::Listings.key(), encode(Slot::Listings, &listings)?)
            .remove(Slot::Session.key());
        debug!(writes = batch.len(), "Committing account removal");
        self.store.commit(batch).await
    }

    async fn load<T: DeserializeOwned>(&self, slot: Slot) -> DirectoryResult<Option<T>> {
        let Some(raw) = self.store.get(slot.key()).await? else {
            return Ok(None);
        };
        let value = serde_json::from_str(&raw).map_err(|e| DbError::MalformedSlot {
            slot,
            message: e.to_string(),
        })?;
        Ok(Some(value))
    }

    async fn save<T: Serialize + ?Sized>(&self, slot: Slot, value: &T) -> DirectoryResult<()> {
        let raw = encode(slot, value)?;
        debug!(slot = %slot, bytes = raw.len(), "Writing slot");
        self.store.set(slot.key(), raw).await
    }
}

fn encode<T: Serialize + ?Sized>(slot: Slot, value: &T) -> Result<String, DbError> {
    serde_json::to_string(value).map_err(|e| DbError::MalformedSlot {
        slot,
        message: e.to_string(),
    })
}
