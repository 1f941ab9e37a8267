//! Persistence port and shared query types.
//!
//! The stores never talk to a storage engine directly. They read and
//! write whole JSON documents through [`KeyValueStore`], one document
//! per [`Slot`].

use std::fmt;

use crate::error::DirectoryResult;

/// Pagination parameters for list queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub offset: u64,
    pub limit: u64,
}

impl Pagination {
    /// Page numbers start at 1; page 0 is treated as page 1.
    pub fn page(page: u64, per_page: u64) -> Self {
        Self {
            offset: page.saturating_sub(1).saturating_mul(per_page),
            limit: per_page,
        }
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: 8,
        }
    }
}

/// A paginated result set.
#[derive(Debug, Clone)]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub offset: u64,
    pub limit: u64,
}

impl<T> PaginatedResult<T> {
    /// Slice an already filtered and ordered set.
    pub fn slice(all: Vec<T>, pagination: Pagination) -> Self {
        let total = all.len() as u64;
        let items = all
            .into_iter()
            .skip(usize::try_from(pagination.offset).unwrap_or(usize::MAX))
            .take(usize::try_from(pagination.limit).unwrap_or(usize::MAX))
            .collect();
        Self {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        }
    }

    pub fn total_pages(&self) -> u64 {
        if self.limit == 0 {
            return 0;
        }
        self.total.div_ceil(self.limit)
    }
}

// ---------------------------------------------------------------------------
// Key-value port
// ---------------------------------------------------------------------------

/// The three logical slots of the durable mirror.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    /// Current account minus password, or absent.
    Session,
    /// Every registered account, passwords included.
    Accounts,
    /// Every listing.
    Listings,
}

impl Slot {
    pub const ALL: [Slot; 3] = [Slot::Session, Slot::Accounts, Slot::Listings];

    pub fn key(self) -> &'static str {
        match self {
            Slot::Session => "session",
            Slot::Accounts => "accounts",
            Slot::Listings => "listings",
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A group of writes applied all-or-nothing by [`KeyValueStore::commit`].
///
/// `None` removes the key.
#[derive(Debug, Clone, Default)]
pub struct WriteBatch {
    writes: Vec<(String, Option<String>)>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.writes.push((key.into(), Some(value.into())));
        self
    }

    pub fn remove(mut self, key: impl Into<String>) -> Self {
        self.writes.push((key.into(), None));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.writes.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.writes
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_deref()))
    }

    pub fn into_writes(self) -> Vec<(String, Option<String>)> {
        self.writes
    }
}

/// String key-value storage, the equivalent of browser local storage.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> impl Future<Output = DirectoryResult<Option<String>>> + Send;
    fn set(&self, key: &str, value: String) -> impl Future<Output = DirectoryResult<()>> + Send;
    /// Removing an absent key succeeds.
    fn remove(&self, key: &str) -> impl Future<Output = DirectoryResult<()>> + Send;
    /// Apply every write in `batch` or none of them.
    fn commit(&self, batch: WriteBatch) -> impl Future<Output = DirectoryResult<()>> + Send;
}
