//! Directory store configuration.

use std::time::Duration;

#[derive(Debug, Clone)]
pub struct DirectoryConfig {
    /// Artificial delay before every mutating operation (default: 800 ms).
    pub simulated_latency: Duration,
    /// Size of the featured list when no limit is given (default: 4).
    pub featured_limit: usize,
    /// Listings per page for [`browse_page`](crate::DirectoryStore::browse_page)
    /// (default: 8).
    pub page_size: u64,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            simulated_latency: Duration::from_millis(800),
            featured_limit: 4,
            page_size: 8,
        }
    }
}
