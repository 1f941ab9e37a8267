//! Session store configuration.

use std::time::Duration;

/// Configuration for the session store.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Artificial delay applied before every identity operation except
    /// logout (default: 800 ms). Stands in for a network round trip.
    pub simulated_latency: Duration,
    /// Capacity of the session event channel (default: 64). Slow
    /// subscribers that fall further behind miss events.
    pub event_capacity: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            simulated_latency: Duration::from_millis(800),
            event_capacity: 64,
        }
    }
}
