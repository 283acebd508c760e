//! Counters collected while the simulation drains its event queue.
//!
//! [`DrainMetrics`] is cumulative over the life of a
//! [`Simulation`](crate::Simulation); read it through
//! [`Simulation::metrics`](crate::Simulation::metrics) for telemetry or
//! test assertions.

/// Cumulative engine counters.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DrainMetrics {
    /// Events popped and dispatched, stale ones included.
    pub events_fired: u64,
    /// Events absorbed because their generation stamp no longer matched.
    pub stale_events: u64,
    /// Events absorbed because the monster they named was gone.
    pub orphaned_events: u64,
    /// Largest number of events ever pending at once.
    pub peak_queue_len: usize,
    /// Distance maps computed from scratch.
    pub distance_maps: u64,
    /// Exploration map requests served from the cache.
    pub explore_cache_hits: u64,
    /// Player commands that took effect.
    pub commands_applied: u64,
    /// Player commands rejected without changing state.
    pub commands_rejected: u64,
}

impl DrainMetrics {
    /// Events that did something when they fired.
    pub fn live_events(&self) -> u64 {
        self.events_fired
            .saturating_sub(self.stale_events)
            .saturating_sub(self.orphaned_events)
    }
}
