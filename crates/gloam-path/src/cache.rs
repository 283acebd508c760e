//! The exploration distance-map cache.
//!
//! Magic mapping and similar whole-level queries reuse the exploration
//! map for as long as both the source set and the terrain are unchanged.
//! The cache compares the level's [`revision`](GridOracle::revision), so
//! any terrain mutation invalidates it without the mutator having to
//! know the cache exists.

use gloam_core::{GridOracle, Pos};
use tracing::trace;

use crate::dijkstra::DistanceMap;
use crate::models::ExplorePath;

#[derive(Clone, Debug, PartialEq, Eq)]
struct CacheKey {
    sources: Vec<Pos>,
    revision: u64,
}

/// Single-entry cache for the unbounded [`ExplorePath`] distance map.
#[derive(Clone, Debug, Default)]
pub struct ExploreCache {
    entry: Option<(CacheKey, DistanceMap)>,
    hits: u64,
    misses: u64,
}

impl ExploreCache {
    /// An empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// The exploration map from `sources` over `grid`, computed on a miss.
    ///
    /// Source order does not matter for the key.
    pub fn get_or_compute(&mut self, grid: &dyn GridOracle, sources: &[Pos]) -> &DistanceMap {
        let mut sorted = sources.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        let key = CacheKey {
            sources: sorted,
            revision: grid.revision(),
        };
        if matches!(&self.entry, Some((k, _)) if *k == key) {
            self.hits += 1;
            trace!(revision = key.revision, "explore cache hit");
        } else {
            self.misses += 1;
            trace!(revision = key.revision, "explore cache miss");
            self.entry = None;
        }
        let (_, map) = self.entry.get_or_insert_with(|| {
            let map = DistanceMap::compute(&ExplorePath::new(grid), &key.sources, u32::MAX);
            (key, map)
        });
        map
    }

    /// Drop the cached map.
    pub fn invalidate(&mut self) {
        self.entry = None;
    }

    /// Whether a map is currently held.
    pub fn is_populated(&self) -> bool {
        self.entry.is_some()
    }

    /// Lookups served from the cache.
    pub fn hits(&self) -> u64 {
        self.hits
    }

    /// Lookups that had to compute.
    pub fn misses(&self) -> u64 {
        self.misses
    }
}
