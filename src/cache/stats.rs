//! Stats Snapshot Module
//!
//! Plain, serializable copy of the counters kept by `StatsRecorder`.

use serde::Serialize;

// == Cache Stats ==
/// Counters read from a `StatsRecorder` at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Lookups and traversals that found their key
    pub hits: u64,
    /// Lookups and traversals whose key was absent
    pub misses: u64,
    /// Leaves dropped to stay within capacity; removals are not counted
    pub evictions: u64,
    /// Entry count reported by the last size change
    pub total_entries: usize,
}

impl CacheStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of keyed reads.
    pub fn lookups(&self) -> u64 {
        self.hits + self.misses
    }

    /// Fraction of lookups that hit, 0.0 before the first lookup.
    pub fn hit_rate(&self) -> f64 {
        match self.lookups() {
            0 => 0.0,
            lookups => self.hits as f64 / lookups as f64,
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_snapshot() {
        let stats = CacheStats::new();
        assert_eq!(stats, CacheStats::default());
        assert_eq!(stats.lookups(), 0);
        assert_eq!(stats.hit_rate(), 0.0);
    }

    #[test]
    fn test_hit_rate() {
        let only_hits = CacheStats {
            hits: 3,
            ..CacheStats::default()
        };
        assert_eq!(only_hits.hit_rate(), 1.0);

        let mixed = CacheStats {
            hits: 1,
            misses: 3,
            ..CacheStats::default()
        };
        assert_eq!(mixed.lookups(), 4);
        assert_eq!(mixed.hit_rate(), 0.25);
    }

    #[test]
    fn test_snapshot_serializes_all_counters() {
        let stats = CacheStats {
            hits: 4,
            misses: 2,
            evictions: 1,
            total_entries: 9,
        };
        assert_eq!(
            serde_json::to_value(&stats).unwrap(),
            serde_json::json!({
                "hits": 4,
                "misses": 2,
                "evictions": 1,
                "total_entries": 9,
            })
        );
    }
}
