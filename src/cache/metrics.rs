//! Metrics Module
//!
//! Observer hooks the cache reports sizes, hits, misses and evictions to.
//!
//! All hooks take `&self` because shared-access reads (`peek`, `peek_branch`)
//! report hits and misses too. Calls happen synchronously inside the cache
//! operation; a panicking recorder propagates to the caller.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use crate::cache::stats::CacheStats;

// == Metrics Trait ==
/// Receiver for cache counters.
pub trait CacheMetrics: Send + Sync {
    /// Current number of entries, reported after every size change.
    fn set_size(&self, size: usize);

    /// A lookup-style operation found its key.
    fn increment_hits(&self);

    /// A lookup-style operation did not find its key.
    fn increment_misses(&self);

    /// `count` entries were evicted.
    fn add_evictions(&self, count: u64);
}

// == No-op Metrics ==
/// Default recorder that drops everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopMetrics;

impl CacheMetrics for NoopMetrics {
    fn set_size(&self, _size: usize) {}
    fn increment_hits(&self) {}
    fn increment_misses(&self) {}
    fn add_evictions(&self, _count: u64) {}
}

// == Stats Recorder ==
/// Atomic counters that can be read back as a `CacheStats` snapshot.
///
/// ```
/// use std::sync::Arc;
/// use lru_tree::{StatsRecorder, TreeCache};
///
/// let stats = Arc::new(StatsRecorder::new());
/// let cache: TreeCache<&str, u32> = TreeCache::builder(10).metrics(stats.clone()).build();
/// cache.add_root("root", 0).unwrap();
/// cache.get(&"root");
/// cache.get(&"missing");
///
/// let snapshot = stats.snapshot();
/// assert_eq!((snapshot.hits, snapshot.misses, snapshot.total_entries), (1, 1, 1));
/// ```
#[derive(Debug, Default)]
pub struct StatsRecorder {
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
    size: AtomicUsize,
}

impl StatsRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads every counter into a `CacheStats`.
    pub fn snapshot(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            total_entries: self.size.load(Ordering::Relaxed),
        }
    }
}

impl CacheMetrics for StatsRecorder {
    fn set_size(&self, size: usize) {
        self.size.store(size, Ordering::Relaxed);
    }

    fn increment_hits(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    fn increment_misses(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    fn add_evictions(&self, count: u64) {
        self.evictions.fetch_add(count, Ordering::Relaxed);
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_recorder_counts() {
        let recorder = StatsRecorder::new();
        recorder.increment_hits();
        recorder.increment_hits();
        recorder.increment_misses();
        recorder.add_evictions(3);
        recorder.set_size(12);

        assert_eq!(
            recorder.snapshot(),
            CacheStats {
                hits: 2,
                misses: 1,
                evictions: 3,
                total_entries: 12,
            }
        );
    }

    #[test]
    fn test_set_size_overwrites() {
        let recorder = StatsRecorder::new();
        recorder.set_size(5);
        recorder.set_size(2);
        assert_eq!(recorder.snapshot().total_entries, 2);
    }

    #[test]
    fn test_noop_metrics_is_object_safe() {
        let metrics: Box<dyn CacheMetrics> = Box::new(NoopMetrics);
        metrics.set_size(1);
        metrics.increment_hits();
        metrics.increment_misses();
        metrics.add_evictions(1);
    }
}
