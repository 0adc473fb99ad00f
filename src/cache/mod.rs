//! Cache Module
//!
//! Provides the hierarchical cache: an arena-backed tree of entries, an
//! intrusive LRU list, and leaf-only eviction.

mod arena;
mod builder;
mod entry;
mod lru;
mod metrics;
mod mutation;
mod removal;
mod stats;
mod store;
mod traversal;
mod tree_cache;


// Re-export public types
pub use builder::TreeCacheBuilder;
pub use entry::CacheNode;
pub use metrics::{CacheMetrics, NoopMetrics, StatsRecorder};
pub use stats::CacheStats;
pub use tree_cache::{EvictCallback, TreeCache};
