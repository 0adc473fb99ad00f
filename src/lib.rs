//! LRU Tree - A hierarchical in-memory cache
//!
//! Stores values as a rooted tree and bounds its size with LRU eviction that
//! only ever removes leaves. A cached node's ancestors always stay cached.

pub mod cache;
pub mod config;
pub mod error;

pub use cache::{
    CacheMetrics, CacheNode, CacheStats, NoopMetrics, StatsRecorder, TreeCache, TreeCacheBuilder,
};
pub use config::Config;
pub use error::{CacheError, Result};
