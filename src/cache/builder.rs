//! Tree cache builder.
//!
//! Collects capacity, the eviction callback and the metrics recorder before
//! constructing a `TreeCache`.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::{Arc, Mutex};
//! use lru_tree::TreeCache;
//!
//! let evicted = Arc::new(Mutex::new(Vec::new()));
//! let sink = evicted.clone();
//! let cache = TreeCache::builder(2)
//!     .on_evict(move |node| sink.lock().unwrap().push(node.key))
//!     .build();
//!
//! cache.add_root("root", 0).unwrap();
//! cache.add("a", 1, &"root").unwrap();
//! cache.add("b", 2, &"root").unwrap();
//! assert_eq!(*evicted.lock().unwrap(), vec!["a"]);
//! ```

use std::hash::Hash;
use std::sync::Arc;

use crate::cache::entry::CacheNode;
use crate::cache::metrics::{CacheMetrics, NoopMetrics};
use crate::cache::tree_cache::{EvictCallback, TreeCache};

/// Builder for [`TreeCache`].
pub struct TreeCacheBuilder<K, V> {
    capacity: usize,
    on_evict: Option<EvictCallback<K, V>>,
    metrics: Option<Arc<dyn CacheMetrics>>,
}

impl<K, V> TreeCacheBuilder<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Starts a builder for a cache holding at most `capacity` entries
    /// (0 disables eviction).
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            on_evict: None,
            metrics: None,
        }
    }

    /// Callback receiving each evicted node after the cache lock is released.
    pub fn on_evict<F>(mut self, on_evict: F) -> Self
    where
        F: Fn(CacheNode<K, V>) + Send + Sync + 'static,
    {
        self.on_evict = Some(Box::new(on_evict));
        self
    }

    /// Recorder for sizes, hits, misses and evictions.
    pub fn metrics(mut self, metrics: Arc<dyn CacheMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn build(self) -> TreeCache<K, V> {
        let metrics = self.metrics.unwrap_or_else(|| Arc::new(NoopMetrics));
        TreeCache::from_parts(self.capacity, self.on_evict, metrics)
    }
}
