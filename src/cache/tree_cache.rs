//! Tree Cache Module
//!
//! Thread-safe façade over `TreeStore`.
//!
//! Every operation takes the store lock for its whole duration. Operations
//! that promote take the write lock; `peek`, `peek_branch` and the size
//! queries share the read lock. The eviction callback runs after the write
//! lock is released, so it may call back into the cache. Traversal callbacks
//! run under the write lock and must not.

use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::cache::builder::TreeCacheBuilder;
use crate::cache::entry::CacheNode;
use crate::cache::metrics::CacheMetrics;
use crate::cache::store::TreeStore;
use crate::config::Config;
use crate::error::Result;

/// Callback receiving evicted nodes.
pub type EvictCallback<K, V> = Box<dyn Fn(CacheNode<K, V>) + Send + Sync>;

// == Tree Cache ==
/// Hierarchical cache with leaf-only LRU eviction.
///
/// Nodes form a single rooted tree. Touching a node also touches every
/// ancestor, so ancestors of a cached node are never evicted before it and
/// eviction only ever removes leaves.
///
/// ```
/// use lru_tree::TreeCache;
///
/// let cache = TreeCache::new(3);
/// cache.add_root("usa", "United States").unwrap();
/// cache.add("ca", "California", &"usa").unwrap();
/// cache.add("sf", "San Francisco", &"ca").unwrap();
///
/// let path: Vec<_> = cache.get_branch(&"sf").into_iter().map(|n| n.value).collect();
/// assert_eq!(path, vec!["United States", "California", "San Francisco"]);
/// ```
pub struct TreeCache<K, V> {
    store: RwLock<TreeStore<K, V>>,
    on_evict: Option<EvictCallback<K, V>>,
    metrics: Arc<dyn CacheMetrics>,
}

impl<K, V> TreeCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    // == Constructors ==
    /// Creates a cache holding at most `capacity` entries (0 disables eviction).
    pub fn new(capacity: usize) -> Self {
        Self::builder(capacity).build()
    }

    /// Starts a builder for callbacks and metrics.
    pub fn builder(capacity: usize) -> TreeCacheBuilder<K, V> {
        TreeCacheBuilder::new(capacity)
    }

    /// Creates a cache from loaded configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.capacity)
    }

    pub(crate) fn from_parts(
        capacity: usize,
        on_evict: Option<EvictCallback<K, V>>,
        metrics: Arc<dyn CacheMetrics>,
    ) -> Self {
        Self {
            store: RwLock::new(TreeStore::new(capacity)),
            on_evict,
            metrics,
        }
    }

    // == Size ==
    pub fn capacity(&self) -> usize {
        self.store.read().capacity()
    }

    /// Number of entries currently cached.
    pub fn len(&self) -> usize {
        self.store.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Checks presence without touching recency or metrics.
    pub fn contains(&self, key: &K) -> bool {
        self.store.read().lookup(key).is_some()
    }

    // == Insertion ==
    /// Creates the root node. A cache accepts one root over its whole
    /// lifetime; later calls fail even if the root was removed.
    pub fn add_root(&self, key: K, value: V) -> Result<()> {
        let mut store = self.store.write();
        store.insert_root(key, value)?;
        self.metrics.set_size(store.len());
        Ok(())
    }

    /// Inserts a new leaf under `parent_key`, evicting the least recently
    /// used leaf if the cache grows past capacity.
    pub fn add(&self, key: K, value: V, parent_key: &K) -> Result<()> {
        let evicted = {
            let mut store = self.store.write();
            let evicted = store.add(key, value, parent_key)?;
            self.record_mutation(&store, evicted.is_some());
            evicted
        };
        self.notify_evicted(evicted);
        Ok(())
    }

    /// Inserts `key` under `parent_key`, or replaces its value and moves it
    /// under `parent_key` if it already exists elsewhere.
    pub fn add_or_update(&self, key: K, value: V, parent_key: &K) -> Result<()> {
        let evicted = {
            let mut store = self.store.write();
            let evicted = store.add_or_update(key, value, parent_key)?;
            self.record_mutation(&store, evicted.is_some());
            evicted
        };
        self.notify_evicted(evicted);
        Ok(())
    }

    // == Lookups ==
    /// Returns the node and marks it and its ancestors as recently used.
    pub fn get(&self, key: &K) -> Option<CacheNode<K, V>> {
        let mut store = self.store.write();
        let node = store.get(key);
        self.record_lookup(node.is_some());
        node
    }

    /// Returns the node without changing recency.
    pub fn peek(&self, key: &K) -> Option<CacheNode<K, V>> {
        let store = self.store.read();
        let node = store.peek(key);
        self.record_lookup(node.is_some());
        node
    }

    /// Path from the root down to `key`, marking every node on it as
    /// recently used. Empty if `key` is absent.
    pub fn get_branch(&self, key: &K) -> Vec<CacheNode<K, V>> {
        let mut store = self.store.write();
        let branch = store.get_branch(key);
        self.record_lookup(!branch.is_empty());
        branch
    }

    /// Path from the root down to `key` without changing recency.
    pub fn peek_branch(&self, key: &K) -> Vec<CacheNode<K, V>> {
        let store = self.store.read();
        let branch = store.peek_branch(key);
        self.record_lookup(!branch.is_empty());
        branch
    }

    // == Traversals ==
    /// Calls `visit(key, value, parent_key)` for `key` and then each ancestor
    /// up to the root.
    ///
    /// `visit` runs under the write lock and must not call back into this
    /// cache. If it panics, the chain is still promoted before the panic
    /// propagates.
    pub fn traverse_to_root<F>(&self, key: &K, visit: F)
    where
        F: FnMut(&K, &V, Option<&K>),
    {
        let mut store = self.store.write();
        self.record_lookup(store.contains(key));
        store.traverse_to_root(key, visit);
    }

    /// Pre-order depth-first walk over `key` and all its descendants.
    ///
    /// Same locking and panic rules as [`TreeCache::traverse_to_root`].
    /// Sibling order is unspecified.
    pub fn traverse_subtree<F>(&self, key: &K, visit: F)
    where
        F: FnMut(&K, &V, Option<&K>),
    {
        self.walk_subtree(key, None, visit);
    }

    /// Like [`TreeCache::traverse_subtree`], descending at most `max_depth`
    /// levels below `key`. A depth of 0 visits `key` alone.
    pub fn traverse_subtree_to_depth<F>(&self, key: &K, max_depth: usize, visit: F)
    where
        F: FnMut(&K, &V, Option<&K>),
    {
        self.walk_subtree(key, Some(max_depth), visit);
    }

    // == Removal ==
    /// Deletes `key` and its whole subtree, returning how many nodes went.
    ///
    /// Removal is never reported as an eviction.
    pub fn remove(&self, key: &K) -> usize {
        let mut store = self.store.write();
        let removed = store.remove(key);
        if removed > 0 {
            self.metrics.set_size(store.len());
        }
        removed
    }

    // == Diagnostics ==
    /// Keys ordered from most to least recently used.
    pub fn recency_order(&self) -> Vec<K> {
        self.store.read().recency_order()
    }

    fn walk_subtree<F>(&self, key: &K, max_depth: Option<usize>, visit: F)
    where
        F: FnMut(&K, &V, Option<&K>),
    {
        let mut store = self.store.write();
        self.record_lookup(store.contains(key));
        store.traverse_subtree(key, max_depth, visit);
    }

    fn record_lookup(&self, found: bool) {
        if found {
            self.metrics.increment_hits();
        } else {
            self.metrics.increment_misses();
        }
    }

    fn record_mutation(&self, store: &TreeStore<K, V>, evicted: bool) {
        if evicted {
            self.metrics.add_evictions(1);
        }
        self.metrics.set_size(store.len());
    }

    fn notify_evicted(&self, evicted: Option<CacheNode<K, V>>) {
        if let (Some(node), Some(on_evict)) = (evicted, &self.on_evict) {
            on_evict(node);
        }
    }
}

impl<K, V> fmt::Debug for TreeCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let store = self.store.read();
        f.debug_struct("TreeCache")
            .field("capacity", &store.capacity())
            .field("len", &store.len())
            .field("on_evict", &self.on_evict.is_some())
            .finish()
    }
}
